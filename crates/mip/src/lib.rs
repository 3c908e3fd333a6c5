//! `mip` is a small branch-and-cut engine for minimisation problems over
//! binary and continuous variables.
//!
//! It plays the part of the external MIP collaborator for the TSP crate:
//! callers build a [`model::MipModel`], hand it to a [`solver::MipSolver`]
//! and receive a [`solution::MipSolution`]. Constraints that are too many to
//! state up front can be supplied lazily through a
//! [`callback::LazyConstraintCallback`], which sees every integer-feasible
//! candidate before it may become the incumbent.
//!
//! LP relaxations are solved with `minilp`. The search is depth-first with
//! most-fractional branching; it is meant for small and medium instances.
//!
//! # Quickstart
//!
//! ```no_run
//! use mip::{
//!     callback::{Candidate, LazyContext},
//!     model::{LinearConstraint, MipModel},
//!     settings::MipSettings,
//!     solver::MipSolver,
//! };
//!
//! fn main() -> mip::MipResult<()> {
//!     let mut model = MipModel::new();
//!     let a = model.add_binary("a", -1.0);
//!     let b = model.add_binary("b", -2.0);
//!
//!     let mut forbid_both = |candidate: &Candidate<'_>, ctx: &mut LazyContext| {
//!         if candidate.is_selected(a) && candidate.is_selected(b) {
//!             ctx.add_lazy(LinearConstraint::le(1.0).with_terms([(a, 1.0), (b, 1.0)]));
//!         }
//!     };
//!
//!     let solution = MipSolver::new(model, MipSettings::default())?.solve_with(&mut forbid_both)?;
//!     println!("{} {:?}", solution.status, solution.values);
//!     Ok(())
//! }
//! ```

pub mod callback;
pub mod model;
pub mod settings;
pub mod solution;
pub mod solver;

mod error;

pub use error::{MipError, MipResult};
