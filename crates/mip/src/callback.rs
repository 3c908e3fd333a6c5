//! Lazy constraint callback contract.
//!
//! The engine calls [`LazyConstraintCallback::on_candidate`] exactly once for
//! every integer-feasible LP solution it finds. The callback inspects the
//! [`Candidate`] and may inject constraints through the [`LazyContext`]. A
//! candidate that survives the callback without a violated lazy constraint
//! becomes an incumbent.

use crate::model::{LinearConstraint, VarId};

/// Integer-feasible point handed to a callback.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    values: &'a [f64],
    objective: f64,
    node: u64,
}

impl<'a> Candidate<'a> {
    pub fn new(values: &'a [f64], objective: f64, node: u64) -> Self {
        Self {
            values,
            objective,
            node,
        }
    }

    fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Binary membership test: the relaxation value rounded at `0.5`.
    pub fn is_selected(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Search node the candidate was found at.
    pub fn node(&self) -> u64 {
        self.node
    }
}

/// Collects the constraints a callback wants added to the search.
#[derive(Debug, Default)]
pub struct LazyContext {
    pending: Vec<LinearConstraint>,
}

impl LazyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lazy(&mut self, constraint: LinearConstraint) {
        self.pending.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<LinearConstraint> {
        std::mem::take(&mut self.pending)
    }
}

pub trait LazyConstraintCallback {
    fn on_candidate(&mut self, candidate: &Candidate<'_>, ctx: &mut LazyContext);
}

impl<F> LazyConstraintCallback for F
where
    F: FnMut(&Candidate<'_>, &mut LazyContext),
{
    fn on_candidate(&mut self, candidate: &Candidate<'_>, ctx: &mut LazyContext) {
        self(candidate, ctx)
    }
}

/// Accepts every candidate; solves the model as written.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLazyConstraints;

impl LazyConstraintCallback for NoLazyConstraints {
    fn on_candidate(&mut self, _candidate: &Candidate<'_>, _ctx: &mut LazyContext) {}
}
