//! Exact symmetric TSP over city coordinates using lazy subtour elimination.
//!
//! The model keeps only degree constraints. Each integer-feasible candidate
//! found by the `mip` engine is split into cycles; when the shortest cycle
//! misses some city a constraint forbidding it is added and the search
//! continues.

mod city;
mod error;
mod formulation;
mod geometry;
mod graph;
mod io;
mod lazy;
pub mod logging;
mod solver;
mod tour;

pub use city::{City, CityId, CitySet};
pub use error::{Error, Result};
pub use formulation::TspFormulation;
pub use graph::{DistanceTable, Edge, EdgeKey, decompose_cycles, find_shortest_cycle};
pub use io::input::SolverInput;
pub use io::options::{InputFormat, LogFormat, LogLevel, SolverOptions};
pub use io::output::write_tour;
pub use lazy::{EliminationStats, SubtourCut, SubtourEliminator, subtour_cut};
pub use solver::{TspSolution, solve_tsp};
pub use tour::{Tour, TourMetrics};
