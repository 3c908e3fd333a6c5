//! Complete-graph bookkeeping for a city set and cycle decomposition of
//! 2-regular edge selections.

mod adjacency;
mod cycles;
mod edge;

pub(crate) use adjacency::Adjacency;
pub use cycles::{decompose_cycles, find_shortest_cycle};
pub(crate) use cycles::{decompose_adjacency, shortest_cycle};
pub use edge::{DistanceTable, Edge, EdgeKey};
