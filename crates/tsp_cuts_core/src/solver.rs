use mip::{solution::MipStatus, solver::MipSolver};

use crate::{
    Error, Result,
    city::CitySet,
    formulation::TspFormulation,
    graph::{DistanceTable, decompose_cycles},
    io::options::SolverOptions,
    lazy::{EliminationStats, SubtourEliminator},
    tour::Tour,
};

#[derive(Clone, Debug)]
pub struct TspSolution {
    pub tour: Tour,
    pub length: f64,
    pub status: MipStatus,
    pub nodes_explored: u64,
    pub lazy_constraints: u64,
    pub callback_calls: u64,
    pub stats: EliminationStats,
    pub solve_time_ms: u64,
}

impl TspSolution {
    /// `false` when a node or time limit stopped the search early.
    pub fn is_optimal(&self) -> bool {
        self.status == MipStatus::Optimal
    }
}

/// Solves the symmetric TSP over `cities` by branch-and-cut, forbidding
/// subtours lazily.
///
/// The returned tour starts at the first loaded city.
pub fn solve_tsp(cities: &CitySet, options: &SolverOptions) -> Result<TspSolution> {
    let table = DistanceTable::euclidean(cities);
    let formulation = TspFormulation::new(&table)?;
    let solver = MipSolver::new(formulation.model().clone(), options.mip_settings())?;

    let mut eliminator = SubtourEliminator::new(&formulation);
    let solution = solver.solve_with(&mut eliminator)?;
    let stats = eliminator.stats();

    if !solution.has_solution() {
        log::warn!("solve: no tour status={}", solution.status);
        return Err(Error::NoTour {
            status: solution.status,
        });
    }

    let selected = formulation.selected_edges(&solution.values);
    let mut cycles = decompose_cycles(&formulation.city_ids(), &selected);
    let order = match cycles.pop() {
        Some(cycle) if cycles.is_empty() && cycle.len() == cities.len() => cycle,
        _ => {
            return Err(Error::invalid_data(format!(
                "solver returned {} cycle(s) instead of one tour over {} cities",
                cycles.len() + 1,
                cities.len()
            )));
        }
    };

    let tour = Tour::from_order(cities, order);
    let length = tour.length();
    log::info!(
        "solve: status={} n={} length={length:.6} nodes={} cuts={} callbacks={} smallest_subtour={} time_ms={}",
        solution.status,
        tour.len(),
        solution.nodes_explored,
        solution.lazy_constraints_added,
        solution.callback_calls,
        stats.smallest_subtour.unwrap_or(0),
        solution.solve_time_ms
    );

    Ok(TspSolution {
        tour,
        length,
        status: solution.status,
        nodes_explored: solution.nodes_explored,
        lazy_constraints: solution.lazy_constraints_added,
        callback_calls: solution.callback_calls,
        stats,
        solve_time_ms: solution.solve_time_ms,
    })
}
