//! Lazy subtour elimination.
//!
//! The MIP engine hands every integer-feasible candidate to
//! [`SubtourEliminator`]. The selected edges are decomposed into cycles; when
//! the shortest one misses some city, a constraint forbidding that exact cycle
//! is sent back to the engine.

use mip::{
    callback::{Candidate, LazyConstraintCallback, LazyContext},
    model::LinearConstraint,
};

use crate::{
    city::CityId,
    formulation::TspFormulation,
    graph::{Adjacency, EdgeKey, decompose_adjacency, shortest_cycle},
};

/// Cut produced for one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct SubtourCut {
    pub cycle: Vec<CityId>,
    pub constraint: LinearConstraint,
}

/// Decides whether `selected` (a 2-regular edge set over every city of
/// `formulation`) needs a subtour cut.
///
/// Returns `None` when the edges form one tour through all cities.
///
/// # Panics
///
/// Panics when a city does not have exactly two selected edges. The degree
/// rows make that impossible for a correct MIP engine.
pub fn subtour_cut(formulation: &TspFormulation, selected: &[EdgeKey]) -> Option<SubtourCut> {
    let cities = formulation.city_ids();
    let adjacency = Adjacency::from_edges(selected);

    let irregular = adjacency.irregular(cities.iter().copied());
    assert!(
        irregular.is_empty(),
        "candidate is not 2-regular; (city, degree) = {irregular:?}"
    );

    let cycles = decompose_adjacency(&cities, &adjacency);
    let cycle_count = cycles.len();
    let cycle = shortest_cycle(cycles);
    if cycle.len() >= formulation.city_count() {
        return None;
    }

    log::debug!(
        "lazy: subtour size={} cycles={cycle_count} first={}",
        cycle.len(),
        cycle.first().map_or(0, |city| city.index())
    );
    let constraint = formulation.subtour_constraint(&cycle);
    Some(SubtourCut { cycle, constraint })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EliminationStats {
    /// Integer-feasible candidates inspected.
    pub candidates: u64,
    pub cuts: u64,
    pub smallest_subtour: Option<usize>,
}

/// Lazy-constraint callback that forbids the shortest subtour of each
/// candidate.
#[derive(Debug)]
pub struct SubtourEliminator<'a> {
    formulation: &'a TspFormulation,
    stats: EliminationStats,
}

impl<'a> SubtourEliminator<'a> {
    pub fn new(formulation: &'a TspFormulation) -> Self {
        Self {
            formulation,
            stats: EliminationStats::default(),
        }
    }

    pub fn stats(&self) -> EliminationStats {
        self.stats
    }
}

impl LazyConstraintCallback for SubtourEliminator<'_> {
    fn on_candidate(&mut self, candidate: &Candidate<'_>, ctx: &mut LazyContext) {
        self.stats.candidates += 1;
        let selected = self.formulation.selected_edges(candidate.values());

        let Some(cut) = subtour_cut(self.formulation, &selected) else {
            log::debug!(
                "lazy: tour accepted node={} objective={:.6}",
                candidate.node(),
                candidate.objective()
            );
            return;
        };

        self.stats.cuts += 1;
        let size = cut.cycle.len();
        self.stats.smallest_subtour = Some(
            self.stats
                .smallest_subtour
                .map_or(size, |smallest| smallest.min(size)),
        );
        log::trace!("lazy: node={} cut {}", candidate.node(), cut.constraint);
        ctx.add_lazy(cut.constraint);
    }
}
