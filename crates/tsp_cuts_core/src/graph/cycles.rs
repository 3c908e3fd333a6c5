//! Cycle decomposition of 2-regular edge selections.
//!
//! Cities are consumed from an ordered "unassigned" set. Each walk starts at
//! the smallest unassigned city, steps to its smaller neighbour and then keeps
//! moving to the neighbour it did not just come from. A walk ends when the next
//! city is already assigned or when there is nowhere left to go, so malformed
//! input (degree other than two) still terminates.

use std::collections::BTreeSet;

use crate::{
    city::CityId,
    graph::{Adjacency, EdgeKey},
};

/// Splits `cities` into the cycles formed by `edges`, in discovery order.
///
/// Each cycle starts at its smallest city. The result is independent of the
/// order of `edges`.
pub fn decompose_cycles(cities: &[CityId], edges: &[EdgeKey]) -> Vec<Vec<CityId>> {
    decompose_adjacency(cities, &Adjacency::from_edges(edges))
}

/// Shortest cycle formed by `edges` over `cities`.
///
/// Ties go to the cycle discovered first, which is the one holding the
/// smallest city id. A Hamiltonian edge set yields every city exactly once.
/// Returns an empty cycle when `cities` is empty.
pub fn find_shortest_cycle(cities: &[CityId], edges: &[EdgeKey]) -> Vec<CityId> {
    shortest_cycle(decompose_cycles(cities, edges))
}

pub(crate) fn decompose_adjacency(cities: &[CityId], adjacency: &Adjacency) -> Vec<Vec<CityId>> {
    let mut unassigned: BTreeSet<CityId> = cities.iter().copied().collect();
    let mut cycles = Vec::new();

    while let Some(start) = unassigned.pop_first() {
        let mut cycle = vec![start];
        let mut prev: Option<CityId> = None;
        let mut current = start;

        loop {
            let next = adjacency
                .neighbors(current)
                .iter()
                .copied()
                .find(|&city| Some(city) != prev);
            let Some(next) = next else {
                break;
            };
            if !unassigned.remove(&next) {
                break;
            }
            cycle.push(next);
            prev = Some(current);
            current = next;
        }

        log::trace!("cycles: start={start} len={}", cycle.len());
        cycles.push(cycle);
    }

    cycles
}

pub(crate) fn shortest_cycle(cycles: Vec<Vec<CityId>>) -> Vec<CityId> {
    cycles
        .into_iter()
        .min_by_key(Vec::len)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

    use super::{decompose_cycles, find_shortest_cycle};
    use crate::{city::CityId, graph::EdgeKey};

    fn ids(raw: &[usize]) -> Vec<CityId> {
        raw.iter().copied().map(CityId::new).collect()
    }

    fn ring(raw: &[usize]) -> Vec<EdgeKey> {
        let n = raw.len();
        (0..n)
            .map(|i| EdgeKey::new(CityId::new(raw[i]), CityId::new(raw[(i + 1) % n])))
            .collect()
    }

    fn all(n: usize) -> Vec<CityId> {
        (0..n).map(CityId::new).collect()
    }

    #[test]
    fn hamiltonian_chain_yields_every_city_once() {
        let n = 8;
        let order: Vec<usize> = (0..n).collect();
        let cycle = find_shortest_cycle(&all(n), &ring(&order));

        assert_eq!(cycle.len(), n);
        let mut sorted = cycle.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, all(n));
        assert_eq!(cycle, ids(&[0, 1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn walk_follows_edges_not_ids() {
        let cycle = find_shortest_cycle(&all(5), &ring(&[0, 3, 1, 4, 2]));
        assert_eq!(cycle, ids(&[0, 2, 4, 1, 3]));
    }

    #[test]
    fn triangle_beats_square() {
        let mut edges = ring(&[0, 1, 2]);
        edges.extend(ring(&[3, 4, 5, 6]));

        let cycle = find_shortest_cycle(&all(7), &edges);
        assert_eq!(cycle, ids(&[0, 1, 2]));
    }

    #[test]
    fn shortest_cycle_is_found_when_discovered_last() {
        let mut edges = ring(&[0, 1, 2, 3, 4]);
        edges.extend(ring(&[5, 6, 7]));

        let cycles = decompose_cycles(&all(8), &edges);
        assert_eq!(cycles.len(), 2);
        assert_eq!(find_shortest_cycle(&all(8), &edges), ids(&[5, 6, 7]));
    }

    #[test]
    fn equal_length_cycles_prefer_smallest_city() {
        let mut edges = ring(&[5, 1, 3]);
        edges.extend(ring(&[0, 4, 2]));

        let cycle = find_shortest_cycle(&all(6), &edges);
        assert_eq!(cycle, ids(&[0, 2, 4]));
    }

    #[test]
    fn repeated_calls_return_the_same_cycle() {
        let mut edges = ring(&[0, 4, 2]);
        edges.extend(ring(&[1, 3, 5]));
        let first = find_shortest_cycle(&all(6), &edges);

        edges.reverse();
        for _ in 0..3 {
            assert_eq!(find_shortest_cycle(&all(6), &edges), first);
        }
    }

    #[test]
    fn degree_violations_still_terminate() {
        let edges = vec![
            EdgeKey::new(CityId::new(0), CityId::new(1)),
            EdgeKey::new(CityId::new(1), CityId::new(2)),
            EdgeKey::new(CityId::new(1), CityId::new(3)),
            EdgeKey::new(CityId::new(3), CityId::new(9)),
        ];
        let cycles = decompose_cycles(&all(5), &edges);

        let covered: usize = cycles.iter().map(Vec::len).sum();
        assert_eq!(covered, 5);
        assert!(cycles.iter().any(|cycle| cycle == &ids(&[4])));
    }

    #[test]
    fn empty_city_set_yields_empty_cycle() {
        assert!(find_shortest_cycle(&[], &[]).is_empty());
        assert!(decompose_cycles(&[], &[]).is_empty());
    }

    #[test]
    fn random_two_regular_graphs_decompose_exactly() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let n = rng.gen_range(3..40);
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rng);

            let mut sizes = Vec::new();
            let mut rest = n;
            while rest > 0 {
                let size = if rest < 6 { rest } else { rng.gen_range(3..=rest - 3) };
                sizes.push(size);
                rest -= size;
            }

            let mut edges = Vec::new();
            let mut offset = 0;
            for &size in &sizes {
                edges.extend(ring(&order[offset..offset + size]));
                offset += size;
            }
            edges.shuffle(&mut rng);

            let cities = all(n);
            let cycles = decompose_cycles(&cities, &edges);
            assert_eq!(cycles.len(), sizes.len());

            let mut seen: Vec<CityId> = cycles.iter().flatten().copied().collect();
            seen.sort();
            assert_eq!(seen, cities);

            let shortest = find_shortest_cycle(&cities, &edges);
            let min_size = sizes.iter().copied().min().unwrap_or_default();
            assert_eq!(shortest.len(), min_size);
            assert!((3..=n).contains(&shortest.len()));

            for &city in &shortest {
                let inside = edges
                    .iter()
                    .filter(|key| key.contains(city))
                    .filter(|key| key.other(city).is_some_and(|o| shortest.contains(&o)))
                    .count();
                assert_eq!(inside, 2);
            }
        }
    }
}
