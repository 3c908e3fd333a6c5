use std::collections::HashMap;

use crate::{city::CityId, graph::EdgeKey};

/// City → neighbours map for a selected edge set. Neighbour lists are sorted.
#[derive(Clone, Debug, Default)]
pub(crate) struct Adjacency {
    neighbors: HashMap<CityId, Vec<CityId>>,
}

impl Adjacency {
    pub(crate) fn from_edges<'a>(edges: impl IntoIterator<Item = &'a EdgeKey>) -> Self {
        let mut neighbors: HashMap<CityId, Vec<CityId>> = HashMap::new();
        for key in edges {
            neighbors.entry(key.a()).or_default().push(key.b());
            neighbors.entry(key.b()).or_default().push(key.a());
        }
        for list in neighbors.values_mut() {
            list.sort_unstable();
        }
        Self { neighbors }
    }

    pub(crate) fn neighbors(&self, city: CityId) -> &[CityId] {
        self.neighbors.get(&city).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn degree(&self, city: CityId) -> usize {
        self.neighbors(city).len()
    }

    /// Cities from `cities` whose degree is not two, with their degree.
    pub(crate) fn irregular(
        &self,
        cities: impl IntoIterator<Item = CityId>,
    ) -> Vec<(CityId, usize)> {
        cities
            .into_iter()
            .map(|city| (city, self.degree(city)))
            .filter(|&(_, degree)| degree != 2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Adjacency;
    use crate::{city::CityId, graph::EdgeKey};

    fn key(a: usize, b: usize) -> EdgeKey {
        EdgeKey::new(CityId::new(a), CityId::new(b))
    }

    #[test]
    fn neighbours_are_sorted_and_symmetric() {
        let edges = [key(2, 0), key(0, 1), key(1, 2)];
        let adjacency = Adjacency::from_edges(&edges);
        assert_eq!(
            adjacency.neighbors(CityId::new(0)),
            &[CityId::new(1), CityId::new(2)]
        );
        assert_eq!(
            adjacency.neighbors(CityId::new(2)),
            &[CityId::new(0), CityId::new(1)]
        );
        assert!(adjacency.neighbors(CityId::new(7)).is_empty());
    }

    #[test]
    fn irregular_reports_degree_violations() {
        let edges = [key(0, 1), key(1, 2), key(1, 3)];
        let adjacency = Adjacency::from_edges(&edges);
        let bad = adjacency.irregular((0..4).map(CityId::new));
        assert_eq!(
            bad,
            vec![
                (CityId::new(0), 1),
                (CityId::new(1), 3),
                (CityId::new(2), 1),
                (CityId::new(3), 1),
            ]
        );
    }
}
