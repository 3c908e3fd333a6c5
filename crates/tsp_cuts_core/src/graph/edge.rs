use std::fmt;

use crate::city::{CityId, CitySet};

/// Unordered city pair stored with the smaller id first, so `(a, b)` and
/// `(b, a)` map to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    a: CityId,
    b: CityId,
}

impl EdgeKey {
    pub fn new(u: CityId, v: CityId) -> Self {
        debug_assert_ne!(u, v, "edge endpoints must differ");
        if u <= v {
            Self { a: u, b: v }
        } else {
            Self { a: v, b: u }
        }
    }

    pub fn a(self) -> CityId {
        self.a
    }

    pub fn b(self) -> CityId {
        self.b
    }

    pub fn contains(self, city: CityId) -> bool {
        self.a == city || self.b == city
    }

    /// The endpoint opposite `city`, or `None` when `city` is not on the edge.
    pub fn other(self, city: CityId) -> Option<CityId> {
        if city == self.a {
            Some(self.b)
        } else if city == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub key: EdgeKey,
    pub weight: f64,
}

/// Every edge of the complete graph over a [`CitySet`], weighted by
/// Euclidean distance. Built once per instance.
#[derive(Clone, Debug)]
pub struct DistanceTable {
    city_count: usize,
    edges: Vec<Edge>,
}

impl DistanceTable {
    pub fn euclidean(cities: &CitySet) -> Self {
        let n = cities.len();
        let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                let (u, v) = (CityId::new(a), CityId::new(b));
                edges.push(Edge {
                    key: EdgeKey::new(u, v),
                    weight: cities[u].dist(&cities[v]),
                });
            }
        }

        log::debug!("graph: cities={n} edges={}", edges.len());
        Self {
            city_count: n,
            edges,
        }
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    /// Edges in canonical order `(0,1), (0,2), …, (n-2,n-1)`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}
