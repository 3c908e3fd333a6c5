//! Degree-constrained edge formulation of the symmetric TSP.
//!
//! One binary per edge of the complete graph, weighted by its length, and one
//! `= 2` degree row per city. Subtour constraints are not part of the model;
//! they are added lazily by [`crate::SubtourEliminator`].

use std::collections::HashMap;

use mip::model::{LinearConstraint, MipModel, VarId};

use crate::{
    Result,
    city::CityId,
    graph::{DistanceTable, EdgeKey},
};

#[derive(Clone, Debug)]
pub struct TspFormulation {
    model: MipModel,
    city_count: usize,
    edge_vars: HashMap<EdgeKey, VarId>,
    var_edges: Vec<EdgeKey>,
}

impl TspFormulation {
    pub fn new(table: &DistanceTable) -> Result<Self> {
        let n = table.city_count();
        let mut model = MipModel::new();
        let edge_count = table.edges().len();
        let mut edge_vars = HashMap::with_capacity(edge_count);
        let mut var_edges = Vec::with_capacity(edge_count);
        let mut incident: Vec<Vec<VarId>> = vec![Vec::new(); n];

        for edge in table.edges() {
            let (a, b) = (edge.key.a(), edge.key.b());
            let var = model.add_binary(format!("x_{a}_{b}"), edge.weight);
            edge_vars.insert(edge.key, var);
            var_edges.push(edge.key);
            incident[a.index()].push(var);
            incident[b.index()].push(var);
        }

        for (city, vars) in incident.into_iter().enumerate() {
            model.add_constraint(
                LinearConstraint::equal(2.0)
                    .with_name(format!("degree_{city}"))
                    .with_terms(vars.into_iter().map(|var| (var, 1.0))),
            )?;
        }

        log::debug!(
            "formulation: cities={n} vars={} rows={}",
            model.num_vars(),
            model.num_constraints()
        );

        Ok(Self {
            model,
            city_count: n,
            edge_vars,
            var_edges,
        })
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    pub fn city_ids(&self) -> Vec<CityId> {
        (0..self.city_count).map(CityId::new).collect()
    }

    pub fn model(&self) -> &MipModel {
        &self.model
    }

    pub fn var(&self, key: EdgeKey) -> Option<VarId> {
        self.edge_vars.get(&key).copied()
    }

    /// Edges whose variable is above `0.5` in `values`.
    pub fn selected_edges(&self, values: &[f64]) -> Vec<EdgeKey> {
        self.var_edges
            .iter()
            .zip(values)
            .filter(|&(_, &value)| value > 0.5)
            .map(|(&key, _)| key)
            .collect()
    }

    /// `Σ x_ij over all pairs inside cycle <= |cycle| - 1`.
    pub fn subtour_constraint(&self, cycle: &[CityId]) -> LinearConstraint {
        let mut terms = Vec::with_capacity(cycle.len() * cycle.len().saturating_sub(1) / 2);
        for (i, &u) in cycle.iter().enumerate() {
            for &v in &cycle[i + 1..] {
                if u == v {
                    continue;
                }
                if let Some(var) = self.var(EdgeKey::new(u, v)) {
                    terms.push((var, 1.0));
                }
            }
        }

        let first = cycle.first().map_or(0, |city| city.index());
        LinearConstraint::le(cycle.len().saturating_sub(1) as f64)
            .with_name(format!("subtour_{first}_{}", cycle.len()))
            .with_terms(terms)
    }
}

#[cfg(test)]
mod tests {
    use mip::model::Sense;

    use super::TspFormulation;
    use crate::{
        city::{City, CityId, CitySet},
        graph::{DistanceTable, EdgeKey},
    };

    fn formulation(n: usize) -> TspFormulation {
        let cities = (0..n)
            .map(|i| City::from_lat_lng(format!("c{i}"), i as f64, (i * i) as f64))
            .collect();
        let cities = CitySet::new(cities).expect("valid cities");
        TspFormulation::new(&DistanceTable::euclidean(&cities)).expect("formulation")
    }

    fn key(a: usize, b: usize) -> EdgeKey {
        EdgeKey::new(CityId::new(a), CityId::new(b))
    }

    #[test]
    fn one_binary_per_edge_and_one_degree_row_per_city() {
        let tsp = formulation(5);
        assert_eq!(tsp.model().num_vars(), 10);
        assert_eq!(tsp.model().num_constraints(), 5);

        for row in tsp.model().constraints() {
            assert_eq!(row.sense, Sense::Eq);
            assert_eq!(row.rhs, 2.0);
            assert_eq!(row.terms.len(), 4);
        }
    }

    #[test]
    fn objective_is_edge_length() {
        let tsp = formulation(4);
        let var = tsp.var(key(3, 1)).expect("edge var");
        let length = ((2.0f64).powi(2) + (8.0f64).powi(2)).sqrt();
        let obj = tsp.model().var(var).expect("variable").obj;
        assert!((obj - length).abs() < 1e-12);
    }

    #[test]
    fn selected_edges_thresholds_at_one_half() {
        let tsp = formulation(3);
        let selected = tsp.selected_edges(&[0.9999, 0.5, 1e-7]);
        assert_eq!(selected, vec![key(0, 1)]);
    }

    #[test]
    fn subtour_constraint_covers_every_pair_in_cycle() {
        let tsp = formulation(7);
        let cycle = [CityId::new(0), CityId::new(1), CityId::new(2)];
        let cut = tsp.subtour_constraint(&cycle);

        assert_eq!(cut.sense, Sense::Le);
        assert_eq!(cut.rhs, 2.0);
        assert_eq!(cut.terms.len(), 3);
        for pair in [key(0, 1), key(0, 2), key(1, 2)] {
            let var = tsp.var(pair).expect("edge var");
            assert!(cut.terms.contains(&(var, 1.0)));
        }

        let square = [3, 4, 5, 6].map(CityId::new);
        let cut = tsp.subtour_constraint(&square);
        assert_eq!(cut.rhs, 3.0);
        assert_eq!(cut.terms.len(), 6);
    }
}
