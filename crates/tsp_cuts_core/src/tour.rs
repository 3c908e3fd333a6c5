use std::fmt;

use crate::{
    city::{City, CityId, CitySet},
    geometry::TourGeometry,
};

/// Closed tour; the last city connects back to the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub order: Vec<CityId>,
    pub cities: Vec<City>,
}

impl Tour {
    pub fn from_order(set: &CitySet, order: Vec<CityId>) -> Self {
        let cities = order.iter().map(|&id| set[id].clone()).collect();
        Self { order, cities }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn length(&self) -> f64 {
        TourGeometry::tour_length(&self.cities)
    }

    pub fn tour_metrics(&self, threshold_factor: f64) -> TourMetrics {
        let n = self.len();

        if n < 2 {
            log::info!("metrics: n < 2 so there's nothing to report");
            return TourMetrics::default();
        }

        let legs = TourGeometry::leg_lengths(&self.cities);
        let total: f64 = legs.iter().sum();
        let average = total / (n as f64);
        let threshold = average * threshold_factor;
        let outliers = legs.iter().filter(|d| **d > threshold).count();
        let longest = legs.iter().copied().fold(0.0_f64, f64::max);

        log::info!(
            "metrics: n={n} total={total:.4} longest={longest:.4} avg={average:.4} outlier_threshold={threshold:.4} outliers={outliers}",
        );

        TourMetrics {
            longest,
            outliers,
            total,
            average,
            threshold,
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for city in &self.cities {
            writeln!(f, "{city}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub longest: f64,
    pub outliers: usize,
    pub total: f64,
    pub average: f64,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::Tour;
    use crate::city::{City, CityId, CitySet};

    fn strip() -> CitySet {
        CitySet::new(vec![
            City::from_lat_lng("a", 0.0, 0.0),
            City::from_lat_lng("b", 0.0, 1.0),
            City::from_lat_lng("c", 0.0, 2.0),
            City::from_lat_lng("d", 0.0, 10.0),
        ])
        .expect("valid cities")
    }

    #[test]
    fn from_order_copies_cities_in_tour_order() {
        let tour = Tour::from_order(&strip(), vec![CityId::new(2), CityId::new(0), CityId::new(3)]);
        let names: Vec<&str> = tour.cities.iter().map(City::name).collect();
        assert_eq!(names, vec!["c", "a", "d"]);
    }

    #[test]
    fn metrics_flag_long_legs() {
        let order = (0..4).map(CityId::new).collect();
        let tour = Tour::from_order(&strip(), order);
        let metrics = tour.tour_metrics(1.5);

        assert!((metrics.total - 20.0).abs() < 1e-12);
        assert!((tour.length() - 20.0).abs() < 1e-12);
        assert!((metrics.average - 5.0).abs() < 1e-12);
        assert!((metrics.longest - 10.0).abs() < 1e-12);
        assert!((metrics.threshold - 7.5).abs() < 1e-12);
        assert_eq!(metrics.outliers, 2);
    }

    #[test]
    fn metrics_are_empty_for_tiny_tours() {
        let tour = Tour::from_order(&strip(), vec![CityId::new(1)]);
        assert_eq!(tour.tour_metrics(2.0).outliers, 0);
        assert_eq!(tour.length(), 0.0);
    }

    #[test]
    fn display_prints_one_city_per_line() {
        let tour = Tour::from_order(&strip(), vec![CityId::new(0), CityId::new(1)]);
        assert_eq!(tour.to_string(), "a,0.0,0.0\nb,0.0,1.0\n");
    }
}
