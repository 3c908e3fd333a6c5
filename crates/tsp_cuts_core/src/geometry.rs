use crate::city::City;

pub(crate) struct TourGeometry;

impl TourGeometry {
    #[inline]
    pub(crate) fn dist(a: &City, b: &City) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Legs of the closed tour through `cities`; leg `i` runs from `cities[i]`
    /// to `cities[i + 1]`, the last one back to `cities[0]`.
    pub(crate) fn leg_lengths(cities: &[City]) -> Vec<f64> {
        let n = cities.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| Self::dist(&cities[i], &cities[(i + 1) % n]))
            .collect()
    }

    pub(crate) fn tour_length(cities: &[City]) -> f64 {
        Self::leg_lengths(cities).iter().sum()
    }
}
