use std::{collections::HashSet, fmt};

use crate::{Error, Result, geometry::TourGeometry};

pub(crate) const MIN_CITIES: usize = 3;

/// Dense index of a city inside its [`CitySet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CityId(usize);

impl CityId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named city. `x=lng` and `y=lat` in degrees, used as planar coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    name: String,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn from_lat_lng(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            x: lng,
            y: lat,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    pub fn lng(&self) -> f64 {
        self.x
    }

    pub fn dist(&self, rhs: &Self) -> f64 {
        TourGeometry::dist(self, rhs)
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && !self.name.trim().is_empty()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(
            f,
            "{},{},{}",
            self.name,
            b1.format(self.y),
            b2.format(self.x)
        )
    }
}

/// Validated, immutable list of cities for one problem instance.
#[derive(Clone, Debug, PartialEq)]
pub struct CitySet {
    cities: Vec<City>,
}

impl CitySet {
    pub fn new(cities: Vec<City>) -> Result<Self> {
        if cities.len() < MIN_CITIES {
            return Err(Error::invalid_input(format!(
                "need at least {MIN_CITIES} cities, got {}",
                cities.len()
            )));
        }

        let mut names = HashSet::with_capacity(cities.len());
        for (idx, city) in cities.iter().enumerate() {
            if !city.is_valid() {
                return Err(Error::invalid_input(format!(
                    "city {} ({:?}) has an empty name or non-finite coordinates",
                    idx + 1,
                    city.name
                )));
            }
            if !names.insert(city.name.as_str()) {
                return Err(Error::invalid_input(format!(
                    "duplicate city name {:?}",
                    city.name
                )));
            }
        }

        Ok(Self { cities })
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl std::ops::Index<CityId> for CitySet {
    type Output = City;

    fn index(&self, id: CityId) -> &Self::Output {
        &self.cities[id.index()]
    }
}
