use std::{
    fmt, fs,
    io::Read,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    Error, Result,
    city::{City, CitySet},
    io::options::{InputFormat, SolverOptions},
};

/// Cities loaded for one run, with where they came from.
#[derive(Clone, Debug)]
pub struct SolverInput {
    source: Option<PathBuf>,
    format: InputFormat,
    cities: CitySet,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CityFile {
    Records(Vec<CityRecord>),
    Named(serde_json::Map<String, serde_json::Value>),
}

#[derive(Deserialize)]
struct CityRecord {
    name: String,
    lat: f64,
    #[serde(alias = "lon", alias = "long")]
    lng: f64,
}

impl SolverInput {
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let text = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        Self::from_text(&text, options.input_format, options.input_path())
    }

    pub fn from_text(text: &str, format: InputFormat, source: Option<&Path>) -> Result<Self> {
        let format = resolve_format(text, format, source);
        let cities = match format {
            InputFormat::Json => parse_json(text)?,
            _ => parse_points(text)?,
        };

        Ok(Self {
            source: source.map(Path::to_path_buf),
            format,
            cities: CitySet::new(cities)?,
        })
    }

    pub fn cities(&self) -> &CitySet {
        &self.cities
    }

}

impl fmt::Display for SolverInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.format {
            InputFormat::Json => "json",
            _ => "points",
        };
        match &self.source {
            Some(path) => write!(f, "source={} ", path.display())?,
            None => f.write_str("source=stdin ")?,
        }
        write!(f, "format={format} cities={}", self.cities.len())
    }
}

fn resolve_format(text: &str, format: InputFormat, source: Option<&Path>) -> InputFormat {
    if format != InputFormat::Auto {
        return format;
    }
    let json_ext = source
        .and_then(Path::extension)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let json_text = matches!(text.trim_start().chars().next(), Some('{' | '['));
    if json_ext || json_text {
        InputFormat::Json
    } else {
        InputFormat::Points
    }
}

fn parse_json(text: &str) -> Result<Vec<City>> {
    match serde_json::from_str::<CityFile>(text)? {
        CityFile::Records(records) => Ok(records
            .into_iter()
            .map(|r| City::from_lat_lng(r.name, r.lat, r.lng))
            .collect()),
        CityFile::Named(map) => map
            .into_iter()
            .map(|(name, value)| {
                let (lat, lng) = serde_json::from_value::<(f64, f64)>(value).map_err(|e| {
                    Error::invalid_input(format!("city {name:?}: expected [lat, lng]: {e}"))
                })?;
                Ok(City::from_lat_lng(name, lat, lng))
            })
            .collect(),
    }
}

fn parse_points(text: &str) -> Result<Vec<City>> {
    let mut cities = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        // Coordinates are the last two fields; the name keeps any commas.
        let fields: Vec<&str> = line.rsplitn(3, ',').map(str::trim).collect();
        let (name, lat_s, lng_s) = match fields.as_slice() {
            [lng, lat] => ((cities.len() + 1).to_string(), *lat, *lng),
            [lng, lat, name] if !name.is_empty() => ((*name).to_string(), *lat, *lng),
            _ => {
                return Err(Error::invalid_input(format!(
                    "Line {line_no}: expected 'lat,lng' or 'name,lat,lng' but got: {line}"
                )));
            }
        };

        let lat: f64 = lat_s.parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid latitude: {lat_s}"))
        })?;
        let lng: f64 = lng_s.parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid longitude: {lng_s}"))
        })?;
        cities.push(City::from_lat_lng(name, lat, lng));
    }

    if cities.is_empty() {
        return Err(Error::invalid_input("No cities provided."));
    }

    Ok(cities)
}
