use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{Error, Result, tour::Tour};

/// Writes `tour` as `name,lat,lng` lines to `path`, or stdout when `None`.
pub fn write_tour(tour: &Tour, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!(
                    "failed to create output file {}: {e}",
                    path.display()
                ))
            })?;
            write_lines(tour, BufWriter::new(file))
        }
        None => write_lines(tour, BufWriter::new(io::stdout().lock())),
    }
}

fn write_lines(tour: &Tour, mut out: impl Write) -> Result<()> {
    for city in &tour.cities {
        writeln!(out, "{city}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_lines, write_tour};
    use crate::{
        city::{City, CityId, CitySet},
        tour::Tour,
    };

    fn tour() -> Tour {
        let cities = CitySet::new(vec![
            City::from_lat_lng("a", 0.5, 1.0),
            City::from_lat_lng("b", 2.0, -3.25),
            City::from_lat_lng("c", 4.0, 5.0),
        ])
        .expect("valid cities");
        Tour::from_order(&cities, vec![CityId::new(2), CityId::new(0), CityId::new(1)])
    }

    #[test]
    fn lines_are_name_lat_lng_in_tour_order() {
        let mut buf = Vec::new();
        write_lines(&tour(), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "c,4.0,5.0\na,0.5,1.0\nb,2.0,-3.25\n");
    }

    #[test]
    fn write_tour_creates_file() {
        let path = std::env::temp_dir().join(format!("tsp-cuts-out-{}.txt", std::process::id()));
        write_tour(&tour(), Some(&path)).expect("write file");
        let text = std::fs::read_to_string(&path).expect("read back");
        let _ = std::fs::remove_file(&path);
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("c,4.0,5.0\n"));
    }
}
