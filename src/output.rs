//! CSV output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SweepError};
use crate::model::Place;

pub const HEADER: [&str; 3] = ["Name", "Latitude", "Longitude"];

#[derive(Serialize)]
struct Row<'a> {
    name: &'a str,
    latitude: f64,
    longitude: f64,
}

/// Create or truncate `path` and write `places` to it as CSV.
pub fn write_places(places: &[Place], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| SweepError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_places_to(places, &mut out)?;
    out.flush().map_err(|e| SweepError::io(path, e))
}

/// Header row first (even when `places` is empty), then one row per place in order.
pub fn write_places_to<W: Write>(places: &[Place], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADER)?;
    for place in places {
        csv.serialize(Row {
            name: &place.name,
            latitude: place.latitude,
            longitude: place.longitude,
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}
