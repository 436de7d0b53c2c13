use std::fmt;

use serde::Deserialize;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Shift by a number of degrees on each axis independently.
    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lng: self.lng + dlng,
        }
    }
}

/// Formats as `lat,lng`, the form the places endpoint takes for `location`.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A point of interest. Identity is the full (name, latitude, longitude) tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Hashable identity key. `-0.0` folds into `0.0` so the key agrees with `==`.
    pub fn key(&self) -> PlaceKey<'_> {
        PlaceKey {
            name: &self.name,
            lat_bits: canonical_bits(self.latitude),
            lng_bits: canonical_bits(self.longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceKey<'a> {
    name: &'a str,
    lat_bits: u64,
    lng_bits: u64,
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}
