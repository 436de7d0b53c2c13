//! Google Places "Nearby Search" backend.
//!
//! Endpoint: `GET .../place/nearbysearch/json?location=LAT,LNG&radius=R&type=T&key=K[&pagetoken=P]`
//!
//! Response shape (fields we read):
//!
//! ```text
//! {
//!   "status": "OK" | "ZERO_RESULTS" | "INVALID_REQUEST" | ...,
//!   "error_message": "...",
//!   "results": [ { "name": "...", "geometry": { "location": { "lat": f64, "lng": f64 } } } ],
//!   "next_page_token": "..."
//! }
//! ```

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::model::Place;
use crate::places::{NearbyPage, NearbyQuery, PlacesSource};

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

const ERROR_BODY_LIMIT: usize = 512;

// ============================================================================
// JSON Schema Structs
// ============================================================================

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<NearbyResult>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    #[serde(default)]
    name: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

pub struct GooglePlacesClient {
    http: Client,
    endpoint: String,
    api_key: String,
    place_type: String,
}

impl GooglePlacesClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        place_type: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("places-sweep/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            place_type: place_type.into(),
        })
    }

    pub fn from_config(cfg: &SweepConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SweepError::MissingApiKey)?;
        Self::new(
            api_key,
            cfg.endpoint.clone(),
            cfg.place_type.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn place_type(&self) -> &str {
        &self.place_type
    }

    /// Build the GET for one page; `page_token` is attached only on continuations.
    pub fn request(&self, query: &NearbyQuery, page_token: Option<&str>) -> RequestBuilder {
        let location = query.location.to_string();
        let radius = query.radius_m.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", self.place_type.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }
        self.http.get(&self.endpoint).query(&params)
    }
}

impl PlacesSource for GooglePlacesClient {
    fn nearby_page(&self, query: &NearbyQuery, page_token: Option<&str>) -> Result<NearbyPage> {
        let resp = self.request(query, page_token).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(SweepError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }
        parse_page(&body)
    }
}

/// Decode one Nearby Search response body.
///
/// A missing `results` list is an empty page and a missing `name` is an empty
/// string, but every result must carry `geometry.location.{lat,lng}`.
pub fn parse_page(body: &str) -> Result<NearbyPage> {
    let resp: NearbyResponse = serde_json::from_str(body)
        .map_err(|e| SweepError::MalformedResponse(e.to_string()))?;

    match resp.status.as_deref() {
        None | Some("OK") | Some("ZERO_RESULTS") => {}
        Some(other) => {
            return Err(SweepError::Api {
                status: other.to_string(),
                message: resp.error_message,
            });
        }
    }

    let places = resp
        .results
        .into_iter()
        .map(|r| Place {
            name: r.name.unwrap_or_default(),
            latitude: r.geometry.location.lat,
            longitude: r.geometry.location.lng,
        })
        .collect();

    Ok(NearbyPage {
        places,
        next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
    })
}
