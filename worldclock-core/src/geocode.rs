//! Forward and reverse geocoding against Nominatim (OpenStreetMap).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::{error::WorldClockError, http::read_body, model::Coordinates};

/// Parts of a reverse-geocoded address the dashboard uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Lower-case ISO 3166-1 alpha-2 code.
    pub country_code: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a free-form place name. `Ok(None)` means nothing matched.
    async fn forward(&self, query: &str) -> Result<Option<Coordinates>, WorldClockError>;

    async fn reverse(&self, at: Coordinates) -> Result<Option<Address>, WorldClockError>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    country_code: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, WorldClockError> {
    raw.trim()
        .parse()
        .map_err(|_| WorldClockError::MalformedResponse(format!("invalid {field} '{raw}'")))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn forward(&self, query: &str) -> Result<Option<Coordinates>, WorldClockError> {
        let res = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let body = read_body(res).await?;
        let hits: Vec<SearchHit> = serde_json::from_str(&body)?;

        let Some(hit) = hits.into_iter().next() else {
            debug!("no geocoding match");
            return Ok(None);
        };

        Ok(Some(Coordinates {
            latitude: parse_coordinate(&hit.lat, "latitude")?,
            longitude: parse_coordinate(&hit.lon, "longitude")?,
        }))
    }

    #[instrument(skip(self))]
    async fn reverse(&self, at: Coordinates) -> Result<Option<Address>, WorldClockError> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        let res = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("accept-language", "en"),
            ])
            .send()
            .await?;

        let body = read_body(res).await?;
        // Unknown coordinates come back as `{"error": "Unable to geocode"}`.
        let parsed: ReverseResponse = serde_json::from_str(&body)?;

        Ok(parsed.address.map(|a| Address {
            country_code: a
                .country_code
                .map(|c| c.to_lowercase())
                .filter(|c| !c.is_empty()),
        }))
    }
}
