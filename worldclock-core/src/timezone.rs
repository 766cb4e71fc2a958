//! Coordinate to IANA timezone lookup.

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{instrument, warn};

use crate::{error::WorldClockError, http::read_body, model::Coordinates};

#[async_trait]
pub trait TimezoneLookup: Send + Sync + Debug {
    /// `Ok(None)` when the service has no zone for these coordinates.
    async fn timezone_at(&self, at: Coordinates) -> Result<Option<Tz>, WorldClockError>;
}

/// Lookup backed by timeapi.io's coordinate endpoint.
#[derive(Debug, Clone)]
pub struct TimeApiLookup {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinateZone {
    time_zone: Option<String>,
}

impl TimeApiLookup {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl TimezoneLookup for TimeApiLookup {
    #[instrument(skip(self))]
    async fn timezone_at(&self, at: Coordinates) -> Result<Option<Tz>, WorldClockError> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        let res = self
            .http
            .get(format!("{}/api/timezone/coordinate", self.base_url))
            .query(&[("latitude", lat.as_str()), ("longitude", lon.as_str())])
            .send()
            .await?;

        if matches!(res.status(), StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
            return Ok(None);
        }

        let body = read_body(res).await?;
        let parsed: CoordinateZone = serde_json::from_str(&body)?;

        Ok(parsed.time_zone.as_deref().and_then(parse_zone))
    }
}

fn parse_zone(id: &str) -> Option<Tz> {
    match id.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(err) => {
            warn!(zone = id, error = %err, "timezone service returned an unknown zone");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_zone_accepts_iana_ids() {
        assert_eq!(parse_zone("Asia/Kolkata"), Some(chrono_tz::Asia::Kolkata));
    }

    #[test]
    fn parse_zone_rejects_unknown_ids() {
        assert_eq!(parse_zone("Moon/Tranquility"), None);
        assert_eq!(parse_zone(""), None);
    }
}
