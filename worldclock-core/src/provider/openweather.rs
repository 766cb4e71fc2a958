use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::WorldClockError,
    http::read_body,
    model::{Coordinates, ForecastEntry, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        at: Coordinates,
        api_key: &str,
    ) -> Result<String, WorldClockError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        read_body(res).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    // Omitted by the API in calm conditions.
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: Vec<OwWeather>) -> Result<OwWeather, WorldClockError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| WorldClockError::MalformedResponse("empty `weather` array".to_string()))
}

fn parse_current(body: &str) -> Result<WeatherSnapshot, WorldClockError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    let condition = first_condition(parsed.weather)?;
    let rain = parsed.rain.unwrap_or_default();

    Ok(WeatherSnapshot {
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        wind_deg: parsed.wind.deg,
        icon: condition.icon,
        description: condition.description,
        precipitation_mm: rain.one_hour.or(rain.three_hours).unwrap_or(0.0),
        observed_at: parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
    })
}

fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>, WorldClockError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    parsed
        .list
        .into_iter()
        .map(|entry| {
            let timestamp = unix_to_utc(entry.dt).ok_or_else(|| {
                WorldClockError::MalformedResponse(format!("invalid timestamp {}", entry.dt))
            })?;
            let condition = first_condition(entry.weather)?;

            Ok(ForecastEntry {
                timestamp,
                temperature_c: entry.main.temp,
                humidity_pct: entry.main.humidity,
                wind_speed_mps: entry.wind.speed,
                wind_deg: entry.wind.deg,
                icon: condition.icon,
                description: condition.description,
                rain_3h_mm: entry.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
                pop: entry.pop.unwrap_or(0.0),
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, api_key), fields(lat = %at.latitude, lon = %at.longitude))]
    async fn current(
        &self,
        at: Coordinates,
        api_key: &str,
    ) -> Result<WeatherSnapshot, WorldClockError> {
        let body = self.get("weather", at, api_key).await?;
        let snapshot = parse_current(&body)?;
        debug!(temp = snapshot.temperature_c, icon = %snapshot.icon, "current weather");
        Ok(snapshot)
    }

    #[instrument(skip(self, api_key), fields(lat = %at.latitude, lon = %at.longitude))]
    async fn forecast(
        &self,
        at: Coordinates,
        api_key: &str,
    ) -> Result<Vec<ForecastEntry>, WorldClockError> {
        let body = self.get("forecast", at, api_key).await?;
        let entries = parse_forecast(&body)?;
        debug!(entries = entries.len(), "forecast");
        Ok(entries)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
