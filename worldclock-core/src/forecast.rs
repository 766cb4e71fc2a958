//! The on-demand forecast table for a single location.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    api_key::KeyPrompt,
    context::AppContext,
    country,
    error::WorldClockError,
    icons,
    model::{ForecastEntry, Location, capitalize, celsius_to_fahrenheit},
    wind,
};

/// Entries strictly after `now`, in their original order.
pub fn future_entries(entries: &[ForecastEntry], now: DateTime<Utc>) -> Vec<&ForecastEntry> {
    entries.iter().filter(|e| e.timestamp > now).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub time: String,
    pub temperature_c: i64,
    pub temperature_f: i64,
    pub glyph: &'static str,
    pub icon_path: Option<&'static str>,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_arrow: char,
    pub precipitation_mm: f64,
    pub precipitation_pct: i64,
}

impl ForecastRow {
    pub fn new(entry: &ForecastEntry, location: &Location) -> Self {
        // Fahrenheit is derived from the rounded Celsius value so the two
        // columns always agree with each other.
        let temperature_c = entry.temperature_c.round() as i64;

        Self {
            time: entry.timestamp.with_timezone(&location.timezone).format("%H:%M").to_string(),
            temperature_c,
            temperature_f: celsius_to_fahrenheit(temperature_c as f64),
            glyph: icons::glyph(&entry.icon),
            icon_path: icons::icon_path(&entry.icon),
            description: capitalize(&entry.description),
            humidity_pct: entry.humidity_pct,
            wind_speed_mps: entry.wind_speed_mps,
            wind_arrow: wind::arrow(entry.wind_deg),
            precipitation_mm: entry.rain_3h_mm,
            // Halves go to the even neighbour: 12.5% shows as 12%.
            precipitation_pct: (entry.pop * 100.0).round_ties_even() as i64,
        }
    }
}

pub const HEADER: [&str; 6] =
    ["Time", "Temperature °C (°F)", "Weather", "Humidity", "Wind Speed", "Precipitation"];

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub title: String,
    pub heading: &'static str,
    /// Either every row or the error that replaced them.
    pub body: Result<Vec<ForecastRow>, String>,
}

impl ForecastView {
    /// Fetch and tabulate the forecast for `location` as of `now`.
    pub async fn open(
        ctx: &AppContext,
        location: &Location,
        prompt: &dyn KeyPrompt,
        now: DateTime<Utc>,
    ) -> Self {
        let title = format!(
            "{}, {}",
            location.city,
            country::country_name(&location.country_code).unwrap_or("Unknown")
        );

        match Self::load_rows(ctx, location, prompt, now).await {
            Ok(rows) => {
                info!(city = %location.city, rows = rows.len(), "forecast loaded");
                Self { title, heading: "Weather forecast", body: Ok(rows) }
            }
            Err(err) => {
                warn!(city = %location.city, error = %err, "forecast failed");
                Self { title, heading: "Error loading forecast", body: Err(err.to_string()) }
            }
        }
    }

    async fn load_rows(
        ctx: &AppContext,
        location: &Location,
        prompt: &dyn KeyPrompt,
        now: DateTime<Utc>,
    ) -> Result<Vec<ForecastRow>, WorldClockError> {
        let api_key = ctx.api_keys.resolve(prompt)?;
        let entries = ctx.weather.forecast(location.coordinates(), &api_key).await?;

        Ok(future_entries(&entries, now)
            .into_iter()
            .map(|e| ForecastRow::new(e, location))
            .collect())
    }

    pub fn is_error(&self) -> bool {
        self.body.is_err()
    }
}

impl fmt::Display for ForecastView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.heading)?;
        writeln!(f)?;

        let rows = match &self.body {
            Ok(rows) => rows,
            Err(message) => return writeln!(f, "{message}"),
        };

        writeln!(
            f,
            "{:<6}  {:<20}  {:<28}  {:<8}  {:<12}  {}",
            HEADER[0], HEADER[1], HEADER[2], HEADER[3], HEADER[4], HEADER[5]
        )?;
        for row in rows {
            let temperature = format!("{}°C ({}°F)", row.temperature_c, row.temperature_f);
            let weather = format!("{} {}", row.glyph, row.description);
            let humidity = format!("{}%", row.humidity_pct);
            let wind = format!("{} m/s {}", row.wind_speed_mps, row.wind_arrow);
            writeln!(
                f,
                "{:<6}  {temperature:<20}  {weather:<28}  {humidity:<8}  {wind:<12}  {} mm ({}%)",
                row.time, row.precipitation_mm, row.precipitation_pct
            )?;
        }
        Ok(())
    }
}
