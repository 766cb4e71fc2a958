use crate::{
    error::WorldClockError,
    model::{Coordinates, ForecastEntry, WeatherSnapshot},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions and 3-hourly forecasts.
///
/// The API key is passed per call because it is re-read from disk for every
/// request rather than captured when the provider is built.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        at: Coordinates,
        api_key: &str,
    ) -> Result<WeatherSnapshot, WorldClockError>;

    async fn forecast(
        &self,
        at: Coordinates,
        api_key: &str,
    ) -> Result<Vec<ForecastEntry>, WorldClockError>;
}
