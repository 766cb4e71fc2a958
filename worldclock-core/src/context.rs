use std::{path::PathBuf, sync::Arc};

use crate::{
    api_key::ApiKeyStore,
    config::Config,
    country::CountryAssets,
    error::WorldClockError,
    geocode::{Geocoder, NominatimGeocoder},
    http::build_client,
    provider::{OpenWeatherProvider, WeatherProvider},
    store::LocationResolver,
    timezone::{TimeApiLookup, TimezoneLookup},
};

/// Everything the dashboard and forecast view need from the outside world.
///
/// Built once at startup and shared by reference; nothing in the crate keeps
/// process-wide state of its own.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub api_keys: ApiKeyStore,
    pub weather: Arc<dyn WeatherProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub timezones: Arc<dyn TimezoneLookup>,
    pub assets: CountryAssets,
}

impl AppContext {
    /// Wire the HTTP-backed collaborators from `config`.
    pub fn from_config(config: Config, key_file: PathBuf) -> Result<Self, WorldClockError> {
        let http = build_client(&config)?;
        let endpoints = &config.endpoints;

        Ok(Self {
            api_keys: ApiKeyStore::new(key_file),
            weather: Arc::new(OpenWeatherProvider::new(&endpoints.weather, http.clone())),
            geocoder: Arc::new(NominatimGeocoder::new(&endpoints.geocoder, http.clone())),
            timezones: Arc::new(TimeApiLookup::new(&endpoints.timezone, http.clone())),
            assets: CountryAssets::new(&endpoints.country_shapes, &endpoints.flags, http),
            config,
        })
    }

    pub fn resolver(&self) -> LocationResolver {
        LocationResolver::new(Arc::clone(&self.geocoder), Arc::clone(&self.timezones))
    }
}
