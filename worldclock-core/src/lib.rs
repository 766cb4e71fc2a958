//! Core library for the `worldclock` dashboard.
//!
//! This crate defines:
//! - Configuration, the API key file and the shared [`AppContext`]
//! - Clients for weather, geocoding, timezone and country-image services
//! - Per-second clock state, background weather polling and forecasts
//! - Text rendering of clock faces and info panels
//!
//! It is used by `worldclock-cli`, but can also be reused by other frontends.

pub mod api_key;
pub mod config;
pub mod context;
pub mod country;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod http;
pub mod icons;
pub mod model;
pub mod notices;
pub mod poller;
pub mod provider;
pub mod render;
pub mod store;
pub mod timesync;
pub mod timezone;
pub mod wind;

pub use api_key::{ApiKeyStore, KeyPrompt, KeyState, NoPrompt};
pub use config::{Config, Endpoints};
pub use context::AppContext;
pub use dashboard::{Dashboard, TickReport};
pub use error::WorldClockError;
pub use forecast::ForecastView;
pub use model::{Coordinates, ForecastEntry, Location, TimeFormat, WeatherSnapshot};
pub use provider::WeatherProvider;
pub use render::Frame;
pub use store::LocationStore;
