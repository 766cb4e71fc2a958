//! Background fetching of current weather.
//!
//! Each poll spawns one task per location into a [`JoinSet`]. The owner
//! collects finished tasks on its own schedule and never waits on a request
//! unless it asks to via [`WeatherPoller::settle`].

use std::{collections::HashMap, sync::Arc};

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use crate::{
    error::WorldClockError,
    icons,
    model::WeatherSnapshot,
    provider::WeatherProvider,
    store::{Entry, LocationId, LocationStore},
    wind,
};

/// What the weather panel of one location currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPanel {
    Pending,
    Ready(WeatherSnapshot),
    Failed(String),
}

impl WeatherPanel {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Pending => vec!["Loading weather...".to_string()],
            Self::Failed(message) => vec![message.clone()],
            Self::Ready(snap) => vec![
                format!(
                    "{}°C ({}°F) {}",
                    snap.temperature_c,
                    snap.temperature_f(),
                    icons::glyph(&snap.icon)
                ),
                snap.description.clone(),
                format!("Wind: {}m/s {}", snap.wind_speed_mps, wind::arrow(snap.wind_deg)),
                format!("Humidity: {}%", snap.humidity_pct),
            ],
        }
    }
}

static PENDING: WeatherPanel = WeatherPanel::Pending;

#[derive(Debug)]
struct Completed {
    id: LocationId,
    generation: u64,
    result: Result<WeatherSnapshot, WorldClockError>,
}

#[derive(Debug)]
pub struct WeatherPoller {
    provider: Arc<dyn WeatherProvider>,
    tasks: JoinSet<Completed>,
    generation: u64,
    panels: HashMap<LocationId, (u64, WeatherPanel)>,
}

impl WeatherPoller {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            tasks: JoinSet::new(),
            generation: 0,
            panels: HashMap::new(),
        }
    }

    pub fn panel(&self, id: LocationId) -> &WeatherPanel {
        self.panels.get(&id).map_or(&PENDING, |(_, panel)| panel)
    }

    /// Requests started but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Start one request per entry. Must be called inside a tokio runtime.
    pub fn dispatch(&mut self, entries: &[Entry], api_key: &str) {
        self.generation += 1;
        let generation = self.generation;

        for entry in entries {
            let provider = Arc::clone(&self.provider);
            let id = entry.id;
            let at = entry.location.coordinates();
            let key = api_key.to_string();

            self.tasks.spawn(async move {
                let result = provider.current(at, &key).await;
                Completed { id, generation, result }
            });
        }

        debug!(generation, requests = entries.len(), "weather poll dispatched");
    }

    /// Show the same failure on every panel without issuing requests.
    pub fn fail_all(&mut self, entries: &[Entry], err: &WorldClockError) {
        self.generation += 1;
        for entry in entries {
            self.panels
                .insert(entry.id, (self.generation, WeatherPanel::Failed(err.to_string())));
        }
    }

    /// Apply every request that has already finished. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(joined) = self.tasks.try_join_next() {
            applied += usize::from(self.collect(joined));
        }
        applied
    }

    /// Wait until every dispatched request has finished or died.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            self.collect(joined);
        }
    }

    /// Drop cached state for locations that are gone.
    pub fn retain(&mut self, store: &LocationStore) {
        self.panels.retain(|id, _| store.contains(*id));
    }

    fn collect(&mut self, joined: Result<Completed, JoinError>) -> bool {
        match joined {
            Ok(done) => self.apply(done),
            Err(err) => {
                // The panel keeps its last value; the next poll tries again.
                warn!(error = %err, "weather task did not complete");
                false
            }
        }
    }

    fn apply(&mut self, done: Completed) -> bool {
        let panel = match done.result {
            Ok(snapshot) => WeatherPanel::Ready(snapshot),
            Err(err) => {
                warn!(error = %err, "weather request failed");
                WeatherPanel::Failed(err.to_string())
            }
        };

        match self.panels.get(&done.id) {
            Some((newer, _)) if *newer > done.generation => false,
            _ => {
                self.panels.insert(done.id, (done.generation, panel));
                true
            }
        }
    }
}
