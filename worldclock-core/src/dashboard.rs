//! The tick-driven scheduler that ties the store, clocks, weather and
//! rendering together.
//!
//! The owner calls [`Dashboard::tick`] once a second. Every tick recomputes
//! the clocks; ticks landing on a wall-clock second divisible by ten also
//! start a weather poll. Weather requests and city lookups run as background
//! tasks and their results are picked up by later ticks, so a tick never
//! waits on the network.

use std::{sync::Arc, time::Duration, time::Instant};

use chrono::{DateTime, Timelike, Utc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::{
    api_key::KeyPrompt,
    context::AppContext,
    error::WorldClockError,
    model::{Location, TimeFormat},
    notices::Notices,
    poller::WeatherPoller,
    render::{Frame, RenderSurface},
    store::LocationStore,
    timesync::{self, ClockState},
};

pub const WEATHER_INTERVAL_SECS: u32 = 10;

pub fn is_weather_tick(now: DateTime<Utc>) -> bool {
    now.second() % WEATHER_INTERVAL_SECS == 0
}

/// What a single [`Dashboard::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Locations whose lookup finished and were appended.
    pub added: usize,
    /// Whether a weather poll was started.
    pub polled: bool,
}

type Lookup = Result<Location, WorldClockError>;

#[derive(Debug)]
pub struct Dashboard {
    ctx: Arc<AppContext>,
    store: LocationStore,
    format: TimeFormat,
    clocks: Vec<ClockState>,
    poller: WeatherPoller,
    lookups: JoinSet<Lookup>,
    notices: Notices,
    surface: RenderSurface,
}

impl Dashboard {
    pub fn new(ctx: Arc<AppContext>, locations: Vec<Location>, format: TimeFormat) -> Self {
        let store = LocationStore::from_locations(locations);
        let clocks = timesync::sync(store.entries(), Utc::now());

        Self {
            poller: WeatherPoller::new(Arc::clone(&ctx.weather)),
            lookups: JoinSet::new(),
            notices: Notices::new(Duration::from_secs(ctx.config.notice_ttl_secs)),
            surface: RenderSurface::new(),
            ctx,
            store,
            format,
            clocks,
        }
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn clocks(&self) -> &[ClockState] {
        &self.clocks
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    pub fn toggle_format(&mut self) -> TimeFormat {
        self.format = self.format.toggle();
        self.format
    }

    /// Start resolving a typed city in the background.
    ///
    /// The location is appended by the first tick after the lookup finishes;
    /// a failed lookup leaves a transient notice instead.
    pub fn request_add(&mut self, raw: &str) {
        let resolver = self.ctx.resolver();
        let raw = raw.to_string();
        self.lookups.spawn(async move { resolver.resolve(&raw).await });
    }

    /// City lookups started but not yet applied.
    pub fn pending_adds(&self) -> usize {
        self.lookups.len()
    }

    /// Remove the location at a 0-based position and recompute right away.
    pub fn remove_location(&mut self, position: usize) -> Option<Location> {
        let removed = self.store.remove(position)?;
        info!(city = %removed.location.city, position, "removed location");
        self.poller.retain(&self.store);
        self.recompute(Utc::now());
        Some(removed.location)
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(Instant::now(), message);
    }

    /// One second of work. Never waits on a request.
    pub fn tick(&mut self, now: DateTime<Utc>, prompt: &dyn KeyPrompt) -> TickReport {
        let mut added = 0;
        while let Some(joined) = self.lookups.try_join_next() {
            added += usize::from(self.finish_lookup(joined));
        }

        let applied = self.poller.drain();
        if applied > 0 {
            debug!(applied, "weather results applied");
        }
        self.poller.retain(&self.store);
        self.recompute(now);

        let polled = is_weather_tick(now);
        if polled {
            self.poll_weather(prompt);
        }
        TickReport { added, polled }
    }

    /// Wait for every pending lookup and weather request and apply them.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.lookups.join_next().await {
            self.finish_lookup(joined);
        }
        self.poller.settle().await;
        self.poller.retain(&self.store);
        self.recompute(Utc::now());
    }

    /// Poll immediately and wait for every response.
    pub async fn refresh_weather(&mut self, prompt: &dyn KeyPrompt) {
        self.poll_weather(prompt);
        self.settle().await;
    }

    fn finish_lookup(&mut self, joined: Result<Lookup, JoinError>) -> bool {
        let lookup = joined.unwrap_or_else(|err| {
            warn!(error = %err, "location lookup task did not complete");
            Err(WorldClockError::NetworkFailure("lookup interrupted".to_string()))
        });

        match lookup {
            Ok(location) => {
                info!(city = %location.city, zone = location.timezone_id(), "added location");
                self.store.push(location);
                true
            }
            Err(err) => {
                self.notices.push(Instant::now(), err.add_location_message());
                false
            }
        }
    }

    fn poll_weather(&mut self, prompt: &dyn KeyPrompt) {
        if self.store.is_empty() {
            return;
        }
        let unfinished = self.poller.in_flight();
        if unfinished > 0 {
            debug!(unfinished, "previous weather poll still running");
        }
        match self.ctx.api_keys.resolve(prompt) {
            Ok(key) => self.poller.dispatch(self.store.entries(), &key),
            Err(err) => self.poller.fail_all(self.store.entries(), &err),
        }
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        self.clocks = timesync::sync(self.store.entries(), now);
    }

    pub fn frame(&mut self) -> Frame {
        let notices = self.notices.active(Instant::now());
        let rows = self
            .store
            .entries()
            .iter()
            .zip(&self.clocks)
            .map(|(entry, clock)| (&entry.location, clock, self.poller.panel(entry.id)));

        self.surface.frame(rows, self.format, notices)
    }
}
