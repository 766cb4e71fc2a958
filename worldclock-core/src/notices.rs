use std::time::{Duration, Instant};

/// Short-lived messages, e.g. a city that could not be added.
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    items: Vec<(Instant, String)>,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, items: Vec::new() }
    }

    pub fn push(&mut self, now: Instant, message: impl Into<String>) {
        self.items.push((now + self.ttl, message.into()));
    }

    /// Messages still visible at `now`; expired ones are dropped.
    pub fn active(&mut self, now: Instant) -> Vec<String> {
        self.items.retain(|(expires, _)| *expires > now);
        self.items.iter().map(|(_, m)| m.clone()).collect()
    }
}
