//! Ordered list of tracked cities and the lookups that create them.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    error::WorldClockError,
    geocode::Geocoder,
    model::{Location, capitalize},
    timezone::TimezoneLookup,
};

/// Handle for an entry while it stays in the store.
///
/// Positions shift when earlier entries are removed; the id does not, which
/// keeps late weather results from landing on the wrong row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: LocationId,
    pub location: Location,
}

#[derive(Debug, Default, Clone)]
pub struct LocationStore {
    entries: Vec<Entry>,
    next_id: u64,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let mut store = Self::new();
        for location in locations {
            store.push(location);
        }
        store
    }

    pub fn push(&mut self, location: Location) -> LocationId {
        let id = LocationId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, location });
        id
    }

    /// Remove the entry at `position` (0-based).
    pub fn remove(&mut self, position: usize) -> Option<Entry> {
        (position < self.entries.len()).then(|| self.entries.remove(position))
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter().map(|e| &e.location)
    }

    pub fn to_locations(&self) -> Vec<Location> {
        self.locations().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capitalise the way city names are shown: first letter upper, rest lower.
pub fn normalize_city(raw: &str) -> String {
    capitalize(raw.trim())
}

/// Turns a typed city name into a [`Location`].
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneLookup>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, timezones: Arc<dyn TimezoneLookup>) -> Self {
        Self { geocoder, timezones }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, raw: &str) -> Result<Location, WorldClockError> {
        let city = normalize_city(raw);
        if city.is_empty() {
            return Err(WorldClockError::EmptyQuery);
        }

        let at = self
            .geocoder
            .forward(&city)
            .await?
            .ok_or_else(|| WorldClockError::GeocodeNotFound(city.clone()))?;

        let timezone = self
            .timezones
            .timezone_at(at)
            .await?
            .ok_or_else(|| WorldClockError::TimezoneNotFound(city.clone()))?;

        let country_code = self
            .geocoder
            .reverse(at)
            .await?
            .and_then(|a| a.country_code)
            .unwrap_or_default();

        info!(%city, zone = timezone.name(), %country_code, "resolved location");

        Ok(Location {
            city,
            timezone,
            latitude: at.latitude,
            longitude: at.longitude,
            country_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geocode::Address, model::Coordinates};
    use async_trait::async_trait;
    use chrono_tz::Tz;

    fn loc(city: &str) -> Location {
        Location {
            city: city.into(),
            timezone: chrono_tz::UTC,
            latitude: 0.0,
            longitude: 0.0,
            country_code: String::new(),
        }
    }

    #[test]
    fn normalize_city_matches_display_casing() {
        assert_eq!(normalize_city("  new YORK "), "New york");
        assert_eq!(normalize_city("london"), "London");
        assert_eq!(normalize_city("östersund"), "Östersund");
        assert_eq!(normalize_city("   "), "");
    }

    #[test]
    fn remove_keeps_order_and_ids() {
        let mut store = LocationStore::from_locations([loc("A"), loc("B"), loc("C")]);
        let c_id = store.entries()[2].id;

        let removed = store.remove(1).expect("entry");
        assert_eq!(removed.location.city, "B");

        let cities: Vec<_> = store.locations().map(|l| l.city.as_str()).collect();
        assert_eq!(cities, ["A", "C"]);
        assert_eq!(store.entries()[1].id, c_id);
        assert!(!store.contains(removed.id));
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut store = LocationStore::from_locations([loc("A")]);
        assert!(store.remove(3).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicates_get_distinct_ids() {
        let mut store = LocationStore::new();
        let a = store.push(loc("Paris"));
        let b = store.push(loc("Paris"));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[derive(Debug)]
    struct FakeGeocoder {
        hit: Option<Coordinates>,
        country: Option<&'static str>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn forward(&self, _query: &str) -> Result<Option<Coordinates>, WorldClockError> {
            Ok(self.hit)
        }

        async fn reverse(&self, _at: Coordinates) -> Result<Option<Address>, WorldClockError> {
            Ok(Some(Address { country_code: self.country.map(str::to_string) }))
        }
    }

    #[derive(Debug)]
    struct FakeZones(Option<Tz>);

    #[async_trait]
    impl TimezoneLookup for FakeZones {
        async fn timezone_at(&self, _at: Coordinates) -> Result<Option<Tz>, WorldClockError> {
            Ok(self.0)
        }
    }

    fn resolver(hit: Option<Coordinates>, zone: Option<Tz>, country: Option<&'static str>) -> LocationResolver {
        LocationResolver::new(
            Arc::new(FakeGeocoder { hit, country }),
            Arc::new(FakeZones(zone)),
        )
    }

    const OSLO: Coordinates = Coordinates { latitude: 59.91, longitude: 10.75 };

    #[tokio::test]
    async fn resolve_builds_location() {
        let loc = resolver(Some(OSLO), Some(chrono_tz::Europe::Oslo), Some("no"))
            .resolve("oslo")
            .await
            .expect("resolve");

        assert_eq!(loc.city, "Oslo");
        assert_eq!(loc.timezone_id(), "Europe/Oslo");
        assert_eq!(loc.country_code, "no");
        assert_eq!(loc.latitude, 59.91);
    }

    #[tokio::test]
    async fn resolve_reports_unknown_city() {
        let err = resolver(None, Some(chrono_tz::UTC), None).resolve("atlantis").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find location: Atlantis");
    }

    #[tokio::test]
    async fn resolve_reports_missing_timezone() {
        let err = resolver(Some(OSLO), None, None).resolve("oslo").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not determine timezone for Oslo");
    }

    #[tokio::test]
    async fn resolve_tolerates_missing_country() {
        let loc = resolver(Some(OSLO), Some(chrono_tz::Europe::Oslo), None)
            .resolve("oslo")
            .await
            .expect("resolve");
        assert_eq!(loc.country_code, "");
    }

    #[tokio::test]
    async fn resolve_rejects_blank_input() {
        let err = resolver(Some(OSLO), None, None).resolve("  ").await.unwrap_err();
        assert!(matches!(err, WorldClockError::EmptyQuery));
    }
}
