//! Per-second clock state for every tracked location.

use chrono::{DateTime, Offset, Timelike, Utc};
use chrono_tz::Tz;

use crate::{
    model::Location,
    store::{Entry, LocationId},
};

/// Hand positions in degrees, clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    pub fn at<T: Timelike>(time: &T) -> Self {
        let (h, m, s) = (time.hour(), time.minute(), time.second());
        Self {
            hour: f64::from(h % 12) * 30.0 + f64::from(m) / 2.0,
            minute: f64::from(m) * 6.0,
            second: f64::from(s) * 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    pub id: LocationId,
    pub local_time: DateTime<Tz>,
    /// Seconds east of UTC at `local_time`.
    pub utc_offset_secs: i32,
    pub hands: HandAngles,
    /// Face label, e.g. "LON gb".
    pub label: String,
}

impl ClockState {
    pub fn compute(id: LocationId, location: &Location, now: DateTime<Utc>) -> Self {
        let local_time = now.with_timezone(&location.timezone);
        let utc_offset_secs = local_time.offset().fix().local_minus_utc();
        let label = format!("{} {}", location.abbreviation(), location.country_code)
            .trim_end()
            .to_string();

        Self {
            id,
            hands: HandAngles::at(&local_time),
            local_time,
            utc_offset_secs,
            label,
        }
    }
}

/// Recompute every clock for `now`, in store order.
pub fn sync(entries: &[Entry], now: DateTime<Utc>) -> Vec<ClockState> {
    entries
        .iter()
        .map(|e| ClockState::compute(e.id, &e.location, now))
        .collect()
}

/// "Δ"-line text comparing a location's UTC offset with the one before it.
///
/// A zero difference reads as "behind".
pub fn offset_annotation(prev_city: &str, prev_offset_secs: i32, offset_secs: i32) -> String {
    let diff = offset_secs - prev_offset_secs;
    let abs = diff.unsigned_abs();
    let direction = if diff > 0 { "ahead of" } else { "behind" };
    format!("{}h {}m {direction} {prev_city}", abs / 3600, abs % 3600 / 60)
}
