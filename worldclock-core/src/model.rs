use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A tracked city.
///
/// The timezone is stored as a parsed [`Tz`], so a location read back from
/// the config file always carries a valid IANA identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub timezone: Tz,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_code: String,
}

impl Location {
    pub fn timezone_id(&self) -> &'static str {
        self.timezone.name()
    }

    /// Leading component of the timezone id, e.g. "Europe" for "Europe/London".
    pub fn timezone_region(&self) -> &'static str {
        let id = self.timezone_id();
        id.split('/').next().unwrap_or(id)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }

    /// First three characters of the city, upper-cased, as printed on the face.
    pub fn abbreviation(&self) -> String {
        self.city.chars().take(3).collect::<String>().to_uppercase()
    }
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub icon: String,
    pub description: String,
    pub precipitation_mm: f64,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn temperature_f(&self) -> i64 {
        celsius_to_fahrenheit(self.temperature_c)
    }
}

/// One 3-hour slot of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub icon: String,
    pub description: String,
    pub rain_3h_mm: f64,
    /// Probability of precipitation, 0.0 ..= 1.0.
    pub pop: f64,
}

pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i64
}

/// First character upper case, the rest lower case.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// How local times are printed in the info panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    #[default]
    TwelveHour,
    TwentyFourHour,
}

impl TimeFormat {
    pub fn from_24_hour(use_24_hour: bool) -> Self {
        if use_24_hour { Self::TwentyFourHour } else { Self::TwelveHour }
    }

    pub fn is_24_hour(self) -> bool {
        self == Self::TwentyFourHour
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::TwelveHour => Self::TwentyFourHour,
            Self::TwentyFourHour => Self::TwelveHour,
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Self::TwelveHour => "%Y-%m-%d %I:%M %p",
            Self::TwentyFourHour => "%Y-%m-%d %H:%M",
        }
    }

    pub fn format(self, time: &DateTime<Tz>) -> String {
        time.format(self.pattern()).to_string()
    }
}
