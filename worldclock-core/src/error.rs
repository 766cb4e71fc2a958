use thiserror::Error;

/// Failures surfaced by the dashboard's collaborators.
///
/// The `Display` text of each variant is what ends up in the affected panel,
/// so it is written for the user rather than for logs.
#[derive(Debug, Error)]
pub enum WorldClockError {
    #[error("No API key provided")]
    MissingApiKey,

    #[error("Unauthorized API request. Please check your API key.")]
    Unauthorized,

    #[error("Bad request. Please check the API request format.")]
    BadRequest,

    #[error("API request failed: {0}")]
    NetworkFailure(String),

    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    #[error("Could not find location: {0}")]
    GeocodeNotFound(String),

    #[error("Could not determine timezone for {0}")]
    TimezoneNotFound(String),

    #[error("Failed to fetch images for {code}: {reason}")]
    ImageFetchFailure { code: String, reason: String },

    #[error("City name must not be empty")]
    EmptyQuery,

    #[error("Could not access API key file: {0}")]
    KeyStorage(#[from] std::io::Error),
}

impl WorldClockError {
    /// Message used when adding a location fails.
    ///
    /// Lookup misses keep their own wording, anything else is wrapped the way
    /// an unexpected collaborator failure is reported.
    pub fn add_location_message(&self) -> String {
        match self {
            Self::GeocodeNotFound(_) | Self::TimezoneNotFound(_) | Self::EmptyQuery => {
                self.to_string()
            }
            other => format!("Error adding location: {other}"),
        }
    }
}

impl From<reqwest::Error> for WorldClockError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WorldClockError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
