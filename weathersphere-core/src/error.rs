use thiserror::Error;

/// Shown for any request that could not complete.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Unable to fetch weather data. Please check your connection and try again.";

/// Shown when the provider answers with a non-success status.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Please enter a valid city name.";

/// Everything that can go wrong during a single lookup cycle.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather provider response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("weather provider rejected the request with status {status}")]
    NotFound { status: u16 },
}

impl LookupError {
    /// Text the user sees for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => CITY_NOT_FOUND_MESSAGE,
            LookupError::EmptyQuery
            | LookupError::Transport(_)
            | LookupError::Malformed(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}
