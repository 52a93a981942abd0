use thiserror::Error;

/// Transport-level failures reported by a provider implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Errors surfaced by the parkmap operations. None of them is fatal to the
/// application; each one narrows what the user can do until it clears.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkError {
    #[error("could not fetch parking data: {0}")]
    FetchFailure(#[source] ServiceError),
    #[error("no place found for \"{0}\"")]
    GeocodeNotFound(String),
    #[error("directions unavailable: {0}")]
    RouteUnavailable(String),
    #[error("current location unavailable: {0}")]
    GeolocationUnavailable(String),
}
