//! Errors surfaced to the user through the banner instead of only the console.

/// Client-side failure. Kept `Clone + PartialEq` so it can sit in reducer state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with status {status}")]
    Http { status: u16 },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Rating must be a whole number from 1 to 5 (got {0})")]
    InvalidRating(String),

    #[error("You must be logged in to add a pin")]
    NotLoggedIn,

    #[error("Local storage unavailable")]
    Storage,
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::Decode(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
