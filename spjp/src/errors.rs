use crate::availability::schedule::ScheduleError;
use reqwest::StatusCode;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The request never produced a response (connect failure, timeout, TLS, ...)
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code
    #[error("Backend returned HTTP {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The backend answered successfully but reported an error in the payload
    #[error("{message}")]
    Backend { message: String },

    /// The response body was not the JSON shape we expect
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Schedule table could not be loaded
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns a user-safe error message, without leaking response bodies or transport details
    pub fn user_message(&self) -> String {
        match self {
            Error::Http { .. } => "Could not reach the badge server".to_string(),
            Error::Api { status, .. } => format!("HTTP error! status: {}", status.as_u16()),
            Error::Backend { message } => message.clone(),
            Error::Decode { what, .. } => format!("Unexpected {what} data from server"),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::Schedule(e) => e.to_string(),
            Error::Config { message } => message.clone(),
            Error::Other(_) => "Internal error".to_string(),
        }
    }

    /// Log the error at a level matching its severity.
    pub fn log(&self) {
        match self {
            Error::Http { .. } | Error::Other(_) => {
                tracing::error!("Catalog error: {:#}", self);
            }
            Error::Api { .. } | Error::Backend { .. } | Error::Decode { .. } => {
                tracing::warn!("Backend error: {}", self);
            }
            Error::Schedule(_) | Error::Config { .. } => {
                tracing::error!("Configuration error: {}", self);
            }
            Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Config { message }
    }
}

/// Type alias for catalog operation results
pub type Result<T> = std::result::Result<T, Error>;
