//! Error type for Rotten Tomatoes API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the Rotten Tomatoes client.
pub type Result<T> = std::result::Result<T, RtError>;

/// Coarse classification of an [`RtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum RtErrorKind {
    /// The client was misconfigured.
    Configuration,
    /// A caller-supplied argument was rejected before any request was made.
    InvalidArgument,
    /// The HTTP round trip did not complete successfully.
    Transport,
    /// The response body did not match the expected JSON shape.
    Decode,
    /// A numeric field could not be normalized.
    FieldConversion,
}

/// Error returned by [`RtClient`](super::RtClient) operations.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum RtError {
    /// The client could not be built.
    #[error("invalid client configuration: {message}")]
    Build {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The HTTP client backend could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// An argument was rejected before sending the request.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {path}")]
    Transport {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success HTTP status.
    #[error("Rotten Tomatoes API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Error message from the response body.
        message: String,
    },

    /// The response body is not JSON of the expected shape.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Endpoint path relative to the base URL.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A field expected to be numeric-or-absent could not be converted.
    #[error("failed to convert field `{field}` (value: {value:?}): {reason}")]
    FieldConversion {
        /// Wire field name.
        field: &'static str,
        /// Raw wire value.
        value: String,
        /// Why the conversion failed.
        reason: String,
    },
}

impl RtError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> RtErrorKind {
        match self {
            Self::Build { .. } | Self::HttpClient(_) => RtErrorKind::Configuration,
            Self::InvalidArgument(_) => RtErrorKind::InvalidArgument,
            Self::Transport { .. } | Self::Status { .. } => RtErrorKind::Transport,
            Self::Decode { .. } => RtErrorKind::Decode,
            Self::FieldConversion { .. } => RtErrorKind::FieldConversion,
        }
    }

    /// Shorthand for building a [`RtError::Build`].
    pub(crate) fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}
