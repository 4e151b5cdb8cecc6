//! Rotten Tomatoes API client module.
//!
//! Handles HTTP requests to the Rotten Tomatoes public API v1.0
//! and retrieves movie search results, box office and opening lists,
//! and single-movie details.

mod api;
mod client;
mod error;
mod types;
mod wire;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalRtApi, RtApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, RtClient, RtClientBuilder};
pub use error::{Result, RtError, RtErrorKind};
pub use types::{RtActor, RtMovie, RtRatings};
