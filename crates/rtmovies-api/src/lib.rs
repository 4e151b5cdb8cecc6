//! API client library for rtmovies.
//!
//! Provides a client for the Rotten Tomatoes public API.

/// Rotten Tomatoes API client.
pub mod rotten_tomatoes;
