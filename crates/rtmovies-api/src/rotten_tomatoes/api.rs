//! `RtApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::Result;
use super::types::RtMovie;

/// Rotten Tomatoes API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(RtApi: Send)]
pub trait LocalRtApi {
    /// Fetches a single movie by its Rotten Tomatoes ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty, the HTTP request fails, the body
    /// cannot be decoded, or the ID is not numeric.
    async fn get_movie(&self, id: &str) -> Result<RtMovie>;

    /// Searches movies by free-text query.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the body cannot be
    /// decoded, or any movie fails normalization.
    async fn search_movies(&self, query: &str) -> Result<Vec<RtMovie>>;

    /// Fetches the current box office list for a country.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the body cannot be
    /// decoded, or any movie fails normalization.
    async fn box_office(&self, country: &str) -> Result<Vec<RtMovie>>;

    /// Fetches the movies opening this week in a country.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the body cannot be
    /// decoded, or any movie fails normalization.
    async fn opening_movies(&self, country: &str) -> Result<Vec<RtMovie>>;
}
