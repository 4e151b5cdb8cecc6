//! Wire-format response types and normalization.
//!
//! The API is inconsistent about field types: list endpoints send movie IDs
//! as strings while the single-movie endpoint sends numbers, and `year` /
//! `runtime` arrive as `""` when unknown. Those fields are decoded into
//! untagged enums here and converted to [`RtMovie`] right away, so nothing
//! outside this module sees the wire representation.

use std::collections::BTreeMap;

use serde::de::Error;
use serde::{Deserialize, Deserializer};

use super::error::{Result, RtError};
use super::types::{RtActor, RtMovie, RtRatings};

/// Critics score sent by the API when no score is available.
const CRITICS_SCORE_UNAVAILABLE: i32 = -1;

/// Deserializes empty strings as `None`.
fn deserialize_empty_string_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// Movie ID as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    /// Single-movie responses.
    Number(u64),
    /// List responses.
    Text(String),
}

/// Numeric field that degrades to a string when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireNumberOrText {
    /// Known value.
    Number(i64),
    /// Unknown value (usually `""`).
    Text(String),
}

/// Movie as sent by every endpoint.
#[derive(Debug, Deserialize)]
pub struct WireMovie {
    pub id: WireId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<WireNumberOrText>,
    #[serde(default)]
    pub mpaa_rating: String,
    #[serde(default)]
    pub runtime: Option<WireNumberOrText>,
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub critics_consensus: Option<String>,
    #[serde(default)]
    pub release_dates: BTreeMap<String, String>,
    #[serde(default)]
    pub ratings: WireRatings,
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub posters: BTreeMap<String, String>,
    #[serde(default)]
    pub abridged_cast: Vec<WireActor>,
    #[serde(default)]
    pub alternate_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

/// Ratings block.
#[derive(Debug, Default, Deserialize)]
pub struct WireRatings {
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub critics_rating: Option<String>,
    #[serde(default)]
    pub critics_score: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_empty_string_as_none")]
    pub audience_rating: Option<String>,
    #[serde(default)]
    pub audience_score: i32,
}

/// Cast entry.
#[derive(Debug, Deserialize)]
pub struct WireActor {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub characters: Vec<String>,
}

/// Response body of the search and list endpoints.
#[derive(Debug, Deserialize)]
pub struct WireMovieList {
    /// Total hits (search only).
    #[serde(default)]
    pub total: u64,
    pub movies: Vec<WireMovie>,
    #[serde(default)]
    #[allow(dead_code)]
    pub links: BTreeMap<String, String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub link_template: String,
}

/// API error response body.
#[derive(Debug, Deserialize)]
pub struct WireErrorResponse {
    pub error: String,
}

impl WireId {
    /// Converts the wire ID into an integer.
    fn normalize(self) -> Result<u64> {
        match self {
            Self::Number(id) => Ok(id),
            Self::Text(raw) => raw.parse::<u64>().map_err(|e| RtError::FieldConversion {
                field: "id",
                reason: e.to_string(),
                value: raw,
            }),
        }
    }
}

/// Converts a number-or-text field into `Option<u32>`.
///
/// Any string form means "unknown" and becomes `None`.
fn normalize_optional_u32(
    field: &'static str,
    value: Option<WireNumberOrText>,
) -> Result<Option<u32>> {
    match value {
        None | Some(WireNumberOrText::Text(_)) => Ok(None),
        Some(WireNumberOrText::Number(n)) => {
            u32::try_from(n)
                .map(Some)
                .map_err(|e| RtError::FieldConversion {
                    field,
                    value: n.to_string(),
                    reason: e.to_string(),
                })
        }
    }
}

impl From<WireRatings> for RtRatings {
    fn from(r: WireRatings) -> Self {
        Self {
            critics_rating: r.critics_rating,
            critics_score: r
                .critics_score
                .filter(|&score| score != CRITICS_SCORE_UNAVAILABLE),
            audience_rating: r.audience_rating,
            audience_score: r.audience_score,
        }
    }
}

impl From<WireActor> for RtActor {
    fn from(a: WireActor) -> Self {
        Self {
            name: a.name,
            id: a.id,
            characters: a.characters,
        }
    }
}

impl WireMovie {
    /// Normalizes the wire movie into an [`RtMovie`].
    ///
    /// # Errors
    ///
    /// Returns [`RtError::FieldConversion`] if the ID is not numeric or
    /// `year` / `runtime` is a number outside the `u32` range.
    pub fn normalize(self) -> Result<RtMovie> {
        Ok(RtMovie {
            id: self.id.normalize()?,
            title: self.title,
            year: normalize_optional_u32("year", self.year)?,
            mpaa_rating: self.mpaa_rating,
            runtime: normalize_optional_u32("runtime", self.runtime)?,
            critics_consensus: self.critics_consensus,
            release_dates: self.release_dates,
            ratings: self.ratings.into(),
            synopsis: self.synopsis,
            posters: self.posters,
            abridged_cast: self.abridged_cast.into_iter().map(RtActor::from).collect(),
            alternate_ids: self.alternate_ids,
            links: self.links,
        })
    }
}

impl WireMovieList {
    /// Normalizes every movie, preserving wire order.
    ///
    /// # Errors
    ///
    /// Fails on the first movie that cannot be normalized; no partial list
    /// is returned.
    pub fn into_movies(self) -> Result<Vec<RtMovie>> {
        self.movies.into_iter().map(WireMovie::normalize).collect()
    }
}
