//! Normalized Rotten Tomatoes movie types.
//!
//! These are produced from the wire types in `wire` and never carry
//! wire sentinels such as `-1` or `""`.

use std::collections::BTreeMap;

/// A movie returned by any Rotten Tomatoes endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtMovie {
    /// Rotten Tomatoes movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: Option<u32>,
    /// MPAA rating (e.g., "PG-13", "Unrated").
    pub mpaa_rating: String,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Critics' consensus text.
    pub critics_consensus: Option<String>,
    /// Release dates keyed by kind ("theater", "dvd").
    pub release_dates: BTreeMap<String, String>,
    /// Critics and audience ratings.
    pub ratings: RtRatings,
    /// Synopsis.
    pub synopsis: Option<String>,
    /// Poster URLs keyed by size ("thumbnail", "profile", "detailed", "original").
    pub posters: BTreeMap<String, String>,
    /// Abridged cast list.
    pub abridged_cast: Vec<RtActor>,
    /// Alternate IDs keyed by source ("imdb").
    pub alternate_ids: BTreeMap<String, String>,
    /// API links keyed by kind ("self", "alternate", "cast", ...).
    pub links: BTreeMap<String, String>,
}

/// Critics and audience ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RtRatings {
    /// Critics' rating label (e.g., "Certified Fresh").
    pub critics_rating: Option<String>,
    /// Critics' score (0-100).
    pub critics_score: Option<i32>,
    /// Audience rating label (e.g., "Upright").
    pub audience_rating: Option<String>,
    /// Audience score (0-100).
    pub audience_score: i32,
}

/// A cast member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtActor {
    /// Actor name.
    pub name: String,
    /// Rotten Tomatoes celebrity ID.
    pub id: String,
    /// Characters played.
    pub characters: Vec<String>,
}
