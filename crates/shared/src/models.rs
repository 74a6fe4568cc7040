//! Flat row types produced by the normalization pass.
//!
//! Each type corresponds to one exported table. Missing or malformed
//! upstream fields are carried as `None`, never as a zero sentinel, in
//! the persisted form.

use serde::{Deserialize, Serialize};

/// Anime field projection variant.
///
/// The legacy dataset shape omitted the synopsis column; everything else
/// is shared. One flattening path is parameterized by this instead of
/// keeping two near-duplicate fetchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimeProjection {
    Current,
    Legacy,
}

impl AnimeProjection {
    /// Parse a projection name from configuration; unknown names fall
    /// back to the current variant.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "legacy" => AnimeProjection::Legacy,
            _ => AnimeProjection::Current,
        }
    }

    /// Column set for the flattened anime table, in export order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            AnimeProjection::Current => &[
                "anime_id",
                "title",
                "title_english",
                "synopsis",
                "genres",
                "status",
                "score",
                "scored_by",
                "type",
                "source",
                "episodes",
                "popularity",
                "members",
                "rank",
                "favorites",
                "season",
                "year",
            ],
            AnimeProjection::Legacy => &[
                "anime_id",
                "title",
                "title_english",
                "genres",
                "status",
                "score",
                "scored_by",
                "type",
                "source",
                "episodes",
                "popularity",
                "members",
                "rank",
                "favorites",
                "season",
                "year",
            ],
        }
    }

    /// Whether the synopsis column is part of this projection
    pub fn includes_synopsis(&self) -> bool {
        matches!(self, AnimeProjection::Current)
    }
}

/// One flattened anime entry, keyed by `anime_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimeRow {
    /// MyAnimeList ID (natural key; nullable only for malformed items,
    /// which the sink skips)
    pub anime_id: Option<i64>,

    pub title: Option<String>,
    pub title_english: Option<String>,
    /// Absent in the legacy projection
    pub synopsis: Option<String>,
    /// Genre names collapsed to a comma-joined string
    pub genres: Option<String>,
    pub status: Option<String>,

    pub score: Option<f64>,
    pub scored_by: Option<i64>,

    /// Media type (TV, Movie, OVA, ...)
    pub media_type: Option<String>,
    /// Source material type (Manga, Light novel, ...)
    pub source: Option<String>,
    pub episodes: Option<i64>,

    pub popularity: Option<i64>,
    pub members: Option<i64>,
    pub rank: Option<i64>,
    pub favorites: Option<i64>,

    pub season: Option<String>,
    pub year: Option<i64>,
}

/// One character entry for an anime; identity is (anime_id, character_id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterRow {
    pub anime_id: i64,
    pub character_id: Option<i64>,
    pub name: Option<String>,
    /// "Main" or "Supporting"
    pub role: Option<String>,
    pub favorites: Option<i64>,
}

/// One voice actor casting; identity is
/// (character_id, voice_actor_id, language).
///
/// Rows exist only for well-formed cast entries, so the actor columns
/// are non-nullable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceActorRow {
    pub character_id: Option<i64>,
    pub voice_actor_id: i64,
    pub voice_actor_name: String,
    pub voice_actor_language: String,
}

/// One user review, keyed by `review_id`, pointing back at its anime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRow {
    pub anime_id: i64,
    pub review_id: Option<i64>,
    pub score: Option<i64>,
    pub is_spoiler: Option<bool>,
    pub is_preliminary: Option<bool>,
    pub episodes_watched: Option<i64>,
    /// First upstream tag only; later tags are dropped
    pub tags: Option<String>,
    pub review_text: Option<String>,
}
