//! Per-anime detail fetching: character rosters and reviews.
//!
//! Two independent passes over the id set, each through the same
//! rate-limited client. A failed id is logged and contributes no data,
//! but stays in the other pass and never halts the batch. Raw entries
//! accumulate tagged with their anime id and are flattened once at the
//! end, mirroring the collector's two-phase structure.

use crate::api::JikanApi;
use crate::normalize::{explode_voice_actors, flatten_characters, flatten_reviews};
use serde_json::Value;
use shared::models::{CharacterRow, ReviewRow, VoiceActorRow};
use tracing::{info, warn};

/// Flattened detail tables for one batch of anime ids
#[derive(Debug, Default)]
pub struct DetailSet {
    pub characters: Vec<CharacterRow>,
    pub voice_actors: Vec<VoiceActorRow>,
    pub reviews: Vec<ReviewRow>,
    /// Ids whose character call failed
    pub character_errors: usize,
    /// Ids whose review call failed
    pub review_errors: usize,
}

/// Fetch characters and reviews for every id, then flatten both
/// collections
pub async fn fetch_details(api: &mut impl JikanApi, ids: &[i64]) -> DetailSet {
    let mut set = DetailSet::default();

    let mut raw_characters: Vec<(i64, Value)> = Vec::new();
    for (idx, &anime_id) in ids.iter().enumerate() {
        match api.characters(anime_id).await {
            Ok(entries) => {
                raw_characters.extend(entries.into_iter().map(|entry| (anime_id, entry)));
            }
            Err(e) => {
                warn!(anime_id = anime_id, error = %e, "Character fetch failed, skipping id");
                set.character_errors += 1;
            }
        }
        if (idx + 1) % 25 == 0 || idx + 1 == ids.len() {
            info!(
                progress = format!("{}/{}", idx + 1, ids.len()),
                "Fetching character data"
            );
        }
    }

    let mut raw_reviews: Vec<(i64, Value)> = Vec::new();
    for (idx, &anime_id) in ids.iter().enumerate() {
        match api.reviews(anime_id).await {
            Ok(entries) => {
                raw_reviews.extend(entries.into_iter().map(|entry| (anime_id, entry)));
            }
            Err(e) => {
                warn!(anime_id = anime_id, error = %e, "Review fetch failed, skipping id");
                set.review_errors += 1;
            }
        }
        if (idx + 1) % 25 == 0 || idx + 1 == ids.len() {
            info!(
                progress = format!("{}/{}", idx + 1, ids.len()),
                "Fetching review data"
            );
        }
    }

    set.characters = flatten_characters(&raw_characters);
    set.voice_actors = explode_voice_actors(&raw_characters);
    set.reviews = flatten_reviews(&raw_reviews);

    info!(
        characters = set.characters.len(),
        voice_actors = set.voice_actors.len(),
        reviews = set.reviews.len(),
        character_errors = set.character_errors,
        review_errors = set.review_errors,
        "Detail fetch complete"
    );

    set
}
