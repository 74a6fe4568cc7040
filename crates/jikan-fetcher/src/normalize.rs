//! Flattening rules: raw nested JSON items to flat rows.
//!
//! Every rule is a total function over a loosely typed item. An absent
//! or wrongly shaped key projects to `None`; a malformed record yields
//! null fields instead of aborting the batch.

use serde_json::Value;
use shared::models::{AnimeProjection, AnimeRow, CharacterRow, ReviewRow, VoiceActorRow};

fn field_str(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

fn field_i64(item: &Value, key: &str) -> Option<i64> {
    item.get(key).and_then(Value::as_i64)
}

fn field_f64(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

fn field_bool(item: &Value, key: &str) -> Option<bool> {
    item.get(key).and_then(Value::as_bool)
}

/// Collapse the `genres` sub-objects (`[{"name": ...}, ...]`) into a
/// single comma-joined string
fn join_genres(item: &Value) -> Option<String> {
    item.get("genres").and_then(Value::as_array).map(|genres| {
        genres
            .iter()
            .filter_map(|genre| genre.get("name").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    })
}

/// Flatten one raw seasonal anime item into a row.
///
/// The legacy projection never carries a synopsis; all other fields are
/// direct projections of the item.
pub fn flatten_anime(item: &Value, projection: AnimeProjection) -> AnimeRow {
    AnimeRow {
        anime_id: field_i64(item, "mal_id"),
        title: field_str(item, "title"),
        title_english: field_str(item, "title_english"),
        synopsis: if projection.includes_synopsis() {
            field_str(item, "synopsis")
        } else {
            None
        },
        genres: join_genres(item),
        status: field_str(item, "status"),
        score: field_f64(item, "score"),
        scored_by: field_i64(item, "scored_by"),
        media_type: field_str(item, "type"),
        source: field_str(item, "source"),
        episodes: field_i64(item, "episodes"),
        popularity: field_i64(item, "popularity"),
        members: field_i64(item, "members"),
        rank: field_i64(item, "rank"),
        favorites: field_i64(item, "favorites"),
        season: field_str(item, "season"),
        year: field_i64(item, "year"),
    }
}

/// Flatten raw character entries (tagged with their anime id) into one
/// row per entry
pub fn flatten_characters(entries: &[(i64, Value)]) -> Vec<CharacterRow> {
    entries
        .iter()
        .map(|(anime_id, entry)| {
            let character = entry.get("character");
            CharacterRow {
                anime_id: *anime_id,
                character_id: character.and_then(|c| field_i64(c, "mal_id")),
                name: character.and_then(|c| field_str(c, "name")),
                role: field_str(entry, "role"),
                favorites: field_i64(entry, "favorites"),
            }
        })
        .collect()
}

/// Expand each character entry's `voice_actors` list into one row per
/// (character, actor, language) triple.
///
/// Cast entries missing the actor id, name, or language are silently
/// skipped; an empty or absent cast list yields zero rows.
pub fn explode_voice_actors(entries: &[(i64, Value)]) -> Vec<VoiceActorRow> {
    let mut rows = Vec::new();

    for (_, entry) in entries {
        let character_id = entry
            .get("character")
            .and_then(|c| field_i64(c, "mal_id"));

        let Some(cast) = entry.get("voice_actors").and_then(Value::as_array) else {
            continue;
        };

        for actor in cast {
            let Some(person) = actor.get("person") else {
                continue;
            };
            let (Some(voice_actor_id), Some(name), Some(language)) = (
                field_i64(person, "mal_id"),
                field_str(person, "name"),
                field_str(actor, "language"),
            ) else {
                continue;
            };

            rows.push(VoiceActorRow {
                character_id,
                voice_actor_id,
                voice_actor_name: name,
                voice_actor_language: language,
            });
        }
    }

    rows
}

/// Flatten raw review entries (tagged with their anime id) into one row
/// per entry.
///
/// Only the first upstream tag is retained; `None` when the tag list is
/// empty or absent. Callers needing full tag sets must treat this as
/// lossy.
pub fn flatten_reviews(entries: &[(i64, Value)]) -> Vec<ReviewRow> {
    entries
        .iter()
        .map(|(anime_id, entry)| ReviewRow {
            anime_id: *anime_id,
            review_id: field_i64(entry, "mal_id"),
            score: field_i64(entry, "score"),
            is_spoiler: field_bool(entry, "is_spoiler"),
            is_preliminary: field_bool(entry, "is_preliminary"),
            episodes_watched: field_i64(entry, "episodes_watched"),
            tags: entry
                .get("tags")
                .and_then(Value::as_array)
                .and_then(|tags| tags.first())
                .and_then(Value::as_str)
                .map(str::to_string),
            review_text: field_str(entry, "review"),
        })
        .collect()
}
