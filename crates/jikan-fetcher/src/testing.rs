//! Scripted in-memory API for exercising the pipeline without a network.

use crate::api::types::UpstreamError;
use crate::api::JikanApi;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

enum PageScript {
    Items(Vec<Value>),
    Fail,
}

/// Fake upstream API driven by scripted responses.
///
/// Season pages are consumed in insertion order per (year, season);
/// once a script runs out, further pages come back empty. Character and
/// review responses are keyed by anime id; ids without a script come
/// back empty.
#[derive(Default)]
pub struct ScriptedApi {
    season_pages: HashMap<(i32, String), VecDeque<PageScript>>,
    characters: HashMap<i64, Vec<Value>>,
    reviews: HashMap<i64, Vec<Value>>,
    failing_characters: Vec<i64>,
    failing_reviews: Vec<i64>,
    season_calls: usize,
}

impl ScriptedApi {
    /// Queue one season page of items
    pub fn add_season_page(&mut self, year: i32, season: &str, items: Vec<Value>) {
        self.season_pages
            .entry((year, season.to_string()))
            .or_default()
            .push_back(PageScript::Items(items));
    }

    /// Queue a failing season page
    pub fn fail_season_page(&mut self, year: i32, season: &str) {
        self.season_pages
            .entry((year, season.to_string()))
            .or_default()
            .push_back(PageScript::Fail);
    }

    /// Script the character roster for an anime id
    pub fn set_characters(&mut self, anime_id: i64, entries: Vec<Value>) {
        self.characters.insert(anime_id, entries);
    }

    /// Script the reviews for an anime id
    pub fn set_reviews(&mut self, anime_id: i64, entries: Vec<Value>) {
        self.reviews.insert(anime_id, entries);
    }

    /// Make the character call fail for an anime id
    pub fn fail_characters(&mut self, anime_id: i64) {
        self.failing_characters.push(anime_id);
    }

    /// Make the review call fail for an anime id
    pub fn fail_reviews(&mut self, anime_id: i64) {
        self.failing_reviews.push(anime_id);
    }

    /// Number of season-page calls made so far
    pub fn season_calls(&self) -> usize {
        self.season_calls
    }
}

fn scripted_failure(endpoint: String) -> UpstreamError {
    UpstreamError {
        endpoint,
        cause: crate::api::UpstreamCause::Status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[async_trait]
impl JikanApi for ScriptedApi {
    async fn season_page(
        &mut self,
        year: i32,
        season: &str,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.season_calls += 1;

        let script = self
            .season_pages
            .get_mut(&(year, season.to_string()))
            .and_then(VecDeque::pop_front);

        match script {
            Some(PageScript::Items(items)) => Ok(items),
            Some(PageScript::Fail) => Err(scripted_failure(format!(
                "/seasons/{}/{}?page={}",
                year, season, page
            ))),
            None => Ok(Vec::new()),
        }
    }

    async fn characters(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError> {
        if self.failing_characters.contains(&anime_id) {
            return Err(scripted_failure(format!("/anime/{}/characters", anime_id)));
        }
        Ok(self.characters.get(&anime_id).cloned().unwrap_or_default())
    }

    async fn reviews(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError> {
        if self.failing_reviews.contains(&anime_id) {
            return Err(scripted_failure(format!("/anime/{}/reviews", anime_id)));
        }
        Ok(self.reviews.get(&anime_id).cloned().unwrap_or_default())
    }
}
