//! Page-by-page retrieval for one (year, season) partition.
//!
//! The sole end-of-data signal is a page with zero items; there is no
//! total-count header. A failed page ends the partition with whatever
//! was accumulated from earlier pages, never with an error.

use crate::api::types::UpstreamError;
use crate::api::JikanApi;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of fetching a single page
#[derive(Debug)]
pub enum PageFetch {
    /// Page returned one or more items
    Items(Vec<Value>),
    /// Page returned zero items: end of data for the partition
    End,
    /// Upstream call failed; the partition stops here
    Failed(UpstreamError),
}

/// Everything one partition produced, ordered by page then in-page order
#[derive(Debug, Default)]
pub struct SeasonPartition {
    pub items: Vec<Value>,
    /// True when the partition ended on a failed page rather than an
    /// empty one
    pub truncated: bool,
}

async fn fetch_page(
    api: &mut impl JikanApi,
    year: i32,
    season: &str,
    page: u32,
) -> PageFetch {
    match api.season_page(year, season, page).await {
        Ok(items) if items.is_empty() => PageFetch::End,
        Ok(items) => PageFetch::Items(items),
        Err(e) => PageFetch::Failed(e),
    }
}

/// Walk the seasonal listing for (year, season) from page 1 until the
/// first empty page or the first failure
pub async fn fetch_season(
    api: &mut impl JikanApi,
    year: i32,
    season: &str,
) -> SeasonPartition {
    let mut partition = SeasonPartition::default();
    let mut page = 1;

    loop {
        match fetch_page(api, year, season, page).await {
            PageFetch::Items(items) => {
                debug!(year = year, season = season, page = page, items = items.len(), "Fetched page");
                partition.items.extend(items);
                page += 1;
            }
            PageFetch::End => {
                debug!(year = year, season = season, page = page, "Empty page, end of partition");
                break;
            }
            PageFetch::Failed(e) => {
                warn!(
                    year = year,
                    season = season,
                    page = page,
                    error = %e,
                    "Page fetch failed, keeping partial partition"
                );
                partition.truncated = true;
                break;
            }
        }
    }

    info!(
        year = year,
        season = season,
        items = partition.items.len(),
        truncated = partition.truncated,
        "Partition complete"
    );

    partition
}
