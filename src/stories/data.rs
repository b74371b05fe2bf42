use serde::Serialize;

use crate::api::hacker_news::Item;

/// Outcome of resolving one item ID, as stored in the cache.
///
/// A missing cache entry means the ID has not been fetched yet; failures are
/// kept like any other outcome until they expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Item),
    /// The API answered `null` for this ID
    NotFound,
    /// The fetch failed or returned a payload that could not be decoded
    Failed,
}

impl Lookup {
    pub fn found(self) -> Option<Item> {
        match self {
            Lookup::Found(item) => Some(item),
            Lookup::NotFound | Lookup::Failed => None,
        }
    }
}

/// Errors that end a best stories request.
///
/// Per-item failures never show up here; they only shorten the result.
#[derive(Debug, thiserror::Error)]
pub enum StoriesError {
    #[error("Failed to list best stories: {0:#}")]
    Listing(anyhow::Error),
    #[error("Request cancelled")]
    Cancelled,
}

/// Timestamp layout of [`StoryDto::time`], e.g. `2007-04-04T19:16:40+00:00`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// The outward shape of a ranked story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDto {
    pub title: String,
    pub uri: String,
    pub posted_by: String,
    /// Creation time in ISO-8601 with an explicit UTC offset
    pub time: String,
    pub score: u32,
    pub comment_count: u32,
}

impl From<Item> for StoryDto {
    fn from(item: Item) -> Self {
        let time = chrono::DateTime::from_timestamp(item.time, 0).unwrap_or_default();
        Self {
            title: item.title,
            uri: item.url,
            posted_by: item.by,
            time: time.format(TIME_FORMAT).to_string(),
            score: item.score,
            comment_count: item.descendants,
        }
    }
}
