use serde::{Deserialize, Serialize};

/// Identifier the Hacker News API assigns to every item.
pub type ItemId = u64;

/// The discriminator of an item record, sent as the `type` field.
///
/// Known values are matched case-insensitively; anything else, including a
/// missing or `null` field, becomes [`ItemKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    PollOption,
    #[default]
    Unknown,
}

impl From<Option<String>> for ItemKind {
    fn from(value: Option<String>) -> Self {
        let Some(value) = value else {
            return Self::Unknown;
        };
        match value.to_ascii_lowercase().as_str() {
            "story" => Self::Story,
            "comment" => Self::Comment,
            "job" => Self::Job,
            "poll" => Self::Poll,
            "pollopt" => Self::PollOption,
            _ => Self::Unknown,
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Story => "story",
            ItemKind::Comment => "comment",
            ItemKind::Job => "job",
            ItemKind::Poll => "poll",
            ItemKind::PollOption => "pollopt",
            ItemKind::Unknown => "unknown",
        }
        .to_string()
    }
}

/// A single record from `/v0/item/{id}.json`.
///
/// Only the fields the ranking and the outward record need are kept. Absent
/// fields take their empty or zero value, as the API omits them freely (a
/// text post has no `url`, a fresh story has no `kids`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub score: u32,
    /// Author handle
    pub by: String,
    /// Creation time, in seconds since the Unix epoch
    pub time: i64,
    /// Total comment count
    pub descendants: u32,
    pub url: String,
    pub kids: Vec<ItemId>,
}
