use tokio::sync::oneshot::Sender;

use super::data::{Item, ItemId};

/// Messages that can be sent to the Hacker News API actor.
#[derive(Debug)]
pub enum Message {
    /// Fetches the ordered IDs of the current best stories
    BestStoryIds {
        tx: Sender<anyhow::Result<Vec<ItemId>>>,
    },
    /// Fetches a single item; `None` when the API answers `null`
    Item {
        id: ItemId,
        tx: Sender<anyhow::Result<Option<Item>>>,
    },
}
