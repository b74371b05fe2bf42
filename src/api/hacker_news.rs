use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcStr, log::Log, net::Net};

mod core;
mod data;
mod message;
mod mock;

pub use data::{Item, ItemId, ItemKind};
pub use mock::Mock;
use message::Message;

/// The Hacker News API actor.
///
/// Intermediates calls to the networking actor, exposing the two operations
/// the best stories pipeline needs: the ordered listing of best story IDs and
/// the detail of a single item.
///
/// # Examples
/// ```ignore
/// let api = HackerNewsApi::spawn(net, log, base_url);
/// let ids = api.best_story_ids().await?;
/// let item = api.item(ids[0]).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum HackerNewsApi {
    /// A real API actor that performs HTTP requests through the networking actor
    Actual(Sender<Message>),
    /// An instrumented in-memory implementation for testing
    Mock(Mock),
}

impl HackerNewsApi {
    /// Spawns the API actor.
    ///
    /// # Arguments
    /// * `net` - The networking actor for making HTTP requests
    /// * `log` - The logging actor
    /// * `base_url` - API root without the `/v0` suffix
    pub fn spawn(net: Net, log: Log, base_url: ArcStr) -> Self {
        let (api, _) = core::Core::new(net, log, base_url).spawn();
        api
    }

    /// Creates a mock API serving `items`, listed in the given order.
    pub fn mock(items: Vec<Item>) -> Self {
        Self::Mock(Mock::new(items))
    }

    /// Fetches the IDs of the current best stories, in the order the API
    /// lists them.
    pub async fn best_story_ids(&self) -> anyhow::Result<Vec<ItemId>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::BestStoryIds { tx })
                    .await
                    .context("Sending message to HackerNewsApi actor")?;
                rx.await
                    .context("Receiving response from HackerNewsApi actor")?
            }
            Self::Mock(mock) => mock.best_story_ids().await,
        }
    }

    /// Fetches a single item.
    ///
    /// # Returns
    /// `Ok(None)` when the API does not know `id`; an error when the request
    /// fails or the payload cannot be decoded.
    pub async fn item(&self, id: ItemId) -> anyhow::Result<Option<Item>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Item { id, tx })
                    .await
                    .context("Sending message to HackerNewsApi actor")?;
                rx.await
                    .context("Receiving response from HackerNewsApi actor")?
            }
            Self::Mock(mock) => mock.item(id).await,
        }
    }
}
