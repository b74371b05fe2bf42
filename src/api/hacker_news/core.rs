use std::collections::HashMap;

use anyhow::Context;
use tokio::task::JoinHandle;

use super::data::{Item, ItemId};
use super::message::Message;
use crate::{ArcStr, log::Log, net::Net};

const SCOPE: &str = "api.hacker_news";

/// The core of the Hacker News API actor.
///
/// Builds the endpoint URLs from the configured base URL and decodes the
/// JSON bodies returned by the networking actor. Each request runs on its own
/// task, so many item fetches can be in flight through a single actor. A task
/// stops as soon as its caller stops waiting for the reply.
#[derive(Debug)]
pub struct Core {
    /// The networking actor for making HTTP requests
    net: Net,
    log: Log,
    /// Base URL without a trailing slash, e.g. `https://hacker-news.firebaseio.com`
    base_url: ArcStr,
}

impl Core {
    pub fn new(net: Net, log: Log, base_url: ArcStr) -> Self {
        Self { net, log, base_url }
    }

    /// Transforms the core into an actor.
    ///
    /// # Returns
    /// The [`HackerNewsApi`](super::HackerNewsApi) interface and the join
    /// handle of the actor task.
    pub fn spawn(self) -> (super::HackerNewsApi, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let net = self.net.clone();
                match message {
                    Message::BestStoryIds { mut tx } => {
                        let url = best_stories_url(&self.base_url);
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            let body = tokio::select! {
                                _ = tx.closed() => return,
                                body = fetch(&net, url) => body,
                            };
                            let response = body
                                .and_then(|body| parse_ids(&body))
                                .context("GET best story ids failed");
                            if let Ok(ids) = &response {
                                log.info(SCOPE, format!("Listed {} best story ids", ids.len()));
                            }
                            let _ = tx.send(response);
                        });
                    }
                    Message::Item { id, mut tx } => {
                        let url = item_url(&self.base_url, id);
                        tokio::spawn(async move {
                            let body = tokio::select! {
                                _ = tx.closed() => return,
                                body = fetch(&net, url) => body,
                            };
                            let response = body
                                .and_then(|body| parse_item(&body))
                                .with_context(|| format!("GET item failed for id: {}", id));
                            let _ = tx.send(response);
                        });
                    }
                }
            }
        });

        (super::HackerNewsApi::Actual(tx), handle)
    }
}

pub fn best_stories_url(base_url: &str) -> ArcStr {
    ArcStr::from(format!("{}/v0/beststories.json", base_url))
}

pub fn item_url(base_url: &str, id: ItemId) -> ArcStr {
    ArcStr::from(format!("{}/v0/item/{}.json", base_url, id))
}

async fn fetch(net: &Net, url: ArcStr) -> anyhow::Result<ArcStr> {
    let headers = HashMap::from([(ArcStr::from("Accept"), ArcStr::from("application/json"))]);
    net.get(url, Some(headers)).await
}

/// Decodes the body of `/v0/beststories.json`, a JSON array of IDs.
pub fn parse_ids(body: &str) -> anyhow::Result<Vec<ItemId>> {
    serde_json::from_str(body).context("Parsing best story ids")
}

/// Decodes the body of `/v0/item/{id}.json`. The API answers `null` for IDs
/// it does not know.
pub fn parse_item(body: &str) -> anyhow::Result<Option<Item>> {
    serde_json::from_str(body).context("Parsing item")
}
