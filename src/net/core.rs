use std::{collections::HashMap, time::Duration};

use anyhow::Context;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::{
    ArcStr,
    config::{Config, USizeOpt},
    log::Log,
    net::{Net, message::Message},
};

const SCOPE: &str = "net";

/// The core of the networking system that handles HTTP requests.
///
/// Wraps a [`reqwest::Client`] configured with the request timeout from the
/// configuration. The client pools connections and is cheap to clone, so each
/// request is served on its own task and a slow response never holds up the
/// mailbox.
#[derive(Debug)]
pub struct Core {
    /// Logging interface for operation logging
    log: Log,
    /// HTTP client for making requests
    client: Client,
}

impl Core {
    /// Creates a new networking core.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub async fn build(config: Config, log: Log) -> anyhow::Result<Self> {
        let timeout = config.usize(USizeOpt::Timeout).await as u64;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(concat!("best-stories/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;

        Ok(Self { log, client })
    }

    /// Transforms the networking core instance into an actor.
    ///
    /// # Returns
    /// The [`Net`] interface and the join handle of the actor task.
    pub fn spawn(self) -> (Net, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Get { url, headers, mut tx } => {
                        let client = self.client.clone();
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            // Abandon the request once the caller stops waiting
                            let response = tokio::select! {
                                _ = tx.closed() => return,
                                response = get(&client, &url, headers) => response,
                            };
                            let response = response
                                .with_context(|| format!("GET request failed for URL: {}", url));
                            if response.is_ok() {
                                log.info(SCOPE, format!("GET {}", url));
                            }
                            let _ = tx.send(response);
                        });
                    }
                }
            }
        });

        (Net::Actual(tx), handle)
    }
}

/// Performs a GET request with optional headers, failing on non-2xx statuses.
async fn get(
    client: &Client,
    url: &str,
    headers: Option<HashMap<ArcStr, ArcStr>>,
) -> anyhow::Result<ArcStr> {
    let mut request = client.get(url);

    for (key, value) in headers.into_iter().flatten() {
        request = request.header(&*key, &*value);
    }

    let response = request
        .send()
        .await
        .context("Sending GET request")?
        .error_for_status()
        .context("Unexpected response status")?;
    let text = response.text().await.context("Reading response body")?;
    Ok(ArcStr::from(text))
}
