use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr, log::LogLevel};

mod core;
mod data;
mod message;
mod mock;

pub use data::{ConfigError, Data, MAX_ITEM_TTL_MINUTES, PathOpt, StrOpt, USizeOpt, item_ttl};
use message::Message;

/// The configuration actor.
///
/// Holds the settings for one run of the program: where the Hacker News API
/// lives, how long fetched items stay cached, how many item fetches may be in
/// flight and where logs go. Values are read from a TOML file with
/// [`Config::load`] and can be overridden in memory afterwards.
#[derive(Debug, Clone)]
pub enum Config {
    /// The actual configuration actor
    Actual(Sender<Message>),
    /// A mock holding its data in memory
    Mock(mock::Mock),
}

impl Config {
    /// Spawns a configuration actor backed by the TOML file at `path`.
    ///
    /// The actor starts with default values; call [`Config::load`] to read
    /// the file.
    pub fn spawn(path: ArcPath) -> Self {
        core::Core::new(path).spawn().0
    }

    /// Creates a mock configuration holding `data`.
    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Loads the configuration file and validates it.
    ///
    /// # Errors
    /// Fails if the file cannot be read, is not valid TOML or holds values
    /// rejected by [`Data::validate`]. The values in memory stay untouched.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Load { tx })
                    .await
                    .context("Sending message to Config actor")?;
                rx.await.context("Receiving response from Config actor")?
            }
            Self::Mock(mock) => mock.load().await,
        }
    }

    /// Saves the values in memory to the configuration file.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Save { tx })
                    .await
                    .context("Sending message to Config actor")?;
                rx.await.context("Receiving response from Config actor")?
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Gets a config of type path
    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetPath { opt, tx })
                    .await
                    .expect("Config actor is dead");
                rx.await.expect("Config actor is dead")
            }
            Self::Mock(mock) => mock.path(opt).await,
        }
    }

    /// Gets a config of type string
    pub async fn str(&self, opt: StrOpt) -> ArcStr {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetStr { opt, tx })
                    .await
                    .expect("Config actor is dead");
                rx.await.expect("Config actor is dead")
            }
            Self::Mock(mock) => mock.str(opt).await,
        }
    }

    pub async fn log_level(&self) -> LogLevel {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetLogLevel { tx })
                    .await
                    .expect("Config actor is dead");
                rx.await.expect("Config actor is dead")
            }
            Self::Mock(mock) => mock.log_level().await,
        }
    }

    pub async fn set_log_level(&self, level: LogLevel) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetLogLevel { level }).await;
            }
            Self::Mock(mock) => mock.set_log_level(level).await,
        }
    }

    /// Gets a config of type usize
    pub async fn usize(&self, opt: USizeOpt) -> usize {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetUSize { opt, tx })
                    .await
                    .expect("Config actor is dead");
                rx.await.expect("Config actor is dead")
            }
            Self::Mock(mock) => mock.usize(opt).await,
        }
    }

    /// Sets a config of type usize. The new value is not validated; it is
    /// checked again on the next [`Config::load`].
    pub async fn set_usize(&self, opt: USizeOpt, size: usize) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetUSize { opt, size }).await;
            }
            Self::Mock(mock) => mock.set_usize(opt, size).await,
        }
    }
}
