use std::fmt::Display;

use tokio::{
    sync::{
        mpsc::{Sender, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
};

use crate::ArcPath;

mod core;
mod data;
mod message;
mod mock;

pub use data::{LogLevel, LogMessage};
use message::Message;

/// The logging actor that provides a thread-safe interface for logging operations.
///
/// Every call takes a static `scope` naming the module that emits the message,
/// so log lines read `[timestamp] [LEVEL] [scope] message`.
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(LogLevel::Warning, log_dir).await?;
/// log.info("stories", "Serving best stories");
/// log.flush().await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// A mock implementation for testing that records messages in memory
    Mock(mock::Mock),
}

impl Log {
    /// Builds the logger core and spawns its actor.
    ///
    /// # Arguments
    /// * `level` - Minimum level for messages to be echoed to stderr on flush
    /// * `log_dir` - Directory where log files will be stored
    pub async fn spawn(level: LogLevel, log_dir: ArcPath) -> anyhow::Result<Self> {
        let (log, _) = core::Core::build(level, log_dir).await?.spawn();
        Ok(log)
    }

    /// Creates a mock logger that records messages in memory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends a [`LogMessage`] to the logger without blocking the caller.
    ///
    /// Messages sent after a flush are dropped.
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let sender = match self {
            Log::Mock(mock) => return mock.log(scope, message, level),
            Log::Actual(sender) => sender,
        };

        let message = Message::Log(LogMessage::new(level, scope, message));

        if let Err(TrySendError::Full(message)) = sender.try_send(message) {
            let sender = sender.clone();
            tokio::spawn(async move {
                let _ = sender.send(message).await;
            });
        }
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log a warning message if the result is an error
    /// and return the result as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error message if the result is an error
    /// and return the result as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Flushes the logger by printing its buffered messages to stderr. After
    /// this the actor stops and further messages are dropped.
    ///
    /// The returned handle completes once the messages are printed.
    pub fn flush(&self) -> JoinHandle<()> {
        let Self::Actual(sender) = self else {
            return tokio::spawn(async {});
        };

        let sender = sender.clone();
        tokio::spawn(async move {
            let (tx, rx) = oneshot::channel();
            if sender.send(Message::Flush { tx }).await.is_ok() {
                let _ = rx.await;
            }
        })
    }

    /// Gets every message recorded by a mock logger, oldest first.
    ///
    /// # Returns
    /// `None` for the real logger, which does not keep messages around.
    pub fn messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Log::Actual(_) => None,
            Log::Mock(mock) => Some(mock.messages()),
        }
    }
}
