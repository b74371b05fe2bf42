use tokio::sync::oneshot::Sender;

use super::data::LogMessage;

/// Messages that can be sent to the logging [`Core`](super::core::Core).
#[derive(Debug)]
pub enum Message {
    /// Appends a message to the log files
    Log(LogMessage),
    /// Prints buffered messages to stderr and stops the actor, answering
    /// once everything is written
    Flush { tx: Sender<()> },
}
