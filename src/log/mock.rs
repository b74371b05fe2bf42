use std::sync::{Arc, Mutex, PoisonError};

use crate::log::{LogLevel, LogMessage};

/// Mock implementation of the Log actor for testing purposes.
///
/// Messages are kept in memory in the order they were logged so tests can
/// assert on what a component reported.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl Mock {
    /// Creates a new mock instance with an empty message store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message with the specified level and scope.
    pub fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogMessage::new(level, scope, message));
    }

    /// Gets all logged messages, oldest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
