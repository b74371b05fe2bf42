use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Describes a message to be logged.
///
/// Carries the moment it was logged, the severity, the static scope of the
/// module that emitted it and the rendered message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub scope: &'static str,
    pub message: String,
}

impl LogMessage {
    /// Creates a message stamped with the current time.
    pub fn new(level: LogLevel, scope: &'static str, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            scope,
            message,
        }
    }
}

impl Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.level,
            self.scope,
            self.message
        )
    }
}

/// Describes the log level of a message.
///
/// # Ordering
/// The levels are ordered by severity: `Info` < `Warning` < `Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum LogLevel {
    /// Regular operational information: requests served, cache sweeps.
    #[default]
    Info,
    /// Something went wrong but the request carried on, e.g. a dropped item.
    Warning,
    /// A request failed as a whole.
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("Warning").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_message_display() {
        let msg = LogMessage::new(LogLevel::Warning, "stories", "item 42 dropped".to_string());
        let output = msg.to_string();
        assert!(output.contains("[WARN]"));
        assert!(output.contains("[stories]"));
        assert!(output.ends_with("item 42 dropped"));
        assert_eq!(output.matches('[').count(), 3);
    }

    #[test]
    fn test_log_message_keeps_creation_time() {
        use chrono::TimeZone;

        let msg = LogMessage {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            level: LogLevel::Error,
            scope: "net",
            message: "timed out".to_string(),
        };
        assert_eq!(
            msg.to_string(),
            "[2024-01-02 03:04:05 UTC] [ERROR] [net] timed out"
        );

        let stamped = LogMessage::new(LogLevel::Info, "net", "ok".to_string());
        let first = stamped.to_string();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(stamped.to_string(), first);
    }
}
