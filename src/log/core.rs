use anyhow::Context;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    task::JoinHandle,
};

use super::data::{LogLevel, LogMessage};
use super::message::Message;
use crate::ArcPath;

/// The core of the logging system.
///
/// Every message is appended to a timestamped log file and to `latest.log`
/// inside the log directory. Messages at or above the print level are also
/// buffered and written to stderr when the logger is flushed, so the
/// command output stays clean while it runs.
#[derive(Debug)]
pub struct Core {
    /// Path to the current timestamped log file
    log_path: ArcPath,
    /// Handle to the current log file
    log_file: File,
    /// Handle to the "latest" log file
    latest_log_file: File,
    /// Buffer of messages to be printed to stderr
    logs_to_print: Vec<LogMessage>,
    /// Minimum level of messages to be printed to stderr
    print_level: LogLevel,
}

impl Core {
    /// Creates the log directory and opens both log files.
    ///
    /// # Errors
    /// Fails if the directory cannot be created or either file cannot be opened.
    pub async fn build(level: LogLevel, log_dir: ArcPath) -> anyhow::Result<Self> {
        let log_path = ArcPath::from(log_dir.join(format!(
            "best-stories_{}.log",
            chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S")
        )));
        let latest_log_path = log_dir.join("latest.log");

        tokio::fs::create_dir_all(&log_dir)
            .await
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .await
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        let latest_log_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&latest_log_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create latest log file: {}",
                    latest_log_path.display()
                )
            })?;

        Ok(Self {
            log_path,
            log_file,
            latest_log_file,
            logs_to_print: Vec::new(),
            print_level: level,
        })
    }

    /// Transforms the logger core into an actor.
    ///
    /// # Returns
    /// The [`Log`](super::Log) handle and the join handle of the actor task,
    /// which finishes after a [`Message::Flush`].
    pub fn spawn(mut self) -> (super::Log, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Message::Log(msg) => {
                        self.log(msg).await;
                    }
                    Message::Flush { tx } => {
                        rx.close();
                        // Drain what was queued before the flush request.
                        while let Some(Message::Log(msg)) = rx.recv().await {
                            self.log(msg).await;
                        }
                        self.flush();
                        let _ = tx.send(());
                        break;
                    }
                }
            }
        });
        (super::Log::Actual(tx), handle)
    }

    async fn log(&mut self, message: LogMessage) {
        let line = format!("{}\n", &message);

        for file in [&mut self.log_file, &mut self.latest_log_file] {
            if let Err(err) = write_line(file, &line).await {
                eprintln!("Failed to write log line: {err:#}");
            }
        }

        if message.level >= self.print_level {
            self.logs_to_print.push(message);
        }
    }

    fn flush(self) {
        for message in &self.logs_to_print {
            eprintln!("{}", message);
        }
        if !self.logs_to_print.is_empty() {
            eprintln!("Check the full log file: {}", self.log_path.display());
        }
    }
}

async fn write_line(file: &mut File, line: &str) -> anyhow::Result<()> {
    file.write_all(line.as_bytes())
        .await
        .context("Writing log line")?;
    file.flush().await.context("Flushing log file")
}
