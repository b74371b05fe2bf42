use anyhow::Context;

use crate::ArcPath;

use super::{data::Data, message::Message};

/// The core configuration actor that handles file I/O and data management.
///
/// Keeps the configuration in memory; the TOML file is only touched on
/// explicit load and save requests.
pub struct Core {
    /// The path to the configuration file
    path: ArcPath,
    /// The current configuration data
    data: Data,
}

impl Core {
    /// Creates a configuration core holding the default values.
    pub fn new(path: ArcPath) -> Self {
        Self {
            path,
            data: Data::default(),
        }
    }

    /// Spawns the configuration actor and returns a handle to it.
    pub fn spawn(mut self) -> (super::Config, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Load { tx } => {
                        let res = self.load().await;
                        let _ = tx.send(res);
                    }
                    Message::Save { tx } => {
                        let res = self.save().await;
                        let _ = tx.send(res);
                    }
                    Message::GetPath { opt, tx } => {
                        let _ = tx.send(self.data.path(opt));
                    }
                    Message::GetStr { opt, tx } => {
                        let _ = tx.send(self.data.str(opt));
                    }
                    Message::GetLogLevel { tx } => {
                        let _ = tx.send(self.data.log_level());
                    }
                    Message::GetUSize { opt, tx } => {
                        let _ = tx.send(self.data.usize(opt));
                    }
                    Message::SetLogLevel { level } => {
                        self.data.set_log_level(level);
                    }
                    Message::SetUSize { opt, size } => {
                        self.data.set_usize(opt, size);
                    }
                }
            }
        });
        (super::Config::Actual(tx), handle)
    }

    /// Loads and validates the configuration file. On failure the values in
    /// memory are left untouched.
    async fn load(&mut self) -> anyhow::Result<()> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Reading config file {}", self.path.display()))?;
        let data: Data = toml::from_str(&contents)
            .with_context(|| format!("Parsing config file {}", self.path.display()))?;
        data.validate()?;
        self.data = data;
        Ok(())
    }

    /// Saves the current configuration, creating parent directories as needed.
    async fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Creating config directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(&self.data).context("Serializing config")?;
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Writing config file {}", self.path.display()))
    }
}
