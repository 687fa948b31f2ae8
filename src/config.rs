use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub voice: VoiceConfig,
    pub recognition: RecognitionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// Working directory for runtime data (created at startup if missing)
    pub data_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct VoiceConfig {
    /// Sample rate the transport delivers frames at; the recognizer contract
    /// is fixed to this rate at construction
    pub sample_rate: u32,
    /// Channel count of incoming frames (2 = interleaved stereo)
    pub channels: u16,
    /// When true, new sessions start with per-frame logging promoted to info
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionConfig {
    /// Language selected for a session until changed via the lang command
    pub default_language: String,
    /// Language code → model directory. Adding a language is one entry here;
    /// its recognizer is built at startup before it can be selected.
    pub models: HashMap<String, String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        let dir = Path::new(&self.service.data_dir);
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        }
        Ok(())
    }
}
