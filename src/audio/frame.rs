use chrono::{DateTime, Utc};

/// One packet of raw audio for one speaker, as handed over by the transport.
///
/// Transient: produced per transport tick, consumed immediately by the
/// pipeline, never persisted.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Display name of the speaking user
    pub speaker: String,

    /// Raw s16le PCM bytes, interleaved stereo
    pub pcm: Vec<u8>,
}

/// One piece of recognized text on its way to the text destination.
///
/// Delivered at most once; never retried or buffered beyond the single
/// dispatch attempt.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Display name of the speaker this text belongs to
    pub speaker: String,

    /// Recognized text (non-empty by construction)
    pub text: String,

    /// When the text was recognized
    pub timestamp: DateTime<Utc>,
}

impl Transcript {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Render the line sent to the text channel.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker, self.text)
    }
}
