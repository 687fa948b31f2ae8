use crate::transport::GuildId;
use thiserror::Error;

/// Errors surfaced by the bridge core.
///
/// Lifecycle errors (`AlreadyConnected`, `NotConnected`, `Connection`) are
/// recovered at the command boundary and turned into a user-facing reply.
/// Frame-path errors (`MalformedAudio`, `UnsupportedLanguage`) are logged and
/// drop the offending frame only; they never tear down a session.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A session already exists for this guild.
    #[error("already connected to a voice channel in guild {0}")]
    AlreadyConnected(GuildId),

    /// No session exists for this guild.
    #[error("not connected to a voice channel in guild {0}")]
    NotConnected(GuildId),

    /// The transport refused or failed the voice connection.
    #[error("voice connection failed: {0}")]
    Connection(String),

    /// The selected language has no loaded recognizer.
    #[error("no recognizer loaded for language {0:?}")]
    UnsupportedLanguage(String),

    /// The transport handed us a PCM buffer the converter cannot process.
    #[error("malformed audio frame: {0}")]
    MalformedAudio(String),
}
