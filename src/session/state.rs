use crate::transport::{FrameSink, GuildId, TextSink, VoiceConnection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Per-session bits the frame path reads on every packet.
///
/// Kept in its own Arc so the audio callback thread never touches the
/// registry mutex: the pipeline reads the selected language here while
/// create/destroy race on the registry lock. `set_language` on the registry
/// writes through to this cell.
pub struct SessionShared {
    language: RwLock<String>,
    debug: AtomicBool,
}

impl SessionShared {
    pub fn new(language: impl Into<String>, debug: bool) -> Self {
        Self {
            language: RwLock::new(language.into()),
            debug: AtomicBool::new(debug),
        }
    }

    pub fn language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_language(&self, code: impl Into<String>) {
        *self
            .language
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = code.into();
    }

    /// Whether per-frame logging is promoted to info for this session.
    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn set_debug(&self, on: bool) {
        self.debug.store(on, Ordering::Relaxed);
    }
}

/// The live binding between one guild and its active voice connection.
///
/// Exists if and only if a voice connection is active for the guild:
/// created on successful connect, destroyed on explicit leave or on
/// connection loss.
pub struct SessionState {
    pub guild_id: GuildId,

    /// Voice connection handle, owned exclusively by this session
    pub connection: Box<dyn VoiceConnection>,

    /// Where recognized text for this session goes (shared, not owned)
    pub text: Arc<dyn TextSink>,

    /// Frame sink registered with the connection (the pipeline)
    pub sink: Arc<dyn FrameSink>,

    /// Language + debug cell shared with the pipeline
    pub shared: Arc<SessionShared>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("guild_id", &self.guild_id)
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Stop frame delivery and drop the voice connection.
    ///
    /// Safe while a frame is mid-flight: the sink stops processing first,
    /// and transcripts already handed to the dispatcher are still delivered.
    pub async fn teardown(self) {
        info!("Tearing down session for guild {}", self.guild_id);

        self.sink.stop();
        self.connection.stop_listening();
        self.connection.disconnect().await;
    }
}
