use crate::error::BridgeError;
use crate::session::state::{SessionShared, SessionState};
use crate::transport::GuildId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Process-wide guild → session mapping; the single source of truth for
/// "is this guild connected".
///
/// One mutex serializes every mutation. That is the whole at-most-one-
/// session-per-guild enforcement: create is an atomic check-and-insert, and
/// command-path create/destroy may race with teardown triggered by
/// transport-level disconnects. No await happens under the lock.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<GuildId, SessionState>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Atomic check-and-insert.
    ///
    /// On conflict the existing session is untouched and the rejected state
    /// comes back in `Err` so the caller can tear down the voice handle it
    /// just opened.
    pub fn create(&self, state: SessionState) -> Result<Arc<SessionShared>, SessionState> {
        let mut sessions = self.lock();

        if sessions.contains_key(&state.guild_id) {
            return Err(state);
        }

        info!("Session created for guild {}", state.guild_id);
        let shared = Arc::clone(&state.shared);
        sessions.insert(state.guild_id, state);
        Ok(shared)
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.lock().contains_key(&guild_id)
    }

    /// The language/debug cell for a connected guild.
    pub fn shared(&self, guild_id: GuildId) -> Result<Arc<SessionShared>, BridgeError> {
        self.lock()
            .get(&guild_id)
            .map(|s| Arc::clone(&s.shared))
            .ok_or(BridgeError::NotConnected(guild_id))
    }

    /// Store a language code for the session.
    ///
    /// The code is not validated against loaded recognizers here; an
    /// unsupported code surfaces as `UnsupportedLanguage` when the next
    /// frame for the session hits the pipeline.
    pub fn set_language(&self, guild_id: GuildId, code: &str) -> Result<(), BridgeError> {
        let sessions = self.lock();
        let state = sessions
            .get(&guild_id)
            .ok_or(BridgeError::NotConnected(guild_id))?;

        state.shared.set_language(code);
        info!("Language for guild {} set to {:?}", guild_id, code);
        Ok(())
    }

    /// Remove the session and hand it back for teardown.
    ///
    /// The registry only forgets the entry; disconnecting the voice handle
    /// is the caller's job (via `SessionState::teardown`). Unknown guilds
    /// fail with `NotConnected` and nothing changes.
    pub fn destroy(&self, guild_id: GuildId) -> Result<SessionState, BridgeError> {
        let state = self
            .lock()
            .remove(&guild_id)
            .ok_or(BridgeError::NotConnected(guild_id))?;

        info!("Session destroyed for guild {}", guild_id);
        Ok(state)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<GuildId, SessionState>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChannelId, FrameSink, TextSink, VoiceConnection, VoiceTransport};

    struct NullConnection;

    #[async_trait::async_trait]
    impl VoiceConnection for NullConnection {
        fn listen(&self, _sink: Arc<dyn FrameSink>) {}
        fn stop_listening(&self) {}
        async fn disconnect(&self) {}
    }

    struct NullTransport;

    #[async_trait::async_trait]
    impl VoiceTransport for NullTransport {
        async fn connect(
            &self,
            _guild_id: GuildId,
            _channel_id: ChannelId,
        ) -> Result<Box<dyn VoiceConnection>, BridgeError> {
            Ok(Box::new(NullConnection))
        }
    }

    struct NullSink;

    #[async_trait::async_trait]
    impl TextSink for NullSink {
        async fn send(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NullFrames;

    impl FrameSink for NullFrames {
        fn write(&self, _frame: crate::audio::AudioFrame) {}
        fn stop(&self) {}
    }

    fn state(guild: u64, language: &str) -> SessionState {
        SessionState {
            guild_id: GuildId(guild),
            connection: Box::new(NullConnection),
            text: Arc::new(NullSink),
            sink: Arc::new(NullFrames),
            shared: Arc::new(SessionShared::new(language, false)),
        }
    }

    #[test]
    fn test_create_then_duplicate_is_rejected() {
        let registry = SessionRegistry::new();

        registry.create(state(1, "en")).ok().unwrap();
        let rejected = registry.create(state(1, "de")).err().unwrap();

        // The rejected state is handed back; the first session is intact
        assert_eq!(rejected.guild_id, GuildId(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.shared(GuildId(1)).unwrap().language(), "en");
    }

    #[test]
    fn test_destroy_unknown_guild_has_no_side_effect() {
        let registry = SessionRegistry::new();
        registry.create(state(1, "en")).ok().unwrap();

        let err = registry.destroy(GuildId(2)).unwrap_err();

        assert!(matches!(err, BridgeError::NotConnected(GuildId(2))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_destroy_removes_entry() {
        let registry = SessionRegistry::new();
        registry.create(state(1, "en")).ok().unwrap();

        let removed = registry.destroy(GuildId(1)).unwrap();

        assert_eq!(removed.guild_id, GuildId(1));
        assert!(registry.is_empty());
        assert!(!registry.contains(GuildId(1)));
    }

    #[test]
    fn test_set_language_stores_unvalidated_code() {
        let registry = SessionRegistry::new();
        registry.create(state(1, "en")).ok().unwrap();

        // "xx" has no recognizer; the registry stores it anyway
        registry.set_language(GuildId(1), "xx").unwrap();

        assert_eq!(registry.shared(GuildId(1)).unwrap().language(), "xx");
    }

    #[test]
    fn test_set_language_requires_session() {
        let registry = SessionRegistry::new();

        let err = registry.set_language(GuildId(7), "en").unwrap_err();

        assert!(matches!(err, BridgeError::NotConnected(GuildId(7))));
    }

    #[tokio::test]
    async fn test_null_transport_round_trip() {
        // Exercise the trait objects the way the bridge wires them
        let conn = NullTransport
            .connect(GuildId(1), ChannelId(2))
            .await
            .unwrap();
        conn.listen(Arc::new(NullFrames));
        conn.stop_listening();
        conn.disconnect().await;
    }
}
