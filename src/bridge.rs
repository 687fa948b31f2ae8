// Command boundary: the operations the chat front end invokes.
//
// The front end itself (message parsing, permissions, the *join/*leave/*lang
// commands) lives outside this crate; it calls these operations and relays
// the reply text. Every lifecycle error is recovered here and turned into a
// user-facing message, leaving session state unchanged on failure.

use crate::error::BridgeError;
use crate::pipeline::{TranscriptDispatcher, TranscriptionPipeline};
use crate::session::{SessionRegistry, SessionShared, SessionState};
use crate::stt::RecognizerSet;
use crate::transport::{ChannelId, FrameSink, GuildId, TextSink, VoiceTransport};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct VoiceBridge {
    registry: Arc<SessionRegistry>,
    recognizers: Arc<RecognizerSet>,
    transport: Arc<dyn VoiceTransport>,
    default_language: String,
    debug_sessions: bool,
}

impl VoiceBridge {
    pub fn new(
        transport: Arc<dyn VoiceTransport>,
        recognizers: Arc<RecognizerSet>,
        default_language: impl Into<String>,
        debug_sessions: bool,
    ) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            recognizers,
            transport,
            default_language: default_language.into(),
            debug_sessions,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Connect to a voice channel and start transcribing into `text`.
    ///
    /// Ordering matters for the failure cases: the transport connect runs
    /// before the registry insert, so a refused connection leaves no entry
    /// behind; and if another join for the same guild wins the insert race,
    /// the freshly opened handle is torn down and the winner is untouched.
    pub async fn join(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        text: Arc<dyn TextSink>,
    ) -> Result<(), BridgeError> {
        if self.registry.contains(guild_id) {
            return Err(BridgeError::AlreadyConnected(guild_id));
        }

        let connection = self.transport.connect(guild_id, channel_id).await?;

        let shared = Arc::new(SessionShared::new(
            &self.default_language,
            self.debug_sessions,
        ));
        let dispatcher = TranscriptDispatcher::spawn(Arc::clone(&text));
        let pipeline = Arc::new(TranscriptionPipeline::new(
            Arc::clone(&shared),
            Arc::clone(&self.recognizers),
            dispatcher,
        ));

        connection.listen(Arc::clone(&pipeline) as Arc<dyn FrameSink>);

        let state = SessionState {
            guild_id,
            connection,
            text,
            sink: pipeline,
            shared,
        };

        match self.registry.create(state) {
            Ok(_) => {
                info!(
                    "Joined voice channel {} in guild {} (language {:?})",
                    channel_id, guild_id, self.default_language
                );
                Ok(())
            }
            Err(rejected) => {
                // Another join for this guild won the race between our
                // contains check and the insert
                rejected.teardown().await;
                Err(BridgeError::AlreadyConnected(guild_id))
            }
        }
    }

    /// Disconnect and forget the guild's session.
    pub async fn leave(&self, guild_id: GuildId) -> Result<(), BridgeError> {
        let state = self.registry.destroy(guild_id)?;
        state.teardown().await;
        info!("Left voice channel in guild {}", guild_id);
        Ok(())
    }

    /// Select the recognition language for the guild's session.
    ///
    /// Any code is accepted and stored; one without a loaded recognizer
    /// shows up as dropped frames (`UnsupportedLanguage`) until corrected.
    pub fn set_language(&self, guild_id: GuildId, code: &str) -> Result<(), BridgeError> {
        self.registry.set_language(guild_id, code)?;
        if !self.recognizers.supports(code) {
            warn!(
                "Guild {} selected language {:?} which has no loaded recognizer",
                guild_id, code
            );
        }
        Ok(())
    }

    /// Transport-detected loss of the voice connection: same cleanup as
    /// `leave`, tolerant of the session already being gone (an explicit
    /// leave may have raced with the disconnect event).
    pub async fn handle_connection_loss(&self, guild_id: GuildId) {
        match self.registry.destroy(guild_id) {
            Ok(state) => {
                warn!("Voice connection lost for guild {}; cleaning up", guild_id);
                state.teardown().await;
            }
            Err(_) => {
                debug!(
                    "Connection loss for guild {} with no live session",
                    guild_id
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Reply-text wrappers, one per chat command. `reply` doubles as the
    // session's text destination on join, matching the front end where
    // transcripts go to the channel the command was typed in.
    // ------------------------------------------------------------------

    pub async fn on_join(&self, guild_id: GuildId, channel_id: ChannelId, reply: Arc<dyn TextSink>) {
        let message = match self.join(guild_id, channel_id, Arc::clone(&reply)).await {
            Ok(()) => "Connected!".to_string(),
            Err(BridgeError::AlreadyConnected(_)) => "Already connected.".to_string(),
            Err(e) => {
                warn!("join failed for guild {}: {}", guild_id, e);
                "Error: unable to join your voice channel.".to_string()
            }
        };
        send_reply(reply.as_ref(), &message).await;
    }

    pub async fn on_leave(&self, guild_id: GuildId, reply: Arc<dyn TextSink>) {
        let message = match self.leave(guild_id).await {
            Ok(()) => "Disconnected.".to_string(),
            Err(_) => "Cannot leave because not connected.".to_string(),
        };
        send_reply(reply.as_ref(), &message).await;
    }

    pub async fn on_set_language(&self, guild_id: GuildId, code: &str, reply: Arc<dyn TextSink>) {
        let message = match self.set_language(guild_id, code) {
            Ok(()) => format!("Language set to {}.", code),
            Err(_) => "Error: Bot is not connected to a voice channel.".to_string(),
        };
        send_reply(reply.as_ref(), &message).await;
    }
}

async fn send_reply(reply: &dyn TextSink, message: &str) {
    if let Err(e) = reply.send(message).await {
        warn!("Failed to send reply: {}", e);
    }
}
