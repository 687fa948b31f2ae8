// Capability interfaces at the voice-transport seam.
//
// The bridge never depends on a concrete chat/voice backend. It talks to
// "something that can open a voice connection", "something that delivers
// per-speaker frames and can be told to stop", and "something that accepts
// text". A real backend (or the test doubles in tests/) implements these.

use crate::audio::AudioFrame;
use crate::error::BridgeError;
use std::fmt;
use std::sync::Arc;

/// Opaque guild (server) identifier, the session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque voice-channel identifier within a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Consumer of raw per-speaker audio frames.
///
/// `write` is invoked by the transport on an arbitrary worker thread, once
/// per speaker per audio packet. Implementations must return promptly and
/// must not call into the async runtime directly.
pub trait FrameSink: Send + Sync {
    /// Deliver one speaker's frame of interleaved stereo s16le PCM.
    fn write(&self, frame: AudioFrame);

    /// Tell the sink to ignore any frames still in flight. Idempotent.
    fn stop(&self);
}

/// An established voice connection for one guild.
///
/// Owned exclusively by that guild's session; dropped (after `disconnect`)
/// when the session is destroyed.
#[async_trait::async_trait]
pub trait VoiceConnection: Send + Sync {
    /// Register the sink that receives this connection's frames. The
    /// transport keeps delivering frames until `stop_listening` is called.
    fn listen(&self, sink: Arc<dyn FrameSink>);

    /// Unregister the frame sink so no further frames are delivered.
    fn stop_listening(&self);

    /// Tear down the underlying voice connection.
    async fn disconnect(&self);
}

/// Factory for voice connections.
#[async_trait::async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Join the given voice channel. A failed connect must leave nothing
    /// behind: the caller only learns `BridgeError::Connection`.
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, BridgeError>;
}

/// Destination for recognized text (and command replies).
///
/// Best-effort from the bridge's perspective: failures are logged by the
/// caller and never retried.
#[async_trait::async_trait]
pub trait TextSink: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}
