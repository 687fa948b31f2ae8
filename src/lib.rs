pub mod audio;
pub mod bridge;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod stt;
pub mod transport;

pub use audio::{stereo_to_mono, AudioFrame, Transcript};
pub use bridge::VoiceBridge;
pub use config::Config;
pub use error::BridgeError;
pub use pipeline::{TranscriptDispatcher, TranscriptionPipeline};
pub use session::{SessionRegistry, SessionShared, SessionState};
pub use stt::{RecognizerSet, SpeechEngine};
pub use transport::{
    ChannelId, FrameSink, GuildId, TextSink, VoiceConnection, VoiceTransport,
};
