// Per-session audio-to-text pipeline.
//
// The transport invokes `write` on one of its worker threads, once per
// speaker per packet. Everything that happens here must finish within one
// frame's processing time and must not touch the async runtime; the only
// crossing back into the event loop is the dispatcher submit.

pub mod dispatch;

pub use dispatch::TranscriptDispatcher;

use crate::audio::{stereo_to_mono, AudioFrame, Transcript};
use crate::error::BridgeError;
use crate::session::SessionShared;
use crate::stt::RecognizerSet;
use crate::transport::FrameSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Binds one session to its audio source: convert, recognize, dispatch.
pub struct TranscriptionPipeline {
    /// Selected language + debug flag, shared with the registry entry
    shared: Arc<SessionShared>,

    /// Process-wide per-language engines
    recognizers: Arc<RecognizerSet>,

    /// Hand-off into the async domain
    dispatcher: TranscriptDispatcher,

    /// Set once by `stop`; later frames are ignored
    stopped: AtomicBool,
}

impl TranscriptionPipeline {
    pub fn new(
        shared: Arc<SessionShared>,
        recognizers: Arc<RecognizerSet>,
        dispatcher: TranscriptDispatcher,
    ) -> Self {
        Self {
            shared,
            recognizers,
            dispatcher,
            stopped: AtomicBool::new(false),
        }
    }

    /// One frame: convert → look up language → accept + extract → dispatch.
    fn process(&self, speaker: &str, pcm: &[u8]) -> Result<(), BridgeError> {
        let mono = stereo_to_mono(pcm)?;

        let language = self.shared.language();
        let text = self.recognizers.transcribe(&language, &mono)?;

        if text.is_empty() {
            return Ok(());
        }

        if self.shared.debug() {
            info!("Recognized [{}] {}: {:?}", language, speaker, text);
        } else {
            debug!("Recognized [{}] {}: {:?}", language, speaker, text);
        }

        self.dispatcher.submit(Transcript::new(speaker, text));
        Ok(())
    }
}

impl FrameSink for TranscriptionPipeline {
    fn write(&self, frame: AudioFrame) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }

        // Frame-path failures drop this frame only; the session stays up
        // and nothing propagates to the transport's worker thread.
        if let Err(e) = self.process(&frame.speaker, &frame.pcm) {
            warn!("Dropping frame from {}: {}", frame.speaker, e);
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        debug!("Pipeline stopped; further frames are ignored");
    }
}
