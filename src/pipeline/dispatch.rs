use crate::audio::Transcript;
use crate::transport::TextSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Thread-safe handoff from the audio callback thread into the async
/// domain.
///
/// The audio thread must never call the async messaging API directly; the
/// only crossing point is `submit`, which pushes onto an unbounded channel
/// (sync, non-blocking, FIFO) drained by a spawned task that performs the
/// actual send. A slow or failing text destination therefore never stalls
/// frame intake, and transcripts from one submitter are delivered in the
/// order they were submitted.
pub struct TranscriptDispatcher {
    tx: mpsc::UnboundedSender<Transcript>,
}

impl TranscriptDispatcher {
    /// Spawn the drain task delivering rendered transcripts to `sink`.
    ///
    /// Requires a running tokio runtime (sessions are created on the
    /// command path, which has one). The task exits once every sender is
    /// gone, after delivering whatever was already queued.
    pub fn spawn(sink: Arc<dyn TextSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Transcript>();

        tokio::spawn(async move {
            while let Some(transcript) = rx.recv().await {
                // Fire-and-forget: log and move on, never retry
                if let Err(e) = sink.send(&transcript.render()).await {
                    warn!("Failed to deliver transcript: {}", e);
                }
            }
            debug!("Transcript dispatch task finished");
        });

        Self { tx }
    }

    /// Queue one transcript for delivery. Never blocks.
    pub fn submit(&self, transcript: Transcript) {
        // Err only when the drain task is gone; the transcript is dropped,
        // never requeued
        let _ = self.tx.send(transcript);
    }
}
