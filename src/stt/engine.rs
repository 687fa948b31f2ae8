/// Incremental speech recognizer bound to one language at a fixed sample
/// rate.
///
/// The decoder splits "accept new audio" and "ask for text" into two steps
/// per frame rather than a single reduce; the pipeline calls both every
/// frame to keep transcript latency bounded at roughly one frame. Calls
/// against one instance must arrive in frame order and never concurrently —
/// `RecognizerSet` wraps each engine in a mutex and runs the pair under a
/// single lock acquisition.
pub trait SpeechEngine: Send {
    /// Feed one mono PCM chunk into the decoder's rolling buffer.
    fn accept_chunk(&mut self, samples: &[i16]);

    /// Extract the decoder's current result, empty string if none.
    ///
    /// Consuming, not peeking: this may advance or reset the decoder's
    /// internal segmentation state, so text returned once will not be
    /// returned again.
    fn current_text(&mut self) -> String;
}
