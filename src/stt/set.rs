use crate::error::BridgeError;
use crate::stt::engine::SpeechEngine;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// The process-wide set of recognizers, one per supported language code.
///
/// Built once at startup and immutable afterwards; selecting a language
/// that has no entry here surfaces as `UnsupportedLanguage` on the frame
/// path. Language instances are global resources shared across every
/// session using that language, so each one sits behind its own mutex.
/// std::sync mutexes on purpose: the frame path runs on the transport's
/// worker thread, outside the async runtime.
pub struct RecognizerSet {
    engines: HashMap<String, Mutex<Box<dyn SpeechEngine>>>,
}

impl RecognizerSet {
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Register the engine for a language code, replacing any previous one.
    pub fn insert(&mut self, language: impl Into<String>, engine: Box<dyn SpeechEngine>) {
        let language = language.into();
        info!("Recognizer registered for language {:?}", language);
        self.engines.insert(language, Mutex::new(engine));
    }

    pub fn supports(&self, language: &str) -> bool {
        self.engines.contains_key(language)
    }

    /// Language codes with a loaded recognizer, for startup logging.
    pub fn languages(&self) -> Vec<&str> {
        self.engines.keys().map(String::as_str).collect()
    }

    /// Run one accept/result pair against the engine for `language`.
    ///
    /// Holds the engine lock across both calls so that frames from
    /// concurrent sessions sharing the language cannot interleave between
    /// accept and extract.
    pub fn transcribe(&self, language: &str, samples: &[i16]) -> Result<String, BridgeError> {
        let engine = self
            .engines
            .get(language)
            .ok_or_else(|| BridgeError::UnsupportedLanguage(language.to_string()))?;

        let mut engine = engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        engine.accept_chunk(samples);
        Ok(engine.current_text())
    }
}

impl Default for RecognizerSet {
    fn default() -> Self {
        Self::new()
    }
}
