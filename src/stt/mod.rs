pub mod engine;
pub mod set;

#[cfg(feature = "vosk")]
pub mod vosk;

pub use engine::SpeechEngine;
pub use set::RecognizerSet;

#[cfg(feature = "vosk")]
pub use vosk::VoskEngine;
