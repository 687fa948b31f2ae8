// Vosk-backed speech engine (feature "vosk", links against libvosk).

use crate::config::RecognitionConfig;
use crate::stt::engine::SpeechEngine;
use crate::stt::set::RecognizerSet;
use anyhow::{anyhow, Result};
use tracing::info;
use vosk::{DecodingState, Model, Recognizer};

/// One Kaldi decoder bound to a language model at a fixed sample rate.
pub struct VoskEngine {
    recognizer: Recognizer,
    finalized: bool,
    // The C API refcounts models, but keep ours alive for the engine's
    // whole lifetime anyway
    _model: Model,
}

impl VoskEngine {
    /// Load the model at `model_dir` and build a recognizer for it.
    pub fn load(model_dir: &str, sample_rate: u32) -> Result<Self> {
        info!("Loading speech model from {}", model_dir);

        let model = Model::new(model_dir)
            .ok_or_else(|| anyhow!("Failed to load speech model from {}", model_dir))?;

        let recognizer = Recognizer::new(&model, sample_rate as f32)
            .ok_or_else(|| anyhow!("Failed to create recognizer for model {}", model_dir))?;

        Ok(Self {
            recognizer,
            finalized: false,
            _model: model,
        })
    }
}

impl SpeechEngine for VoskEngine {
    fn accept_chunk(&mut self, samples: &[i16]) {
        // An utterance endpoint may be detected anywhere inside the chunk
        self.finalized = matches!(
            self.recognizer.accept_waveform(samples),
            DecodingState::Finalized
        );
    }

    fn current_text(&mut self) -> String {
        if !self.finalized {
            return String::new();
        }
        self.finalized = false;

        // final_result flushes the utterance, so this really is consuming
        self.recognizer
            .final_result()
            .single()
            .map(|r| r.text.to_string())
            .unwrap_or_default()
    }
}

/// Build the process-wide recognizer set from the configured language →
/// model map. Every configured language gets its engine here, before it can
/// be selected by any session.
pub fn load_recognizers(cfg: &RecognitionConfig, sample_rate: u32) -> Result<RecognizerSet> {
    let mut set = RecognizerSet::new();

    for (language, model_dir) in &cfg.models {
        let engine = VoskEngine::load(model_dir, sample_rate)?;
        set.insert(language.clone(), Box::new(engine));
    }

    info!(
        "Loaded {} recognizer(s): {:?}",
        cfg.models.len(),
        set.languages()
    );

    Ok(set)
}
