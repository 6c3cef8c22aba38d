//! Statistical language detection

use lingua::LanguageDetectorBuilder;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::error::DetectionFailure;
use crate::models::LanguageConfidence;

/// Best guess for a text plus the ranked alternatives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLanguage {
    /// ISO 639-1 code of the best guess
    pub code: String,
    /// Candidates with non-zero confidence, most likely first
    pub alternatives: Vec<LanguageConfidence>,
}

/// Infers the language of a text
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`
    fn detect(&self, text: &str) -> Result<DetectedLanguage, DetectionFailure>;
}

/// Detector backed by the `lingua` n-gram models
///
/// Models load on first use, so a run that never needs detection pays nothing.
pub struct LinguaDetector {
    low_accuracy: bool,
    inner: OnceCell<lingua::LanguageDetector>,
}

impl LinguaDetector {
    /// Create a detector over all supported languages
    pub fn new(low_accuracy: bool) -> Self {
        Self {
            low_accuracy,
            inner: OnceCell::new(),
        }
    }

    fn detector(&self) -> &lingua::LanguageDetector {
        self.inner.get_or_init(|| {
            log::info!(
                "Loading language models ({} accuracy)",
                if self.low_accuracy { "low" } else { "high" }
            );
            let mut builder = LanguageDetectorBuilder::from_all_languages();
            if self.low_accuracy {
                builder.with_low_accuracy_mode();
            }
            builder.build()
        })
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for LinguaDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinguaDetector")
            .field("low_accuracy", &self.low_accuracy)
            .field("loaded", &self.inner.get().is_some())
            .finish()
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Result<DetectedLanguage, DetectionFailure> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DetectionFailure::EmptyCorpus);
        }

        let detector = self.detector();
        let language = detector
            .detect_language_of(text)
            .ok_or(DetectionFailure::Indeterminate)?;

        let alternatives = detector
            .compute_language_confidence_values(text)
            .into_iter()
            .filter(|(_, confidence)| *confidence > 0.0)
            .map(|(candidate, confidence)| LanguageConfidence {
                code: candidate.iso_code_639_1().to_string(),
                confidence,
            })
            .collect();

        Ok(DetectedLanguage {
            code: language.iso_code_639_1().to_string(),
            alternatives,
        })
    }
}
