//! Content language cross-check
//!
//! Reads each subtitle that carries a language token, detects the language
//! of its text and compares it with the token.

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::context::ScanContext;
use crate::detect::LanguageDetector;
use crate::error::DetectionFailure;
use crate::iso639;
use crate::models::{Finding, SubtitleFile, SubtitleFormat};
use crate::progress::{CheckKind, ProgressSink};
use crate::subtitle;

/// Counters for the content language check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    /// Subtitles with a language token that were analysed
    pub attempted: usize,
    /// Subtitles that could not be read, parsed or detected
    pub failed: usize,
    /// Failures where the detector could not decide
    pub indeterminate: usize,
    /// Subtitles whose content language differs from the token
    pub wrong_language: usize,
    /// Subtitles without a language token or with an unreadable format
    pub skipped: usize,
}

/// Result of the content language check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanguageReport {
    /// Counters
    pub summary: LanguageSummary,
    /// One finding per mismatching subtitle
    pub findings: Vec<Finding>,
}

/// Per-subtitle outcome
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    /// Content matches the token
    Matched,
    /// Content is in another language
    Mismatch(Finding),
    /// No answer for this file
    Failed(DetectionFailure),
    /// Nothing to compare against
    Skipped,
}

/// Read a subtitle and build the text to analyse
///
/// The first cue is left out and markup is removed.
pub fn load_corpus(path: &Path, format: SubtitleFormat) -> Result<String, DetectionFailure> {
    let bytes = std::fs::read(path).map_err(|e| DetectionFailure::Read(e.to_string()))?;
    let text = subtitle::decode_legacy(&bytes);
    let cues = subtitle::parse(&text, format).map_err(|e| DetectionFailure::Parse(e.message))?;
    let corpus = subtitle::corpus(&cues);
    if corpus.trim().is_empty() {
        return Err(DetectionFailure::EmptyCorpus);
    }
    Ok(corpus)
}

/// Cross-check one subtitle
pub fn check_subtitle(subtitle: &SubtitleFile, detector: &dyn LanguageDetector) -> LanguageOutcome {
    if subtitle.language_token.is_empty() {
        return LanguageOutcome::Skipped;
    }
    let Some(format) = subtitle.format else {
        log::debug!("No cue parser for {}", subtitle.path.display());
        return LanguageOutcome::Skipped;
    };

    let detected = match load_corpus(&subtitle.path, format).and_then(|c| detector.detect(&c)) {
        Ok(detected) => detected,
        Err(failure) => {
            log::warn!(
                "Language detection failed for {}: {}",
                subtitle.path.display(),
                failure
            );
            return LanguageOutcome::Failed(failure);
        }
    };

    let claimed = subtitle.language_token.as_str();
    let claimed_part1 = iso639::to_part1(claimed)
        .map(str::to_string)
        .unwrap_or_else(|| claimed.to_lowercase());
    if detected.code == claimed_part1 {
        return LanguageOutcome::Matched;
    }

    let claimed_name = iso639::name_of(claimed);
    let detected_name = iso639::name_of(&detected.code);
    log::warn!(
        "Detected language {:?} ({}) but {:?} ({}) is used in {}",
        detected.code,
        detected_name.unwrap_or("unknown"),
        claimed,
        claimed_name.unwrap_or("unknown"),
        subtitle.path.display()
    );

    LanguageOutcome::Mismatch(Finding::LanguageMismatch {
        path: subtitle.path.clone(),
        claimed_code: claimed.to_string(),
        claimed_name: claimed_name.map(str::to_string),
        detected_code: detected.code,
        detected_name: detected_name.map(str::to_string),
        detected_alternatives: detected.alternatives,
    })
}

/// Compare the content language of every subtitle with its language token
pub fn check_languages(
    ctx: &ScanContext,
    detector: &dyn LanguageDetector,
    progress: &dyn ProgressSink,
) -> LanguageReport {
    let subtitles = ctx.tree().subtitle_files(ctx.config());
    log::info!("{} subtitle files found", subtitles.len());
    progress.begin(CheckKind::LanguageCheck, subtitles.len() as u64);

    let outcomes: Vec<LanguageOutcome> = subtitles
        .par_iter()
        .map(|subtitle| {
            let outcome = check_subtitle(subtitle, detector);
            progress.advance(CheckKind::LanguageCheck, &subtitle.path);
            outcome
        })
        .collect();

    let mut report = LanguageReport::default();
    for outcome in outcomes {
        match outcome {
            LanguageOutcome::Skipped => report.summary.skipped += 1,
            LanguageOutcome::Matched => report.summary.attempted += 1,
            LanguageOutcome::Mismatch(finding) => {
                report.summary.attempted += 1;
                report.summary.wrong_language += 1;
                report.findings.push(finding);
            }
            LanguageOutcome::Failed(failure) => {
                report.summary.attempted += 1;
                report.summary.failed += 1;
                if failure.is_indeterminate() {
                    report.summary.indeterminate += 1;
                }
            }
        }
    }

    progress.finish(CheckKind::LanguageCheck);
    log::info!(
        "Attempted detections: {}, failed: {}, wrong language: {}",
        report.summary.attempted,
        report.summary.failed,
        report.summary.wrong_language
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DetectedLanguage;
    use crate::models::LanguageConfidence;

    struct Fixed(Result<&'static str, DetectionFailure>);

    impl LanguageDetector for Fixed {
        fn detect(&self, _text: &str) -> Result<DetectedLanguage, DetectionFailure> {
            self.0.clone().map(|code| DetectedLanguage {
                code: code.to_string(),
                alternatives: vec![LanguageConfidence {
                    code: code.to_string(),
                    confidence: 1.0,
                }],
            })
        }
    }

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nSubtitles by someone\n\n\
2\n00:00:03,000 --> 00:00:04,000\nBonjour tout le monde\n";

    fn write_subtitle(dir: &Path, name: &str, content: &str) -> SubtitleFile {
        std::fs::write(dir.join(name), content).unwrap();
        SubtitleFile::new(dir, name)
    }

    #[test]
    fn test_mismatch_reports_both_names() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(dir.path(), "movie.en.srt", SRT);

        match check_subtitle(&sub, &Fixed(Ok("fr"))) {
            LanguageOutcome::Mismatch(Finding::LanguageMismatch {
                claimed_code,
                claimed_name,
                detected_code,
                detected_name,
                detected_alternatives,
                ..
            }) => {
                assert_eq!(claimed_code, "en");
                assert_eq!(claimed_name.as_deref(), Some("English"));
                assert_eq!(detected_code, "fr");
                assert_eq!(detected_name.as_deref(), Some("French"));
                assert_eq!(detected_alternatives.len(), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_part2_token_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(dir.path(), "movie.fre.srt", SRT);
        assert_eq!(check_subtitle(&sub, &Fixed(Ok("fr"))), LanguageOutcome::Matched);
    }

    #[test]
    fn test_no_token_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(dir.path(), "movie.srt", SRT);
        assert_eq!(check_subtitle(&sub, &Fixed(Ok("fr"))), LanguageOutcome::Skipped);
    }

    #[test]
    fn test_first_cue_only_is_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(
            dir.path(),
            "movie.en.srt",
            "1\n00:00:01,000 --> 00:00:02,000\nOnly an advert\n",
        );
        assert_eq!(
            check_subtitle(&sub, &Fixed(Ok("en"))),
            LanguageOutcome::Failed(DetectionFailure::EmptyCorpus)
        );
    }

    #[test]
    fn test_unparseable_and_missing_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(dir.path(), "movie.en.srt", "not a subtitle");
        assert!(matches!(
            check_subtitle(&sub, &Fixed(Ok("en"))),
            LanguageOutcome::Failed(DetectionFailure::Parse(_))
        ));

        let missing = SubtitleFile::new(dir.path(), "gone.en.srt");
        assert!(matches!(
            check_subtitle(&missing, &Fixed(Ok("en"))),
            LanguageOutcome::Failed(DetectionFailure::Read(_))
        ));
    }

    #[test]
    fn test_indeterminate_detection() {
        let dir = tempfile::tempdir().unwrap();
        let sub = write_subtitle(dir.path(), "movie.en.srt", SRT);
        assert_eq!(
            check_subtitle(&sub, &Fixed(Err(DetectionFailure::Indeterminate))),
            LanguageOutcome::Failed(DetectionFailure::Indeterminate)
        );
    }

    #[test]
    fn test_legacy_encoding_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.fr.srt");
        std::fs::write(
            &path,
            b"1\n00:00:01,000 --> 00:00:02,000\nad\n\n2\n00:00:03,000 --> 00:00:04,000\nd\xe9j\xe0 vu\n",
        )
        .unwrap();
        assert_eq!(
            load_corpus(&path, SubtitleFormat::Srt).unwrap(),
            "déjà vu"
        );
    }
}
