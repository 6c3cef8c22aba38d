//! Subtitle naming validation
//!
//! Two independent checks over every subtitle in the tree: whether the
//! language token follows the requested ISO 639 standard, and whether the
//! subtitle name matches the media files next to it.

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::config::AuditConfig;
use crate::context::ScanContext;
use crate::detect::LanguageDetector;
use crate::error::DetectionFailure;
use crate::iso639::{self, IsoStandard};
use crate::models::{FallbackDetection, FileKind, Finding, MediaFile, SubtitleFile};
use crate::progress::{CheckKind, ProgressSink};
use crate::scanner::FolderNode;

/// Counters for the language code check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodeSummary {
    /// Subtitles examined
    pub total: usize,
    /// Subtitles whose token does not follow the requested standard
    pub incorrect: usize,
    /// Incorrect subtitles whose content language was detected
    pub detected: usize,
    /// Incorrect subtitles where detection was attempted and failed
    pub detection_failed: usize,
}

/// Result of the language code check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeReport {
    /// Standard the tokens were judged against
    pub expected: Option<IsoStandard>,
    /// Counters
    pub summary: CodeSummary,
    /// One finding per incorrect subtitle
    pub findings: Vec<Finding>,
}

/// Counters for the media name check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NamingSummary {
    /// Subtitles examined
    pub total: usize,
    /// Subtitles with at least one mismatching media file
    pub incorrectly_named: usize,
    /// Subtitle and media pairs that do not match
    pub mismatches: usize,
    /// Subtitles without any media file next to them
    pub without_media: usize,
}

/// Result of the media name check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamingReport {
    /// Counters
    pub summary: NamingSummary,
    /// Mismatches and missing media notes
    pub findings: Vec<Finding>,
}

/// Run content detection on a subtitle read as UTF-8 text
///
/// The raw file content is used as is; cue structure is not parsed.
pub fn detect_raw(path: &Path, detector: &dyn LanguageDetector) -> FallbackDetection {
    let outcome = std::fs::read_to_string(path)
        .map_err(|e| DetectionFailure::from_utf8_read(&e))
        .and_then(|content| detector.detect(&content));

    match outcome {
        Ok(detected) => FallbackDetection::Detected {
            code: detected.code,
        },
        Err(failure) => {
            log::debug!("Language detection failed for {}: {}", path.display(), failure);
            FallbackDetection::Failed { failure }
        }
    }
}

/// Judge one subtitle's token, returning a finding when it is not compliant
pub fn check_code(
    subtitle: &SubtitleFile,
    expected: IsoStandard,
    detector: Option<&dyn LanguageDetector>,
) -> Option<Finding> {
    let verdict = iso639::judge(&subtitle.language_token, expected);
    if verdict.is_compliant() {
        return None;
    }

    log::warn!(
        "Incorrectly named subtitle {} (token {:?} is {}, expected {})",
        subtitle.path.display(),
        subtitle.language_token,
        verdict.found.standard.as_str(),
        expected
    );

    Some(Finding::BadSubtitleCode {
        path: subtitle.path.clone(),
        found_code: subtitle.language_token.clone(),
        found_standard: verdict.found.standard,
        expected_standard: expected,
        suggested_code: verdict.suggestion,
        fallback_detection: detector.map(|d| detect_raw(&subtitle.path, d)),
    })
}

/// Check every subtitle's language token against the requested standard
///
/// Content detection runs on incorrect subtitles when the configuration
/// enables the fallback.
pub fn validate_codes(
    ctx: &ScanContext,
    expected: IsoStandard,
    detector: &dyn LanguageDetector,
    progress: &dyn ProgressSink,
) -> CodeReport {
    let subtitles = ctx.tree().subtitle_files(ctx.config());
    let detector = if ctx.config().language_fallback {
        Some(detector)
    } else {
        None
    };
    progress.begin(CheckKind::SubtitleCodes, subtitles.len() as u64);

    let outcomes: Vec<Option<Finding>> = subtitles
        .par_iter()
        .map(|subtitle| {
            let finding = check_code(subtitle, expected, detector);
            progress.advance(CheckKind::SubtitleCodes, &subtitle.path);
            finding
        })
        .collect();

    let mut report = CodeReport {
        expected: Some(expected),
        ..Default::default()
    };
    report.summary.total = subtitles.len();
    for finding in outcomes.into_iter().flatten() {
        report.summary.incorrect += 1;
        if let Finding::BadSubtitleCode {
            fallback_detection: Some(fallback),
            ..
        } = &finding
        {
            match fallback {
                FallbackDetection::Detected { .. } => report.summary.detected += 1,
                FallbackDetection::Failed { .. } => report.summary.detection_failed += 1,
            }
        }
        report.findings.push(finding);
    }

    progress.finish(CheckKind::SubtitleCodes);
    log::info!(
        "Found {} subtitle files of which {} are incorrectly named",
        report.summary.total,
        report.summary.incorrect
    );
    report
}

/// Per-subtitle outcome of the media name check
#[derive(Debug, Clone, PartialEq)]
pub enum NamingOutcome {
    /// Every sibling media file matches
    Matched,
    /// One finding per sibling that does not match
    Mismatched(Vec<Finding>),
    /// No sibling media file to compare with
    NoMedia(Finding),
}

/// Media files in a folder that subtitles should be named after
pub fn naming_targets(node: &FolderNode, config: &AuditConfig) -> Vec<MediaFile> {
    let marker = config.trailer_marker.as_str();
    node.files
        .iter()
        .filter(|name| FileKind::of(name, config) == FileKind::Media)
        .filter(|name| marker.is_empty() || !name.contains(marker))
        .map(|name| MediaFile::new(&node.path, name))
        .collect()
}

/// Whether a subtitle is named after a media file
///
/// Both `movie.en.srt` and `movie.srt` match `movie.mkv`.
pub fn matches_media(subtitle: &SubtitleFile, media: &MediaFile) -> bool {
    let stem = media.stem();
    stem == subtitle.stem || stem == subtitle.name_without_extension()
}

/// Compare one subtitle with the media files next to it
pub fn check_media_name(subtitle: &SubtitleFile, targets: &[MediaFile]) -> NamingOutcome {
    if targets.is_empty() {
        let directory = subtitle
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        log::info!("No media files next to {}", subtitle.path.display());
        return NamingOutcome::NoMedia(Finding::MissingMedia {
            subtitle_path: subtitle.path.clone(),
            directory,
        });
    }

    let mismatches: Vec<Finding> = targets
        .iter()
        .filter(|media| !matches_media(subtitle, media))
        .map(|media| {
            log::warn!(
                "Incorrectly named subtitle {} (media file {:?})",
                subtitle.path.display(),
                media.basename
            );
            Finding::NamingMismatch {
                subtitle_path: subtitle.path.clone(),
                media_path: media.path.clone(),
            }
        })
        .collect();

    if mismatches.is_empty() {
        NamingOutcome::Matched
    } else {
        NamingOutcome::Mismatched(mismatches)
    }
}

/// Check that every subtitle is named after the media files in its folder
pub fn validate_media_names(ctx: &ScanContext, progress: &dyn ProgressSink) -> NamingReport {
    let config = ctx.config();
    let work: Vec<(SubtitleFile, Vec<MediaFile>)> = ctx
        .tree()
        .nodes()
        .iter()
        .flat_map(|node| {
            let targets = naming_targets(node, config);
            node.files
                .iter()
                .filter(|name| FileKind::of(name, config) == FileKind::Subtitle)
                .map(move |name| (SubtitleFile::new(&node.path, name), targets.clone()))
                .collect::<Vec<_>>()
        })
        .collect();
    progress.begin(CheckKind::SubtitleNaming, work.len() as u64);

    let outcomes: Vec<NamingOutcome> = work
        .par_iter()
        .map(|(subtitle, targets)| {
            let outcome = check_media_name(subtitle, targets);
            progress.advance(CheckKind::SubtitleNaming, &subtitle.path);
            outcome
        })
        .collect();

    let mut report = NamingReport::default();
    report.summary.total = work.len();
    for outcome in outcomes {
        match outcome {
            NamingOutcome::Matched => {}
            NamingOutcome::Mismatched(findings) => {
                report.summary.incorrectly_named += 1;
                report.summary.mismatches += findings.len();
                report.findings.extend(findings);
            }
            NamingOutcome::NoMedia(finding) => {
                report.summary.without_media += 1;
                report.findings.push(finding);
            }
        }
    }

    progress.finish(CheckKind::SubtitleNaming);
    log::info!(
        "Found {} subtitle files of which {} are incorrectly named",
        report.summary.total,
        report.summary.incorrectly_named
    );
    report
}
