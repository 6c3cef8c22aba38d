//! Read-only auditor for media library naming and subtitle consistency
//!
//! This library walks a media library once and reports duplicate folder
//! names (exact and phonetic), subtitle language codes outside the requested
//! ISO 639 standard, subtitles not named after their media, subtitles whose
//! content language disagrees with their name, and garbage entries. Nothing
//! on disk is ever modified.

pub mod audit;
pub mod config;
pub mod context;
pub mod detect;
pub mod error;
pub mod filename;
pub mod folders;
pub mod garbage;
pub mod iso639;
pub mod langcheck;
pub mod models;
pub mod naming;
pub mod phonetic;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod subtitle;

pub use audit::{run, AuditPlan};
pub use config::{AuditConfig, AuditConfigBuilder};
pub use context::ScanContext;
pub use detect::{DetectedLanguage, LanguageDetector, LinguaDetector};
pub use error::{AuditError, AuditErrorKind, DetectionFailure, EncodingError};
pub use filename::{split_language_token, LanguageToken};
pub use folders::{DuplicateReport, FolderSummary, PhoneticCluster};
pub use garbage::{GarbageReport, GarbageSummary};
pub use iso639::{classify, convert, Classification, CodeStandard, IsoStandard};
pub use langcheck::{LanguageReport, LanguageSummary};
pub use models::{
    FallbackDetection, FileKind, Finding, FolderRecord, LanguageConfidence, MediaFile, Severity,
    SubtitleFile, SubtitleFormat,
};
pub use naming::{CodeReport, CodeSummary, NamingReport, NamingSummary};
pub use progress::{CheckKind, NoProgress, ProgressReporter, ProgressSink};
pub use report::{render_json, render_text, AuditReport};
pub use scanner::{FolderNode, ScanTree};
