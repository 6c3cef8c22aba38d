//! Core data models for the media auditor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::AuditConfig;
use crate::error::DetectionFailure;
use crate::filename::{split_extension, split_language_token};
use crate::iso639::{CodeStandard, IsoStandard};

/// Subtitle container formats the cue parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip (.srt)
    Srt,
    /// MicroDVD frame-based text (.sub)
    MicroDvd,
    /// Advanced SubStation Alpha (.ass, .ssa)
    Ass,
}

impl SubtitleFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "srt" => Some(SubtitleFormat::Srt),
            "sub" => Some(SubtitleFormat::MicroDvd),
            "ass" | "ssa" => Some(SubtitleFormat::Ass),
            _ => None,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::MicroDvd => "sub",
            SubtitleFormat::Ass => "ass",
        }
    }
}

/// Role of a file inside the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Subtitle file
    Subtitle,
    /// Video file
    Media,
    /// Anything else
    Other,
}

impl FileKind {
    /// Classify a file name using the configured extension lists
    pub fn of(name: &str, config: &AuditConfig) -> Self {
        let (_, ext) = split_extension(name);
        if ext.is_empty() {
            FileKind::Other
        } else if config.is_subtitle_extension(ext) {
            FileKind::Subtitle
        } else if config.is_media_extension(ext) {
            FileKind::Media
        } else {
            FileKind::Other
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Subtitle => "subtitle",
            FileKind::Media => "media",
            FileKind::Other => "other",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A folder seen during duplicate detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRecord {
    /// Full folder path
    pub path: PathBuf,
    /// Folder name without parents
    pub basename: String,
    /// Phonetic key, when computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic_key: Option<String>,
}

/// A subtitle file found in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleFile {
    /// Full path
    pub path: PathBuf,
    /// File name without path
    pub basename: String,
    /// Lowercase extension, without dot
    pub extension: String,
    /// Parser to use for the content, when the extension is a known format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SubtitleFormat>,
    /// Name without language token and extension
    pub stem: String,
    /// Language token from the name, empty when absent
    pub language_token: String,
}

impl SubtitleFile {
    /// Build from a directory and a file name
    pub fn new(dir: &Path, basename: &str) -> Self {
        let parts = split_language_token(basename);
        let extension = parts.extension.to_lowercase();
        Self {
            path: dir.join(basename),
            basename: basename.to_string(),
            format: SubtitleFormat::from_extension(&extension),
            extension,
            stem: parts.stem.to_string(),
            language_token: parts.token.to_string(),
        }
    }

    /// Name without extension, language token included
    pub fn name_without_extension(&self) -> &str {
        split_extension(&self.basename).0
    }
}

/// A media file found in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFile {
    /// Full path
    pub path: PathBuf,
    /// File name without path
    pub basename: String,
    /// Lowercase extension, without dot
    pub extension: String,
}

impl MediaFile {
    /// Build from a directory and a file name
    pub fn new(dir: &Path, basename: &str) -> Self {
        let (_, ext) = split_extension(basename);
        Self {
            path: dir.join(basename),
            basename: basename.to_string(),
            extension: ext.to_lowercase(),
        }
    }

    /// Name without extension
    pub fn stem(&self) -> &str {
        split_extension(&self.basename).0
    }
}

/// One ranked language guess
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageConfidence {
    /// ISO 639-1 code
    pub code: String,
    /// Relative confidence between 0 and 1
    pub confidence: f64,
}

/// Outcome of the best-effort detection run on a badly named subtitle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FallbackDetection {
    /// The content looks like this language
    Detected {
        /// ISO 639-1 code
        code: String,
    },
    /// Detection did not produce an answer
    Failed {
        /// Why it failed
        failure: DetectionFailure,
    },
}

/// How loudly a finding should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note
    Info,
    /// Something to fix
    Warning,
}

/// A reported inconsistency
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Two folders share a name or phonetic key
    DuplicateFolder {
        /// Folder name (exact mode) or phonetic key (soundex mode)
        key: String,
        /// Earlier folder
        path_a: PathBuf,
        /// Later folder
        path_b: PathBuf,
    },
    /// Subtitle language code does not follow the requested standard
    BadSubtitleCode {
        /// Subtitle path
        path: PathBuf,
        /// Token found in the name
        found_code: String,
        /// Standard the token classified under
        found_standard: CodeStandard,
        /// Standard that was requested
        expected_standard: IsoStandard,
        /// Equivalent code in the requested standard
        #[serde(skip_serializing_if = "Option::is_none")]
        suggested_code: Option<String>,
        /// Detection on the file content, when enabled
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback_detection: Option<FallbackDetection>,
    },
    /// Subtitle name does not match a sibling media file
    NamingMismatch {
        /// Subtitle path
        subtitle_path: PathBuf,
        /// Media file it was compared with
        media_path: PathBuf,
    },
    /// Subtitle has no sibling media file to match against
    MissingMedia {
        /// Subtitle path
        subtitle_path: PathBuf,
        /// Folder that holds it
        directory: PathBuf,
    },
    /// Subtitle content is in a different language than its name claims
    LanguageMismatch {
        /// Subtitle path
        path: PathBuf,
        /// Token found in the name
        claimed_code: String,
        /// Name of the claimed language
        #[serde(skip_serializing_if = "Option::is_none")]
        claimed_name: Option<String>,
        /// Detected ISO 639-1 code
        detected_code: String,
        /// Name of the detected language
        #[serde(skip_serializing_if = "Option::is_none")]
        detected_name: Option<String>,
        /// Ranked alternatives from the detector
        detected_alternatives: Vec<LanguageConfidence>,
    },
    /// Folder with no entries at all
    EmptyFolder {
        /// Folder path
        path: PathBuf,
    },
    /// File type that does not belong in a media library
    UnexpectedExtension {
        /// File path
        path: PathBuf,
        /// Lowercase extension, empty when the file has none
        extension: String,
    },
    /// File too small to be real media or subtitles
    SmallFile {
        /// File path
        path: PathBuf,
        /// Size in bytes
        size: u64,
    },
}

impl Finding {
    /// The path a finding is primarily about, used for ordering
    pub fn path(&self) -> &Path {
        match self {
            Finding::DuplicateFolder { path_b, .. } => path_b,
            Finding::BadSubtitleCode { path, .. } => path,
            Finding::NamingMismatch { subtitle_path, .. } => subtitle_path,
            Finding::MissingMedia { subtitle_path, .. } => subtitle_path,
            Finding::LanguageMismatch { path, .. } => path,
            Finding::EmptyFolder { path } => path,
            Finding::UnexpectedExtension { path, .. } => path,
            Finding::SmallFile { path, .. } => path,
        }
    }

    /// Severity of the finding
    pub fn severity(&self) -> Severity {
        match self {
            Finding::MissingMedia { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Short name of the finding kind
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::DuplicateFolder { .. } => "duplicate_folder",
            Finding::BadSubtitleCode { .. } => "bad_subtitle_code",
            Finding::NamingMismatch { .. } => "naming_mismatch",
            Finding::MissingMedia { .. } => "missing_media",
            Finding::LanguageMismatch { .. } => "language_mismatch",
            Finding::EmptyFolder { .. } => "empty_folder",
            Finding::UnexpectedExtension { .. } => "unexpected_extension",
            Finding::SmallFile { .. } => "small_file",
        }
    }
}

/// Sort findings by path so parallel checks render in a stable order
pub fn sort_by_path(findings: &mut [Finding]) {
    findings.sort_by(|a, b| a.path().cmp(b.path()));
}
