//! Configuration for the media auditor

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::iso639::IsoStandard;

/// Files below this size are reported as implausibly small (4 KiB)
pub const DEFAULT_SMALL_FILE_THRESHOLD: u64 = 4 * 1024;

/// Default minimum interval between progress lines
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;

/// Media files whose name contains this marker are not naming targets
pub const DEFAULT_TRAILER_MARKER: &str = "-trailer";

/// Configuration for an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Root directory to audit
    pub root: PathBuf,

    /// ISO 639 standard subtitle language codes must follow
    pub iso_mode: IsoStandard,

    /// Skip folders named like a year (`1999`) when grouping duplicates
    pub ignore_year_folders: bool,

    /// Skip season folders (`Season 1`, `S01`, `Specials`) when grouping duplicates
    pub ignore_season_folders: bool,

    /// Run content language detection on subtitles with a bad code
    pub language_fallback: bool,

    /// Subtitle extensions (lowercase, without dot)
    pub subtitle_extensions: HashSet<String>,

    /// Media extensions (lowercase, without dot)
    pub media_extensions: HashSet<String>,

    /// Substring that marks a media file as a trailer
    pub trailer_marker: String,

    /// Files smaller than this many bytes are flagged
    pub small_file_threshold: u64,

    /// Directory names to ignore
    pub ignore_dirs: HashSet<String>,

    /// Number of worker threads for per-file checks
    /// 0 means auto-detect (CPU cores × 2)
    pub num_threads: usize,

    /// Emit JSON progress lines on stderr
    pub show_progress: bool,

    /// Minimum interval between progress lines
    pub progress_interval_ms: u64,

    /// Trade detection accuracy for speed and memory
    pub low_accuracy_detection: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            iso_mode: IsoStandard::Part1,
            ignore_year_folders: false,
            ignore_season_folders: false,
            language_fallback: true,
            subtitle_extensions: Self::default_subtitle_extensions(),
            media_extensions: Self::default_media_extensions(),
            trailer_marker: DEFAULT_TRAILER_MARKER.to_string(),
            small_file_threshold: DEFAULT_SMALL_FILE_THRESHOLD,
            ignore_dirs: Self::default_ignore_dirs(),
            num_threads: 0,
            show_progress: false,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
            low_accuracy_detection: false,
        }
    }
}

impl AuditConfig {
    /// Create a new config for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Create a config builder
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::new()
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, AuditError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuditError::configuration_at(path.to_path_buf(), format!("cannot read config: {}", e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AuditError::configuration_at(path.to_path_buf(), format!("invalid config: {}", e))
        })
    }

    /// Get the default subtitle extensions
    pub fn default_subtitle_extensions() -> HashSet<String> {
        ["srt", "sub", "ass", "ssa"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get the default media extensions
    pub fn default_media_extensions() -> HashSet<String> {
        ["mp4", "mkv", "avi", "m4v"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get the default directories to ignore
    pub fn default_ignore_dirs() -> HashSet<String> {
        [
            "$RECYCLE.BIN",
            "System Volume Information",
            ".Trash",
            ".Trash-1000",
            "@eaDir",
            ".git",
            ".svn",
            "__pycache__",
            ".cache",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Check if an extension belongs to a subtitle file
    pub fn is_subtitle_extension(&self, ext: &str) -> bool {
        self.subtitle_extensions.contains(&ext.to_lowercase())
    }

    /// Check if an extension belongs to a media file
    pub fn is_media_extension(&self, ext: &str) -> bool {
        self.media_extensions.contains(&ext.to_lowercase())
    }

    /// Check if an extension is expected in a clean library
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        self.is_subtitle_extension(ext) || self.is_media_extension(ext)
    }

    /// Check if a directory should be ignored
    pub fn should_ignore_dir(&self, name: &str) -> bool {
        // Ignore hidden directories (starting with .)
        if name.starts_with('.') {
            return true;
        }
        // Ignore configured directories
        self.ignore_dirs.contains(name)
    }

    /// Get the effective number of threads
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            // Auto-detect: CPU cores × 2
            std::thread::available_parallelism()
                .map(|p| p.get() * 2)
                .unwrap_or(4)
        } else {
            self.num_threads
        }
    }

    /// Check the settings that must hold before any traversal starts
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.root.as_os_str().is_empty() {
            return Err(AuditError::configuration("no scan root was given"));
        }
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            AuditError::configuration_at(
                self.root.clone(),
                format!("scan root does not exist or is not accessible: {}", e),
            )
        })?;
        if !metadata.is_dir() {
            return Err(AuditError::configuration_at(
                self.root.clone(),
                "scan root is not a directory",
            ));
        }
        if self.subtitle_extensions.is_empty() {
            return Err(AuditError::configuration("no subtitle extensions configured"));
        }
        Ok(())
    }
}

/// Builder for AuditConfig
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    config: AuditConfig,
}

impl AuditConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config, e.g. one loaded from a file
    pub fn from_config(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Set the root directory
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the requested ISO 639 standard
    pub fn iso_mode(mut self, mode: IsoStandard) -> Self {
        self.config.iso_mode = mode;
        self
    }

    /// Enable or disable year folder suppression
    pub fn ignore_year_folders(mut self, enabled: bool) -> Self {
        self.config.ignore_year_folders = enabled;
        self
    }

    /// Enable or disable season folder suppression
    pub fn ignore_season_folders(mut self, enabled: bool) -> Self {
        self.config.ignore_season_folders = enabled;
        self
    }

    /// Enable or disable detection on subtitles with a bad code
    pub fn language_fallback(mut self, enabled: bool) -> Self {
        self.config.language_fallback = enabled;
        self
    }

    /// Set the subtitle extensions
    pub fn subtitle_extensions(mut self, extensions: HashSet<String>) -> Self {
        self.config.subtitle_extensions = extensions;
        self
    }

    /// Set the media extensions
    pub fn media_extensions(mut self, extensions: HashSet<String>) -> Self {
        self.config.media_extensions = extensions;
        self
    }

    /// Set the trailer marker
    pub fn trailer_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.trailer_marker = marker.into();
        self
    }

    /// Set the small file threshold
    pub fn small_file_threshold(mut self, threshold: u64) -> Self {
        self.config.small_file_threshold = threshold;
        self
    }

    /// Set the directories to ignore
    pub fn ignore_dirs(mut self, dirs: HashSet<String>) -> Self {
        self.config.ignore_dirs = dirs;
        self
    }

    /// Add a directory to ignore
    pub fn add_ignore_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.ignore_dirs.insert(dir.into());
        self
    }

    /// Set the number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Enable or disable progress lines
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    /// Set the progress interval
    pub fn progress_interval_ms(mut self, interval: u64) -> Self {
        self.config.progress_interval_ms = interval;
        self
    }

    /// Enable or disable low accuracy detection
    pub fn low_accuracy_detection(mut self, enabled: bool) -> Self {
        self.config.low_accuracy_detection = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> AuditConfig {
        self.config
    }
}
