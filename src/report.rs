//! Audit report and its plain text and JSON renderings

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::PathBuf;

use crate::error::AuditError;
use crate::folders::DuplicateReport;
use crate::garbage::GarbageReport;
use crate::langcheck::LanguageReport;
use crate::models::{FallbackDetection, Finding, Severity};
use crate::naming::{CodeReport, NamingReport};

/// Everything one audit run found
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Absolute scan root
    pub root: PathBuf,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Run duration in milliseconds
    pub duration_ms: u64,
    /// Folders walked, root included
    pub folders: usize,
    /// Files seen
    pub files: usize,
    /// Errors met while walking the tree
    pub walk_errors: usize,
    /// Duplicate folders by exact name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_folders: Option<DuplicateReport>,
    /// Duplicate folders by phonetic key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic_folders: Option<DuplicateReport>,
    /// Subtitle language code standard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_codes: Option<CodeReport>,
    /// Subtitle names against sibling media
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_naming: Option<NamingReport>,
    /// Subtitle content language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_check: Option<LanguageReport>,
    /// Empty folders, unexpected and small files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garbage: Option<GarbageReport>,
}

impl AuditReport {
    /// An empty report for a run starting now
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            started_at: Utc::now(),
            duration_ms: 0,
            folders: 0,
            files: 0,
            walk_errors: 0,
            exact_folders: None,
            phonetic_folders: None,
            subtitle_codes: None,
            subtitle_naming: None,
            language_check: None,
            garbage: None,
        }
    }

    /// All findings, section by section
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        let sections: [Option<&Vec<Finding>>; 6] = [
            self.exact_folders.as_ref().map(|r| &r.findings),
            self.phonetic_folders.as_ref().map(|r| &r.findings),
            self.subtitle_codes.as_ref().map(|r| &r.findings),
            self.subtitle_naming.as_ref().map(|r| &r.findings),
            self.language_check.as_ref().map(|r| &r.findings),
            self.garbage.as_ref().map(|r| &r.findings),
        ];
        sections.into_iter().flatten().flatten()
    }

    /// Number of findings that need fixing
    pub fn warning_count(&self) -> usize {
        self.findings()
            .filter(|f| f.severity() == Severity::Warning)
            .count()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_text(self, f)
    }
}

/// Render the report as pretty-printed JSON
pub fn render_json(report: &AuditReport) -> Result<String, AuditError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the report as plain text
pub fn render_text<W: Write>(report: &AuditReport, out: &mut W) -> fmt::Result {
    writeln!(
        out,
        "Audit of {} (started {}, {} ms)",
        report.root.display(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_ms
    )?;
    writeln!(out, "  Folders: {}  Files: {}", report.folders, report.files)?;
    if report.walk_errors > 0 {
        writeln!(out, "  Unreadable entries: {}", report.walk_errors)?;
    }

    if let Some(section) = &report.exact_folders {
        heading(out, "Duplicate folder names")?;
        write_findings(out, &section.findings)?;
        let s = &section.summary;
        writeln!(
            out,
            "  Unique {}  Duplicate {}  Ignored {}  Total {}",
            s.unique, s.duplicate, s.ignored, s.total
        )?;
    }

    if let Some(section) = &report.phonetic_folders {
        heading(out, "Similar folder names")?;
        for cluster in &section.clusters {
            writeln!(out, "  {}", cluster.key)?;
            for folder in &cluster.folders {
                writeln!(out, "    {}", folder.path.display())?;
            }
        }
        let s = &section.summary;
        writeln!(
            out,
            "  Unique {}  Duplicate {}  Ignored {}  Total {}",
            s.unique, s.duplicate, s.ignored, s.total
        )?;
    }

    if let Some(section) = &report.subtitle_codes {
        heading(out, "Subtitle language codes")?;
        write_findings(out, &section.findings)?;
        let s = &section.summary;
        writeln!(
            out,
            "  Found {} subtitle files of which {} are incorrectly named",
            s.total, s.incorrect
        )?;
        if s.detected + s.detection_failed > 0 {
            writeln!(
                out,
                "  Content detected {}  Detection failed {}",
                s.detected, s.detection_failed
            )?;
        }
    }

    if let Some(section) = &report.subtitle_naming {
        heading(out, "Subtitle names")?;
        write_findings(out, &section.findings)?;
        let s = &section.summary;
        writeln!(
            out,
            "  Found {} subtitle files of which {} are incorrectly named ({} without media)",
            s.total, s.incorrectly_named, s.without_media
        )?;
    }

    if let Some(section) = &report.language_check {
        heading(out, "Subtitle content language")?;
        write_findings(out, &section.findings)?;
        let s = &section.summary;
        writeln!(out, "  Attempted detections: {}", s.attempted)?;
        writeln!(
            out,
            "  Failed detections: {} ({} undecided)",
            s.failed, s.indeterminate
        )?;
        writeln!(out, "  Detected wrong language: {}", s.wrong_language)?;
        if s.skipped > 0 {
            writeln!(out, "  Skipped (no language code): {}", s.skipped)?;
        }
    }

    if let Some(section) = &report.garbage {
        heading(out, "Garbage")?;
        write_findings(out, &section.findings)?;
        let s = &section.summary;
        writeln!(
            out,
            "  Empty folders {}  Unexpected extensions {}  Small files {}",
            s.empty_folders, s.unexpected_extensions, s.small_files
        )?;
    }

    Ok(())
}

fn heading<W: Write>(out: &mut W, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "== {} ==", title)
}

fn write_findings<W: Write>(out: &mut W, findings: &[Finding]) -> fmt::Result {
    for finding in findings {
        write_finding(out, finding)?;
    }
    Ok(())
}

/// One finding as indented plain text
pub fn write_finding<W: Write>(out: &mut W, finding: &Finding) -> fmt::Result {
    let tag = match finding.severity() {
        Severity::Info => "info",
        Severity::Warning => "warning",
    };
    match finding {
        Finding::DuplicateFolder { key, path_a, path_b } => {
            writeln!(out, "  [{}] Duplicate folder name \"{}\"", tag, key)?;
            writeln!(out, "      1: {}", path_a.display())?;
            writeln!(out, "      2: {}", path_b.display())
        }
        Finding::BadSubtitleCode {
            path,
            found_code,
            found_standard,
            expected_standard,
            suggested_code,
            fallback_detection,
        } => {
            writeln!(out, "  [{}] Incorrectly named subtitle {}", tag, path.display())?;
            match found_standard.as_iso() {
                Some(standard) => write!(
                    out,
                    "      Language code \"{}\" is {}, expected {}",
                    found_code, standard, expected_standard
                )?,
                None => write!(
                    out,
                    "      Language code \"{}\" is not ISO 639, expected {}",
                    found_code, expected_standard
                )?,
            }
            match suggested_code {
                Some(code) => writeln!(out, "; use \"{}\"", code)?,
                None => writeln!(out)?,
            }
            match fallback_detection {
                Some(FallbackDetection::Detected { code }) => {
                    writeln!(out, "      Content language is likely \"{}\"", code)
                }
                Some(FallbackDetection::Failed { failure }) => {
                    writeln!(out, "      Language detection failed: {}", failure)
                }
                None => Ok(()),
            }
        }
        Finding::NamingMismatch {
            subtitle_path,
            media_path,
        } => {
            writeln!(
                out,
                "  [{}] Subtitle {} does not match media file {}",
                tag,
                subtitle_path.display(),
                media_path.display()
            )
        }
        Finding::MissingMedia {
            subtitle_path,
            directory,
        } => {
            writeln!(
                out,
                "  [{}] No media files in {} for {}",
                tag,
                directory.display(),
                subtitle_path.display()
            )
        }
        Finding::LanguageMismatch {
            path,
            claimed_code,
            claimed_name,
            detected_code,
            detected_name,
            detected_alternatives,
        } => {
            writeln!(
                out,
                "  [{}] Detected \"{}\" ({}) but \"{}\" ({}) is used in {}",
                tag,
                detected_code,
                detected_name.as_deref().unwrap_or("unknown"),
                claimed_code,
                claimed_name.as_deref().unwrap_or("unknown"),
                path.display()
            )?;
            if !detected_alternatives.is_empty() {
                let ranked: Vec<String> = detected_alternatives
                    .iter()
                    .map(|a| format!("{}:{:.2}", a.code, a.confidence))
                    .collect();
                writeln!(out, "      {}", ranked.join(", "))?;
            }
            Ok(())
        }
        Finding::EmptyFolder { path } => {
            writeln!(out, "  [{}] Empty folder {}", tag, path.display())
        }
        Finding::UnexpectedExtension { path, .. } => {
            writeln!(out, "  [{}] Unexpected file extension {}", tag, path.display())
        }
        Finding::SmallFile { path, size } => {
            writeln!(
                out,
                "  [{}] Unlikely small file {} ({} bytes)",
                tag,
                path.display(),
                size
            )
        }
    }
}
