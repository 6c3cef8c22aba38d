//! Garbage detection: empty folders, unexpected file types and tiny files

use serde::Serialize;

use crate::context::ScanContext;
use crate::error::AuditError;
use crate::filename::split_extension;
use crate::models::Finding;
use crate::progress::{CheckKind, ProgressSink};

/// Counters for the garbage check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GarbageSummary {
    /// Folders with no entries
    pub empty_folders: usize,
    /// Files with an extension outside the media and subtitle lists
    pub unexpected_extensions: usize,
    /// Files below the size threshold
    pub small_files: usize,
    /// Files whose metadata could not be read
    pub unreadable: usize,
}

/// Result of the garbage check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GarbageReport {
    /// Counters
    pub summary: GarbageSummary,
    /// Findings in discovery order
    pub findings: Vec<Finding>,
}

/// Look for entries that do not belong in a clean library
pub fn find_garbage(ctx: &ScanContext, progress: &dyn ProgressSink) -> GarbageReport {
    let config = ctx.config();
    let nodes = ctx.tree().nodes();
    let mut report = GarbageReport::default();
    progress.begin(CheckKind::Garbage, nodes.len() as u64);

    for node in nodes {
        if node.is_empty() {
            log::warn!("Found empty folder: {}", node.path.display());
            report.summary.empty_folders += 1;
            report.findings.push(Finding::EmptyFolder {
                path: node.path.clone(),
            });
        }

        for name in &node.files {
            let path = node.file_path(name);
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    let error = AuditError::from(e);
                    let error = AuditError::new(error.kind, Some(path.clone()), error.message);
                    log::warn!("Cannot read metadata of {}: {}", path.display(), error.message);
                    progress.fail(CheckKind::Garbage, &error);
                    report.summary.unreadable += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let extension = split_extension(name).1.to_lowercase();
            if !config.is_allowed_extension(&extension) {
                log::warn!("Found unexpected file extension: {}", path.display());
                report.summary.unexpected_extensions += 1;
                report.findings.push(Finding::UnexpectedExtension {
                    path: path.clone(),
                    extension,
                });
            }

            if metadata.len() < config.small_file_threshold {
                log::warn!("Found unlikely small file: {}", path.display());
                report.summary.small_files += 1;
                report.findings.push(Finding::SmallFile {
                    path,
                    size: metadata.len(),
                });
            }
        }

        progress.advance(CheckKind::Garbage, &node.path);
    }

    progress.finish(CheckKind::Garbage);
    report
}
