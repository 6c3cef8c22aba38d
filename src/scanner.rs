//! Scanner module - walks the library once and keeps an ordered folder tree
//!
//! Every check works from the same [`ScanTree`] so a run touches the directory
//! structure a single time. Entries are sorted by file name, which keeps
//! discovery order (and therefore duplicate pairing) stable across runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::config::AuditConfig;
use crate::error::{AuditError, AuditErrorKind};
use crate::models::{FileKind, FolderRecord, MediaFile, SubtitleFile};

/// One directory of the scanned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    /// Full folder path
    pub path: PathBuf,
    /// Folder name without parents
    pub basename: String,
    /// Depth below the root (root is 0)
    pub depth: usize,
    /// Child folder names, sorted
    pub subdirs: Vec<String>,
    /// Contained file names, sorted; names that are not UTF-8 are left out
    pub files: Vec<String>,
    /// Entries present on disk but left out by the ignore list
    pub skipped_entries: usize,
}

impl FolderNode {
    fn new(path: &Path, depth: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            basename: basename_of(path),
            depth,
            subdirs: Vec::new(),
            files: Vec::new(),
            skipped_entries: 0,
        }
    }

    /// Whether the folder has no entries at all, ignored ones included
    pub fn is_empty(&self) -> bool {
        self.subdirs.is_empty() && self.files.is_empty() && self.skipped_entries == 0
    }

    /// Full path of a file in this folder
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Folder record used for duplicate grouping
    pub fn record(&self) -> FolderRecord {
        FolderRecord {
            path: self.path.clone(),
            basename: self.basename.clone(),
            phonetic_key: None,
        }
    }
}

/// Read-only, ordered view of a directory tree
#[derive(Debug, Clone, Default)]
pub struct ScanTree {
    root: PathBuf,
    nodes: Vec<FolderNode>,
    errors: Vec<AuditError>,
}

impl ScanTree {
    /// Walk `root` depth-first, applying the configured ignore list below the root
    pub fn walk(root: &Path, config: &AuditConfig) -> Self {
        let start = Instant::now();
        let mut nodes: Vec<FolderNode> = Vec::new();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();
        let mut errors = Vec::new();

        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match walker.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    let error = AuditError::from(e);
                    log::warn!("Walk error: {}", error);
                    errors.push(error);
                    continue;
                }
            };

            let path = entry.path();
            let depth = entry.depth();
            let name = entry.file_name().to_string_lossy().to_string();
            let parent = if depth == 0 {
                None
            } else {
                path.parent().and_then(|p| index.get(p).copied())
            };

            if entry.file_type().is_dir() {
                if depth > 0 && config.should_ignore_dir(&name) {
                    log::debug!("Skipping ignored directory {}", path.display());
                    if let Some(i) = parent {
                        nodes[i].skipped_entries += 1;
                    }
                    walker.skip_current_dir();
                    continue;
                }
                if let Some(i) = parent {
                    nodes[i].subdirs.push(name);
                }
                index.insert(path.to_path_buf(), nodes.len());
                nodes.push(FolderNode::new(path, depth));
            } else if let Some(i) = parent {
                match entry.file_name().to_str() {
                    Some(file_name) => nodes[i].files.push(file_name.to_string()),
                    None => {
                        let error = AuditError::new(
                            AuditErrorKind::InvalidPath,
                            Some(path.to_path_buf()),
                            "file name is not valid UTF-8",
                        );
                        log::warn!("Skipping file: {}", error);
                        nodes[i].skipped_entries += 1;
                        errors.push(error);
                    }
                }
            }
        }

        log::debug!(
            "Walked {} folders under {} in {} ms",
            nodes.len(),
            root.display(),
            start.elapsed().as_millis()
        );

        Self {
            root: root.to_path_buf(),
            nodes,
            errors,
        }
    }

    /// Root the tree was walked from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All folders in discovery order, root first
    pub fn nodes(&self) -> &[FolderNode] {
        &self.nodes
    }

    /// Errors met during the walk
    pub fn errors(&self) -> &[AuditError] {
        &self.errors
    }

    /// Number of folders, root included
    pub fn folder_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of files across all folders
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(|n| n.files.len()).sum()
    }

    /// Folder records in discovery order
    pub fn folder_records(&self) -> Vec<FolderRecord> {
        self.nodes.iter().map(FolderNode::record).collect()
    }

    /// Files of the given kind, as (folder, file name) pairs
    pub fn files_of_kind<'a>(
        &'a self,
        kind: FileKind,
        config: &'a AuditConfig,
    ) -> impl Iterator<Item = (&'a FolderNode, &'a str)> + 'a {
        self.nodes.iter().flat_map(move |node| {
            node.files
                .iter()
                .filter(move |name| FileKind::of(name, config) == kind)
                .map(move |name| (node, name.as_str()))
        })
    }

    /// Every subtitle file in the tree
    pub fn subtitle_files(&self, config: &AuditConfig) -> Vec<SubtitleFile> {
        self.files_of_kind(FileKind::Subtitle, config)
            .map(|(node, name)| SubtitleFile::new(&node.path, name))
            .collect()
    }

    /// Every media file in the tree
    pub fn media_files(&self, config: &AuditConfig) -> Vec<MediaFile> {
        self.files_of_kind(FileKind::Media, config)
            .map(|(node, name)| MediaFile::new(&node.path, name))
            .collect()
    }

    /// Look up the folder node for a path
    pub fn node(&self, path: &Path) -> Option<&FolderNode> {
        self.nodes.iter().find(|n| n.path == path)
    }
}

fn basename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
