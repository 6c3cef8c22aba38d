//! Per-run scan context
//!
//! Built once per run and passed by reference to each check.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::scanner::ScanTree;

/// Validated configuration plus the walked tree for one run
#[derive(Debug, Clone)]
pub struct ScanContext {
    config: AuditConfig,
    root: PathBuf,
    tree: ScanTree,
}

impl ScanContext {
    /// Validate `config` and walk its root
    ///
    /// Configuration problems are returned before any traversal starts.
    pub fn prepare(config: AuditConfig) -> Result<Self, AuditError> {
        config.validate()?;

        let root = absolute_root(&config.root)?;
        let start = Instant::now();
        let tree = ScanTree::walk(&root, &config);
        log::info!(
            "Scanned {} folders and {} files under {} in {} ms",
            tree.folder_count(),
            tree.file_count(),
            root.display(),
            start.elapsed().as_millis()
        );

        Ok(Self { config, root, tree })
    }

    /// Run configuration
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Absolute scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The walked tree
    pub fn tree(&self) -> &ScanTree {
        &self.tree
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf, AuditError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| {
        AuditError::configuration(format!("cannot resolve working directory: {}", e))
    })?;
    Ok(cwd.join(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_walks_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Show")).unwrap();

        let ctx = ScanContext::prepare(AuditConfig::new(dir.path())).unwrap();
        assert_eq!(ctx.root(), dir.path());
        assert_eq!(ctx.tree().folder_count(), 2);
    }

    #[test]
    fn test_prepare_rejects_missing_root() {
        let err = ScanContext::prepare(AuditConfig::new("/no/such/library")).unwrap_err();
        assert!(err.is_fatal());
    }
}
