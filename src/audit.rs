//! Audit orchestration
//!
//! Runs the selected checks over one [`ScanContext`] and gathers their
//! results into an [`AuditReport`]. Per-file checks run on a dedicated rayon
//! pool sized from the configuration.

use std::time::Instant;

use crate::config::AuditConfig;
use crate::context::ScanContext;
use crate::detect::LanguageDetector;
use crate::error::AuditError;
use crate::folders;
use crate::garbage;
use crate::iso639::IsoStandard;
use crate::langcheck;
use crate::models::sort_by_path;
use crate::naming;
use crate::progress::ProgressSink;
use crate::report::AuditReport;

/// Which checks to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditPlan {
    /// Duplicate folders by exact name
    pub folders_exact: bool,
    /// Duplicate folders by phonetic key
    pub folders_phonetic: bool,
    /// Subtitle language codes, judged against this standard
    pub subtitle_codes: Option<IsoStandard>,
    /// Subtitle names against sibling media files
    pub subtitle_naming: bool,
    /// Subtitle content language against the name
    pub language_check: bool,
    /// Empty folders, unexpected and small files
    pub garbage: bool,
}

impl AuditPlan {
    /// Every check, with subtitle codes judged against ISO 639-1
    pub fn all() -> Self {
        Self {
            folders_exact: true,
            folders_phonetic: true,
            subtitle_codes: Some(IsoStandard::Part1),
            subtitle_naming: true,
            language_check: true,
            garbage: true,
        }
    }

    /// Every check, with subtitle codes judged against the configured ISO mode
    pub fn all_for(config: &AuditConfig) -> Self {
        Self {
            subtitle_codes: Some(config.iso_mode),
            ..Self::all()
        }
    }

    /// Whether any check is selected
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a check needs the language detector
    pub fn needs_detector(&self) -> bool {
        self.language_check || self.subtitle_codes.is_some()
    }
}

/// Run the planned checks
///
/// Only worker pool setup can fail; per-file problems end up in the report
/// counters.
pub fn run(
    ctx: &ScanContext,
    plan: &AuditPlan,
    detector: &dyn LanguageDetector,
    progress: &dyn ProgressSink,
) -> Result<AuditReport, AuditError> {
    let start = Instant::now();
    let threads = ctx.config().effective_threads();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("audit-worker-{}", idx))
        .build()
        .map_err(|e| AuditError::runtime(format!("Failed to create thread pool: {}", e)))?;
    log::info!("Auditing {} with {} worker threads", ctx.root().display(), threads);

    let tree = ctx.tree();
    let mut report = AuditReport::new(ctx.root().to_path_buf());
    report.folders = tree.folder_count();
    report.files = tree.file_count();
    report.walk_errors = tree.errors().len();

    if plan.folders_exact {
        report.exact_folders = Some(folders::find_exact_duplicates(ctx, progress));
    }
    if plan.folders_phonetic {
        report.phonetic_folders = Some(folders::find_phonetic_duplicates(ctx, progress));
    }

    if let Some(expected) = plan.subtitle_codes {
        let mut section =
            pool.install(|| naming::validate_codes(ctx, expected, detector, progress));
        sort_by_path(&mut section.findings);
        report.subtitle_codes = Some(section);
    }
    if plan.subtitle_naming {
        let mut section = pool.install(|| naming::validate_media_names(ctx, progress));
        sort_by_path(&mut section.findings);
        report.subtitle_naming = Some(section);
    }
    if plan.language_check {
        let mut section = pool.install(|| langcheck::check_languages(ctx, detector, progress));
        sort_by_path(&mut section.findings);
        report.language_check = Some(section);
    }
    if plan.garbage {
        let mut section = garbage::find_garbage(ctx, progress);
        sort_by_path(&mut section.findings);
        report.garbage = Some(section);
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "Audit finished in {} ms with {} warnings",
        report.duration_ms,
        report.warning_count()
    );
    Ok(report)
}
