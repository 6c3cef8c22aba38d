//! Duplicate folder detection
//!
//! Two grouping modes run over the folders in discovery order:
//!
//! - exact: the key is the folder name, and every repeat is paired with the
//!   first folder registered under that name.
//! - phonetic: the key is the eight character phonetic code of the name, and
//!   repeats are paired with the previous member of the same key.
//!
//! Year folder suppression only applies to the phonetic mode.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::context::ScanContext;
use crate::models::{Finding, FolderRecord};
use crate::phonetic::{self, FOLDER_KEY_LENGTH};
use crate::progress::{CheckKind, ProgressSink};

static YEAR_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}$").expect("year folder regex should compile")
});

static SEASON_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(season[ ._-]*\d+|s\d{1,3}|specials?)$")
        .expect("season folder regex should compile")
});

/// Whether a folder name is exactly four digits
pub fn is_year_folder(name: &str) -> bool {
    YEAR_FOLDER.is_match(name)
}

/// Whether a folder name looks like a season folder (`Season 1`, `S01`, `Specials`)
pub fn is_season_folder(name: &str) -> bool {
    SEASON_FOLDER.is_match(name.trim())
}

/// Which folders to leave out of grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderFilter {
    /// Leave out four-digit year folders (phonetic mode only)
    pub ignore_years: bool,
    /// Leave out season folders (both modes)
    pub ignore_seasons: bool,
}

/// Counters for one duplicate detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    /// Distinct keys registered
    pub unique: usize,
    /// Folders that repeated a registered key
    pub duplicate: usize,
    /// Folders left out of grouping
    pub ignored: usize,
    /// Folders visited
    pub total: usize,
}

/// All folders sharing a phonetic key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneticCluster {
    /// Phonetic key
    pub key: String,
    /// Members in discovery order
    pub folders: Vec<FolderRecord>,
}

/// Result of a duplicate detection pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateReport {
    /// Counters
    pub summary: FolderSummary,
    /// One finding per repeated folder
    pub findings: Vec<Finding>,
    /// Keys with more than one member, sorted by key (phonetic mode only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<PhoneticCluster>,
}

/// Group folders by exact name
pub fn group_exact(folders: &[FolderRecord], filter: FolderFilter) -> DuplicateReport {
    group_exact_with(folders, filter, |_| {})
}

/// Group folders by exact name, calling `visit` once per folder
fn group_exact_with(
    folders: &[FolderRecord],
    filter: FolderFilter,
    mut visit: impl FnMut(&FolderRecord),
) -> DuplicateReport {
    let mut known: HashMap<&str, &PathBuf> = HashMap::new();
    let mut report = DuplicateReport::default();

    for folder in folders {
        visit(folder);
        report.summary.total += 1;
        if filter.ignore_seasons && is_season_folder(&folder.basename) {
            report.summary.ignored += 1;
            continue;
        }

        match known.get(folder.basename.as_str()) {
            Some(original) => {
                report.summary.duplicate += 1;
                report.findings.push(Finding::DuplicateFolder {
                    key: folder.basename.clone(),
                    path_a: (*original).clone(),
                    path_b: folder.path.clone(),
                });
            }
            None => {
                known.insert(folder.basename.as_str(), &folder.path);
            }
        }
    }

    report.summary.unique = known.len();
    report
}

/// Group folders by phonetic key
pub fn group_phonetic(folders: &[FolderRecord], filter: FolderFilter) -> DuplicateReport {
    group_phonetic_with(folders, filter, |_| {})
}

fn group_phonetic_with(
    folders: &[FolderRecord],
    filter: FolderFilter,
    mut visit: impl FnMut(&FolderRecord),
) -> DuplicateReport {
    let mut previous: HashMap<String, PathBuf> = HashMap::new();
    let mut members: HashMap<String, Vec<FolderRecord>> = HashMap::new();
    let mut report = DuplicateReport::default();

    for folder in folders {
        visit(folder);
        report.summary.total += 1;
        if filter.ignore_seasons && is_season_folder(&folder.basename) {
            report.summary.ignored += 1;
            continue;
        }

        let key = match phonetic::encode(&folder.basename, FOLDER_KEY_LENGTH) {
            Ok(key) => key,
            Err(e) => {
                log::warn!(
                    "Could not compute the phonetic key of folder {}: {}",
                    folder.path.display(),
                    e
                );
                report.summary.ignored += 1;
                continue;
            }
        };

        let mut record = folder.clone();
        record.phonetic_key = Some(key.clone());

        if let Some(prev) = previous.get_mut(&key) {
            report.summary.duplicate += 1;
            report.findings.push(Finding::DuplicateFolder {
                key: key.clone(),
                path_a: std::mem::replace(prev, folder.path.clone()),
                path_b: folder.path.clone(),
            });
            members.entry(key).or_default().push(record);
            continue;
        }

        if filter.ignore_years
            && (is_year_folder(&folder.basename) || phonetic::is_year_sentinel(&key))
        {
            report.summary.ignored += 1;
            continue;
        }

        previous.insert(key.clone(), folder.path.clone());
        members.insert(key, vec![record]);
    }

    report.summary.unique = previous.len();

    // Stable sort keeps discovery order within a key
    report.findings.sort_by(|a, b| duplicate_key(a).cmp(duplicate_key(b)));

    let mut clusters: Vec<PhoneticCluster> = members
        .into_iter()
        .filter(|(_, folders)| folders.len() > 1)
        .map(|(key, folders)| PhoneticCluster { key, folders })
        .collect();
    clusters.sort_by(|a, b| a.key.cmp(&b.key));
    report.clusters = clusters;

    report
}

fn duplicate_key(finding: &Finding) -> &str {
    match finding {
        Finding::DuplicateFolder { key, .. } => key,
        _ => "",
    }
}

fn filter_for(ctx: &ScanContext) -> FolderFilter {
    FolderFilter {
        ignore_years: ctx.config().ignore_year_folders,
        ignore_seasons: ctx.config().ignore_season_folders,
    }
}

/// Find folders with identical names anywhere in the tree
pub fn find_exact_duplicates(ctx: &ScanContext, progress: &dyn ProgressSink) -> DuplicateReport {
    let records = ctx.tree().folder_records();
    progress.begin(CheckKind::FoldersExact, records.len() as u64);
    let report = group_exact_with(&records, filter_for(ctx), |folder| {
        progress.advance(CheckKind::FoldersExact, &folder.path)
    });
    progress.finish(CheckKind::FoldersExact);
    log::info!(
        "Exact folder names: {} unique, {} duplicate, {} ignored of {}",
        report.summary.unique,
        report.summary.duplicate,
        report.summary.ignored,
        report.summary.total
    );
    report
}

/// Find folders whose names sound alike anywhere in the tree
pub fn find_phonetic_duplicates(ctx: &ScanContext, progress: &dyn ProgressSink) -> DuplicateReport {
    let records = ctx.tree().folder_records();
    progress.begin(CheckKind::FoldersPhonetic, records.len() as u64);
    let report = group_phonetic_with(&records, filter_for(ctx), |folder| {
        progress.advance(CheckKind::FoldersPhonetic, &folder.path)
    });
    progress.finish(CheckKind::FoldersPhonetic);
    log::info!(
        "Phonetic folder names: {} unique, {} duplicate, {} ignored of {}",
        report.summary.unique,
        report.summary.duplicate,
        report.summary.ignored,
        report.summary.total
    );
    report
}
