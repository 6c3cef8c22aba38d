//! End-to-end audits over real directory trees

use media_auditor::{
    audit, AuditConfig, AuditPlan, DetectedLanguage, DetectionFailure, FallbackDetection, Finding,
    IsoStandard, LanguageDetector, LinguaDetector, NoProgress, ScanContext,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Detector that always answers the same language
struct FixedDetector(&'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, text: &str) -> Result<DetectedLanguage, DetectionFailure> {
        if text.trim().is_empty() {
            return Err(DetectionFailure::EmptyCorpus);
        }
        Ok(DetectedLanguage {
            code: self.0.to_string(),
            alternatives: Vec::new(),
        })
    }
}

const FRENCH_SRT: &str = "1
00:00:01,000 --> 00:00:03,000
Subtitles downloaded from www.example.com

2
00:00:04,000 --> 00:00:06,000
Bonjour, je m'appelle Marie et j'habite à Paris depuis dix ans.

3
00:00:07,000 --> 00:00:09,000
Nous allons au marché ce matin pour acheter du pain et des fromages.

4
00:00:10,000 --> 00:00:12,000
<i>Je ne sais pas pourquoi il est parti sans dire au revoir.</i>
";

const ENGLISH_SRT: &str = "1
00:00:01,000 --> 00:00:03,000
Sous-titres par quelqu'un

2
00:00:04,000 --> 00:00:06,000
Good morning, my name is John and I have lived in London for ten years.

3
00:00:07,000 --> 00:00:09,000
We are going to the market this morning to buy some bread and cheese.
";

fn mkdir(root: &Path, rel: &str) {
    fs::create_dir_all(root.join(rel)).unwrap();
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn context(dir: &TempDir, configure: impl FnOnce(AuditConfig) -> AuditConfig) -> ScanContext {
    let config = configure(AuditConfig::new(dir.path()));
    ScanContext::prepare(config).unwrap()
}

fn plan(configure: impl FnOnce(&mut AuditPlan)) -> AuditPlan {
    let mut plan = AuditPlan::default();
    configure(&mut plan);
    plan
}

#[test]
fn exact_duplicates_pair_with_first_folder() {
    let dir = tempfile::tempdir().unwrap();
    mkdir(dir.path(), "Show");
    mkdir(dir.path(), "show2/Show");

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.folders_exact = true),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.exact_folders.unwrap();
    // The root folder is visited too
    assert_eq!(section.summary.total, 4);
    assert_eq!(section.summary.unique, 3);
    assert_eq!(section.summary.duplicate, 1);
    assert_eq!(
        section.findings,
        vec![Finding::DuplicateFolder {
            key: "Show".to_string(),
            path_a: dir.path().join("Show"),
            path_b: dir.path().join("show2/Show"),
        }]
    );
}

#[test]
fn phonetic_duplicates_cluster_homophones() {
    let dir = tempfile::tempdir().unwrap();
    mkdir(dir.path(), "Jones");
    mkdir(dir.path(), "Smith");
    mkdir(dir.path(), "Smyth");

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.folders_phonetic = true),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.phonetic_folders.unwrap();
    assert_eq!(section.summary.duplicate, 1);
    assert_eq!(
        section.findings,
        vec![Finding::DuplicateFolder {
            key: "S5300000".to_string(),
            path_a: dir.path().join("Smith"),
            path_b: dir.path().join("Smyth"),
        }]
    );
    assert_eq!(section.clusters.len(), 1);
    assert_eq!(section.clusters[0].folders.len(), 2);
}

#[test]
fn year_folders_are_ignored_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    mkdir(dir.path(), "1999");
    mkdir(dir.path(), "Movies/1999");

    let ctx = context(&dir, |mut c| {
        c.ignore_year_folders = true;
        c
    });
    let report = audit::run(
        &ctx,
        &plan(|p| p.folders_phonetic = true),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.phonetic_folders.unwrap();
    assert_eq!(section.summary.ignored, 2);
    assert!(section.findings.is_empty());
    assert!(section
        .clusters
        .iter()
        .all(|c| c.folders.iter().all(|f| f.basename != "1999")));
}

#[test]
fn subtitle_codes_follow_requested_standard() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Movie/movie.en.srt", ENGLISH_SRT);
    write(dir.path(), "Movie/movie.eng.srt", ENGLISH_SRT);

    let ctx = context(&dir, |mut c| {
        c.language_fallback = false;
        c
    });
    let report = audit::run(
        &ctx,
        &plan(|p| p.subtitle_codes = Some(IsoStandard::Part2)),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.subtitle_codes.unwrap();
    assert_eq!(section.summary.total, 2);
    assert_eq!(section.summary.incorrect, 1);
    match &section.findings[0] {
        Finding::BadSubtitleCode {
            path,
            suggested_code,
            fallback_detection,
            ..
        } => {
            assert_eq!(path, &dir.path().join("Movie/movie.en.srt"));
            assert_eq!(suggested_code.as_deref(), Some("eng"));
            assert!(fallback_detection.is_none());
        }
        other => panic!("unexpected finding {:?}", other),
    }
}

#[test]
fn bad_codes_get_content_detection_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Movie/movie.english.srt", ENGLISH_SRT);

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.subtitle_codes = Some(IsoStandard::Part1)),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.subtitle_codes.unwrap();
    assert_eq!(section.summary.detected, 1);
    assert!(matches!(
        &section.findings[0],
        Finding::BadSubtitleCode {
            suggested_code: None,
            fallback_detection: Some(FallbackDetection::Detected { .. }),
            ..
        }
    ));
}

#[test]
fn subtitles_are_checked_against_sibling_media() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Alien/Alien.mkv", "video");
    write(dir.path(), "Alien/Alien-trailer.mp4", "video");
    write(dir.path(), "Alien/Alien.en.srt", ENGLISH_SRT);
    write(dir.path(), "Alien/Aliens.en.srt", ENGLISH_SRT);
    write(dir.path(), "Orphan/Orphan.en.srt", ENGLISH_SRT);

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.subtitle_naming = true),
        &FixedDetector("en"),
        &NoProgress,
    )
    .unwrap();

    let section = report.subtitle_naming.unwrap();
    assert_eq!(section.summary.total, 3);
    assert_eq!(section.summary.incorrectly_named, 1);
    assert_eq!(section.summary.mismatches, 1);
    assert_eq!(section.summary.without_media, 1);
    assert_eq!(
        section.findings,
        vec![
            Finding::NamingMismatch {
                subtitle_path: dir.path().join("Alien/Aliens.en.srt"),
                media_path: dir.path().join("Alien/Alien.mkv"),
            },
            Finding::MissingMedia {
                subtitle_path: dir.path().join("Orphan/Orphan.en.srt"),
                directory: dir.path().join("Orphan"),
            },
        ]
    );
}

#[test]
fn french_content_under_english_name_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Film/film.en.srt", FRENCH_SRT);
    write(dir.path(), "Film/film.fr.srt", FRENCH_SRT);
    write(dir.path(), "Film/film.eng.srt", ENGLISH_SRT);

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.language_check = true),
        &LinguaDetector::new(false),
        &NoProgress,
    )
    .unwrap();

    let section = report.language_check.unwrap();
    assert_eq!(section.summary.attempted, 3);
    assert_eq!(section.summary.wrong_language, 1);
    assert_eq!(section.summary.failed, 0);
    match &section.findings[0] {
        Finding::LanguageMismatch {
            path,
            claimed_code,
            detected_code,
            detected_alternatives,
            ..
        } => {
            assert_eq!(path, &dir.path().join("Film/film.en.srt"));
            assert_eq!(claimed_code, "en");
            assert_eq!(detected_code, "fr");
            assert!(!detected_alternatives.is_empty());
        }
        other => panic!("unexpected finding {:?}", other),
    }
}

#[test]
fn unreadable_subtitles_are_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Film/film.en.srt", "this is not a subtitle");
    write(dir.path(), "Film/film.fr.srt", FRENCH_SRT);
    write(dir.path(), "Film/film.srt", FRENCH_SRT);

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.language_check = true),
        &FixedDetector("fr"),
        &NoProgress,
    )
    .unwrap();

    let section = report.language_check.unwrap();
    assert_eq!(section.summary.attempted, 2);
    assert_eq!(section.summary.failed, 1);
    assert_eq!(section.summary.skipped, 1);
    assert!(section.findings.is_empty());
}

#[test]
fn overflowing_timing_fails_only_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Film/good.fr.srt", FRENCH_SRT);
    write(
        dir.path(),
        "Film/bad.fr.srt",
        "1\n9999999999999:00:01,000 --> 9999999999999:00:03,000\nBonjour\n",
    );

    let ctx = context(&dir, |c| c);
    let report = audit::run(
        &ctx,
        &plan(|p| p.language_check = true),
        &FixedDetector("fr"),
        &NoProgress,
    )
    .unwrap();

    let section = report.language_check.unwrap();
    assert_eq!(section.summary.attempted, 2);
    assert_eq!(section.summary.failed, 1);
    assert!(section.findings.is_empty());
}

#[test]
fn config_file_iso_mode_drives_full_audit() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Movie/movie.eng.srt", ENGLISH_SRT);
    write(dir.path(), "Movie/movie.mkv", "video");

    let settings = tempfile::tempdir().unwrap();
    let config_path = settings.path().join("audit.json");
    fs::write(
        &config_path,
        format!(
            r#"{{ "root": {:?}, "iso_mode": "2", "language_fallback": false }}"#,
            dir.path().to_string_lossy()
        ),
    )
    .unwrap();

    let config = AuditConfig::from_json_file(&config_path).unwrap();
    let plan = AuditPlan::all_for(&config);
    let ctx = ScanContext::prepare(config).unwrap();
    let report = audit::run(&ctx, &plan, &FixedDetector("en"), &NoProgress).unwrap();

    let section = report.subtitle_codes.unwrap();
    assert_eq!(section.expected, Some(IsoStandard::Part2));
    assert_eq!(section.summary.total, 1);
    assert_eq!(section.summary.incorrect, 0);
}

#[test]
fn audits_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    mkdir(dir.path(), "Smith/Show");
    mkdir(dir.path(), "Smyth/Show");
    mkdir(dir.path(), "Empty");
    write(dir.path(), "Smith/Show/show.en.srt", ENGLISH_SRT);
    write(dir.path(), "Smith/Show/Show.mkv", "video");
    write(dir.path(), "Smyth/notes.txt", "notes");

    let ctx = context(&dir, |mut c| {
        c.num_threads = 2;
        c
    });
    let plan = AuditPlan::all();
    let detector = FixedDetector("en");
    let first = audit::run(&ctx, &plan, &detector, &NoProgress).unwrap();
    let second = audit::run(&ctx, &plan, &detector, &NoProgress).unwrap();

    assert_eq!(first.exact_folders, second.exact_folders);
    assert_eq!(first.phonetic_folders, second.phonetic_folders);
    assert_eq!(first.subtitle_codes, second.subtitle_codes);
    assert_eq!(first.subtitle_naming, second.subtitle_naming);
    assert_eq!(first.language_check, second.language_check);
    assert_eq!(first.garbage, second.garbage);
    assert!(first.warning_count() > 0);

    // A fresh walk of the unchanged tree gives the same answers
    let again = audit::run(&context(&dir, |c| c), &plan, &detector, &NoProgress).unwrap();
    assert_eq!(first.garbage, again.garbage);
    assert_eq!(first.subtitle_naming, again.subtitle_naming);
}

#[test]
fn configuration_errors_are_fatal() {
    let err = ScanContext::prepare(AuditConfig::new("/no/such/media/library")).unwrap_err();
    assert!(err.is_fatal());

    let err = "3".parse::<IsoStandard>().unwrap_err();
    assert!(err.is_fatal());
}
