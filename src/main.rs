//! Media Auditor CLI
//!
//! Read-only checks for duplicate folders and subtitle naming in a media library.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use media_auditor::{
    audit, render_json, AuditConfig, AuditConfigBuilder, AuditError, AuditPlan, FileKind,
    IsoStandard, LinguaDetector, ProgressReporter, ScanContext,
};

const ABOUT: &str = r#"
Media Auditor - read-only media library consistency checks

Examples:
  media_auditor audit /media --all                      run every check
  media_auditor audit /media --folders-soundex --ignore-years
  media_auditor audit /media --subtitle-iso 2 --no-lang-detect
  media_auditor audit /media --language-check --json    JSON report on stdout
  media_auditor inventory /media --subtitles            list subtitle files

Nothing on disk is ever renamed or deleted.
"#;

/// Read-only media library auditor
#[derive(Parser)]
#[command(name = "media_auditor")]
#[command(author, version, about = ABOUT, long_about = None)]
#[command(help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run consistency checks and print a report
    Audit(AuditArgs),
    /// Count and list folders, media and subtitle files
    Inventory(InventoryArgs),
}

#[derive(Args)]
struct AuditArgs {
    /// Library root to audit
    root: PathBuf,

    /// Find folders with exactly the same name
    #[arg(long)]
    folders_exact: bool,

    /// Find folders with similar sounding names
    #[arg(long)]
    folders_soundex: bool,

    /// Leave four-digit year folders out of phonetic grouping
    #[arg(long)]
    ignore_years: bool,

    /// Leave season folders (Season 1, S01, Specials) out of grouping
    #[arg(long)]
    ignore_seasons: bool,

    /// Check subtitle language codes against ISO 639-1 or 639-2
    #[arg(long, value_name = "1|2")]
    subtitle_iso: Option<String>,

    /// Check that subtitles are named after their media files
    #[arg(long)]
    subtitle_naming: bool,

    /// Compare subtitle content language with the code in the name
    #[arg(long)]
    language_check: bool,

    /// Find empty folders, unexpected file types and tiny files
    #[arg(long)]
    garbage: bool,

    /// Run every check (subtitle codes against --subtitle-iso, else the configured mode)
    #[arg(long)]
    all: bool,

    /// Skip content detection for subtitles with a bad language code
    #[arg(long)]
    no_lang_detect: bool,

    /// Faster, less accurate language detection
    #[arg(long)]
    low_accuracy: bool,

    /// Worker threads (0 = auto)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit JSON progress lines on stderr
    #[arg(long)]
    progress: bool,

    /// JSON configuration file; command line flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct InventoryArgs {
    /// Library root to list
    root: PathBuf,

    /// List subtitle files
    #[arg(long)]
    subtitles: bool,

    /// List media files
    #[arg(long)]
    media: bool,

    /// List folders
    #[arg(long)]
    folders: bool,
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Audit(args)) => run_audit(args),
        Some(Commands::Inventory(args)) => run_inventory(args),
        None => {
            println!("{}", ABOUT);
            println!("Use 'media_auditor audit -h' for the audit options");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("media_auditor: {}", e.message);
            if let Some(path) = &e.path {
                eprintln!("  path: {}", path.display());
            }
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &AuditArgs, iso_mode: Option<IsoStandard>) -> Result<AuditConfig, AuditError> {
    let base = match &args.config {
        Some(path) => AuditConfig::from_json_file(path)?,
        None => AuditConfig::default(),
    };
    let ignore_years = base.ignore_year_folders || args.ignore_years;
    let ignore_seasons = base.ignore_season_folders || args.ignore_seasons;
    let language_fallback = base.language_fallback && !args.no_lang_detect;
    let low_accuracy = base.low_accuracy_detection || args.low_accuracy;
    let show_progress = base.show_progress || args.progress;
    let threads = args.threads.unwrap_or(base.num_threads);
    let mode = iso_mode.unwrap_or(base.iso_mode);

    Ok(AuditConfigBuilder::from_config(base)
        .root(args.root.clone())
        .iso_mode(mode)
        .ignore_year_folders(ignore_years)
        .ignore_season_folders(ignore_seasons)
        .language_fallback(language_fallback)
        .low_accuracy_detection(low_accuracy)
        .show_progress(show_progress)
        .num_threads(threads)
        .build())
}

fn build_plan(args: &AuditArgs, config: &AuditConfig) -> AuditPlan {
    let mut plan = if args.all {
        AuditPlan::all_for(config)
    } else {
        AuditPlan::default()
    };
    plan.folders_exact |= args.folders_exact;
    plan.folders_phonetic |= args.folders_soundex;
    plan.subtitle_naming |= args.subtitle_naming;
    plan.language_check |= args.language_check;
    plan.garbage |= args.garbage;
    if args.subtitle_iso.is_some() {
        plan.subtitle_codes = Some(config.iso_mode);
    }
    plan
}

fn run_audit(args: AuditArgs) -> Result<(), AuditError> {
    let iso_mode = args
        .subtitle_iso
        .as_deref()
        .map(str::parse::<IsoStandard>)
        .transpose()?;

    let config = build_config(&args, iso_mode)?;
    let plan = build_plan(&args, &config);
    if plan.is_empty() {
        return Err(AuditError::configuration(
            "no check selected; pass --all or one of the check flags",
        ));
    }

    info!("Starting media audit...");
    info!("Root: {:?}", config.root);
    info!("Plan: {:?}", plan);
    info!(
        "Threads: {}",
        if config.num_threads == 0 {
            "auto".to_string()
        } else {
            config.num_threads.to_string()
        }
    );

    let progress = ProgressReporter::new(config.show_progress, config.progress_interval_ms);
    let detector = LinguaDetector::new(config.low_accuracy_detection);
    let ctx = ScanContext::prepare(config)?;
    let report = audit::run(&ctx, &plan, &detector, &progress)?;

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn run_inventory(args: InventoryArgs) -> Result<(), AuditError> {
    let ctx = ScanContext::prepare(AuditConfig::new(args.root))?;
    let config = ctx.config();
    let tree = ctx.tree();

    let subtitles = tree.files_of_kind(FileKind::Subtitle, config).count();
    let media = tree.files_of_kind(FileKind::Media, config).count();
    println!("Folders: {}", tree.folder_count());
    println!("Files: {}", tree.file_count());
    println!("  Media files: {}", media);
    println!("  Subtitle files: {}", subtitles);

    if args.folders {
        println!();
        for node in tree.nodes() {
            println!("{}", node.path.display());
        }
    }
    if args.media {
        println!();
        for file in tree.media_files(config) {
            println!("{}", file.path.display());
        }
    }
    if args.subtitles {
        println!();
        for file in tree.subtitle_files(config) {
            println!("{}", file.path.display());
        }
    }
    Ok(())
}
