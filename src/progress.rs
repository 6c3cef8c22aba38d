//! Progress reporting module for audit checks
//!
//! This module provides the progress sink the checks report into and a
//! reporter that writes JSON lines to stderr for external callers.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::error::AuditError;

/// Check currently reporting progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Duplicate folders by exact name
    FoldersExact,
    /// Duplicate folders by phonetic key
    FoldersPhonetic,
    /// Subtitle language code standard
    SubtitleCodes,
    /// Subtitle names against sibling media
    SubtitleNaming,
    /// Subtitle content language
    LanguageCheck,
    /// Empty folders, unexpected and small files
    Garbage,
}

impl CheckKind {
    /// Get string representation of the check
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::FoldersExact => "folders_exact",
            CheckKind::FoldersPhonetic => "folders_phonetic",
            CheckKind::SubtitleCodes => "subtitle_codes",
            CheckKind::SubtitleNaming => "subtitle_naming",
            CheckKind::LanguageCheck => "language_check",
            CheckKind::Garbage => "garbage",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress from the checks
///
/// Calls may come from several worker threads at once.
pub trait ProgressSink: Send + Sync {
    /// A check starts with `total` work units
    fn begin(&self, check: CheckKind, total: u64);
    /// One work unit finished, whatever its outcome
    fn advance(&self, check: CheckKind, path: &Path);
    /// A non-fatal error worth surfacing
    fn fail(&self, check: CheckKind, error: &AuditError);
    /// The check is complete
    fn finish(&self, check: CheckKind);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&self, _check: CheckKind, _total: u64) {}
    fn advance(&self, _check: CheckKind, _path: &Path) {}
    fn fail(&self, _check: CheckKind, _error: &AuditError) {}
    fn finish(&self, _check: CheckKind) {}
}

/// Start message sent when a check begins
#[derive(Debug, Clone, Serialize)]
pub struct StartMessage {
    /// Always "start"
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since the reporter was built
    pub ts: u64,
    /// Check being started
    pub check: CheckKind,
    /// Work units the check will process
    pub total: u64,
}

impl StartMessage {
    /// Start line for `check`
    pub fn new(seq: u64, ts: u64, check: CheckKind, total: u64) -> Self {
        Self {
            msg_type: "start",
            seq,
            ts,
            check,
            total,
        }
    }
}

/// Progress message sent while a check runs
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMessage {
    /// Always "p"
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since the reporter was built
    pub ts: u64,
    /// Check reporting
    pub check: CheckKind,
    /// Work units done
    #[serde(rename = "n")]
    pub done: u64,
    /// Work units in total
    #[serde(rename = "of")]
    pub total: u64,
    /// Last path processed
    pub path: String,
    /// Projected time left, once at least one unit is done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_ms: Option<u64>,
}

impl ProgressMessage {
    pub fn new(
        seq: u64,
        ts: u64,
        check: CheckKind,
        done: u64,
        total: u64,
        path: String,
        eta_ms: Option<u64>,
    ) -> Self {
        Self {
            msg_type: "p",
            seq,
            ts,
            check,
            done,
            total,
            path,
            eta_ms,
        }
    }
}

/// Error message sent when a file or folder could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct ErrorProgressMessage {
    /// Always "err"
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since the reporter was built
    pub ts: u64,
    /// Check reporting
    pub check: CheckKind,
    /// Error kind name
    pub error_type: String,
    /// Human readable cause
    pub message: String,
    /// Offending path, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Done message sent when a check completes
#[derive(Debug, Clone, Serialize)]
pub struct DoneMessage {
    /// Always "done"
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Milliseconds since the reporter was built
    pub ts: u64,
    /// Check that completed
    pub check: CheckKind,
    /// Work units done
    #[serde(rename = "n")]
    pub done: u64,
    /// Errors reported during the check
    #[serde(rename = "ec")]
    pub error_count: u64,
    /// Check duration in milliseconds
    pub ms: u64,
}

/// Progress reporter writing JSON lines to stderr
///
/// Counters are atomic and the throttle timestamp sits behind a mutex, so
/// worker threads can report concurrently and `done` only ever grows.
pub struct ProgressReporter {
    /// Lines are only written when set
    enabled: bool,
    /// Minimum gap between two progress lines
    interval_ms: u64,
    /// Last progress line time
    last_report: Mutex<Instant>,
    /// Start of the current check
    check_start: Mutex<Instant>,
    /// Sequence number for messages
    seq: AtomicU64,
    /// Work units done in the current check
    done: AtomicU64,
    /// Work units in the current check
    total: AtomicU64,
    /// Errors in the current check
    errors: AtomicU64,
    /// Reporter creation time
    start_time: Instant,
}

impl ProgressReporter {
    /// Build a reporter; `interval_ms` throttles the per-file lines only
    pub fn new(enabled: bool, interval_ms: u64) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            interval_ms,
            last_report: Mutex::new(now),
            check_start: Mutex::new(now),
            seq: AtomicU64::new(0),
            done: AtomicU64::new(0),
            total: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            start_time: now,
        }
    }

    /// Whether lines are written at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Next message sequence number
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Milliseconds since the reporter was built
    pub fn current_timestamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Work units done in the current check
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::SeqCst)
    }

    /// Claim the right to emit a throttled line, if the interval has passed
    fn take_slot(&self) -> bool {
        let mut last = self.last_report.lock().unwrap_or_else(|e| e.into_inner());
        if last.elapsed().as_millis() as u64 >= self.interval_ms {
            *last = Instant::now();
            true
        } else {
            false
        }
    }

    fn check_elapsed_ms(&self) -> u64 {
        self.check_start
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
            .as_millis() as u64
    }

    fn eta_ms(&self, done: u64, total: u64) -> Option<u64> {
        if done == 0 || done >= total {
            return None;
        }
        let elapsed = self.check_elapsed_ms();
        Some(elapsed * (total - done) / done)
    }

    /// Write one message as a JSON line on stderr
    pub fn output_to_stderr<T: Serialize>(&self, msg: &T) {
        if let Ok(line) = serde_json::to_string(msg) {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", line).ok();
            stderr.flush().ok();
        }
    }
}

impl ProgressSink for ProgressReporter {
    fn begin(&self, check: CheckKind, total: u64) {
        self.done.store(0, Ordering::SeqCst);
        self.errors.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
        *self.check_start.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();

        if !self.enabled {
            return;
        }
        let msg = StartMessage::new(self.next_seq(), self.current_timestamp(), check, total);
        self.output_to_stderr(&msg);
    }

    fn advance(&self, check: CheckKind, path: &Path) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.enabled || !self.take_slot() {
            return;
        }
        let total = self.total.load(Ordering::SeqCst);
        let msg = ProgressMessage::new(
            self.next_seq(),
            self.current_timestamp(),
            check,
            done,
            total,
            path.to_string_lossy().to_string(),
            self.eta_ms(done, total),
        );
        self.output_to_stderr(&msg);
    }

    fn fail(&self, check: CheckKind, error: &AuditError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        if !self.enabled {
            return;
        }
        let msg = ErrorProgressMessage {
            msg_type: "err",
            seq: self.next_seq(),
            ts: self.current_timestamp(),
            check,
            error_type: format!("{:?}", error.kind),
            message: error.message.clone(),
            path: error.path.as_ref().map(|p| p.to_string_lossy().to_string()),
        };
        self.output_to_stderr(&msg);
    }

    fn finish(&self, check: CheckKind) {
        if !self.enabled {
            return;
        }
        let msg = DoneMessage {
            msg_type: "done",
            seq: self.next_seq(),
            ts: self.current_timestamp(),
            check,
            done: self.done(),
            error_count: self.errors.load(Ordering::SeqCst),
            ms: self.check_elapsed_ms(),
        };
        self.output_to_stderr(&msg);
    }
}
