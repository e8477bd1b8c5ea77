//! Tracing setup for hosts and tools working with a history session.
//!
//! `init_session` writes to stderr and to a per-launch file under
//! `logs/<session>/`, keeping only the newest launches of that session.
//! `init_console` is the stderr-only variant.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::{app_dirs, config};

/// Launch logs kept per session.
const KEEP_SESSION_LOGS: usize = 10;
const LOG_FILE_PREFIX: &str = "selection_history";
const DEFAULT_FILTER: &str = "info";

/// Set once a subscriber is installed; holds the file writer guard if any.
static INSTALLED: OnceLock<Option<WorkerGuard>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    AppDirs(#[from] app_dirs::AppDirError),
    #[error("Failed to create session log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list session logs in {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old session log {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open session log in {path}: {source}")]
    OpenLog { path: PathBuf, source: InitError },
    #[error("Failed to format log timestamp: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Log to stderr and to a new file in the session's log directory.
///
/// Returns the file path, or `None` when a subscriber was already installed.
pub fn init_session(session: &str) -> Result<Option<PathBuf>, LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(None);
    }
    let dir = session_log_dir(&app_dirs::logs_dir()?, session)?;
    let stamp = format_stamp(now_local_or_utc())?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(format!("{LOG_FILE_PREFIX}_{stamp}"))
        .filename_suffix("log")
        .build(&dir)
        .map_err(|source| LoggingError::OpenLog {
            path: dir.clone(),
            source,
        })?;
    let path = dir.join(log_file_name(&stamp));
    let pruned = prune_session_logs(&dir, KEEP_SESSION_LOGS)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let timer = build_timer();
    let subscriber = Registry::default()
        .with(build_env_filter())
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(Some(guard));

    tracing::info!(session, pruned, log = %path.display(), "Session logging started");
    Ok(Some(path))
}

/// Log to stderr only, leaving no files behind.
pub fn init_console() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let subscriber = Registry::default().with(build_env_filter()).with(
        fmt::layer()
            .with_timer(build_timer())
            .with_writer(std::io::stderr),
    );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(None);
    Ok(())
}

fn session_log_dir(logs_root: &Path, session: &str) -> Result<PathBuf, LoggingError> {
    let dir = logs_root.join(config::session_dir_name(session));
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Delete all but the newest `keep` launch logs. Timestamped names sort
/// chronologically, so the oldest come first.
fn prune_session_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_launch_log(path))
        .collect();
    if logs.len() <= keep {
        return Ok(0);
    }
    logs.sort();
    let excess = logs.len() - keep;
    for path in logs.drain(..excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(excess)
}

fn is_launch_log(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "log")
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&format!("{LOG_FILE_PREFIX}_")))
}

fn format_stamp(now: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(now.format(STAMP_FORMAT)?)
}

fn log_file_name(stamp: &str) -> String {
    format!("{LOG_FILE_PREFIX}_{stamp}.log")
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
