//! Library exports for hosts embedding the selection history.
/// Application directory resolution.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
/// Recorded selections and navigation.
pub mod history;
/// Tracing subscriber setup.
pub mod logging;

mod atomic_file;
