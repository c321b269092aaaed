//! Logging setup for the agent binary.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/agent/logs`
/// - Linux: `~/.cache/agent/logs` (or `$XDG_CACHE_HOME/agent/logs`)
/// - Windows: `%LOCALAPPDATA%\agent\logs`
/// - Fallback: `/tmp/agent/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/agent"))
        .join("logs")
}

/// Resolve the session id, generating one from the wall clock if absent.
pub fn session_id(configured: Option<&str>) -> String {
    configured.map(str::to_string).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    })
}

/// Create the per-session log directory under `base`.
pub fn session_log_dir(base: &Path, session_id: &str) -> Result<PathBuf> {
    let dir = base.join(session_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    Ok(dir)
}

/// Setup logging to both stderr and file
pub fn setup_logging(session_id: &str) -> Result<()> {
    let session_log_dir = session_log_dir(&log_dir(), session_id)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "agent.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    // stdout stays free for piping; diagnostics go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!(session = %session_id, "logging initialized");
    tracing::info!("Log file: {}/agent.log", session_log_dir.display());

    Ok(())
}
