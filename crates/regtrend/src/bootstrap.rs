use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.regtrend/` exists (it holds `last_used.json`).
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let dir = home.join(".regtrend");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Where log output goes.
#[derive(Debug, PartialEq)]
enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    /// A full-screen UI owns the terminal and no file was given.
    Discard,
}

fn log_target(log_file: Option<&Path>, interactive: bool) -> LogTarget<'_> {
    match (log_file, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Discard,
        (None, false) => LogTarget::Stderr,
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, output is appended to that file without ANSI colours.
/// Otherwise it goes to stderr, or nowhere when `interactive` is set.
pub fn setup_logging(
    log_level: &str,
    log_file: Option<&Path>,
    interactive: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::new(level_directive(log_level));
    let registry = tracing_subscriber::registry().with(filter);
    match log_target(log_file, interactive) {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::options().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            registry.with(layer).try_init()?;
        }
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
        LogTarget::Discard => {
            let layer = fmt::layer().with_writer(std::io::sink);
            registry.with(layer).try_init()?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
