//! Process-wide rolling file logs.
//!
//! # Invariants
//! - The logger starts at most once; later calls with the same settings
//!   succeed, different settings fail with [`LoggingError::Conflict`].
//! - Nothing here panics.
//! - Events carry note ids and counts, never note text.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use std::sync::Once;
use thiserror::Error;

const FILE_BASENAME: &str = "jotter";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_FILES: usize = 3;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log_dir cannot be empty")]
    EmptyDirectory,
    #[error("log_dir must be an absolute path, got `{0}`")]
    RelativeDirectory(String),
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDirectory {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Backend(#[from] flexi_logger::FlexiLoggerError),
    #[error("logging already initialized with {setting} `{active}`; refusing to switch to `{requested}`")]
    Conflict {
        setting: &'static str,
        active: String,
        requested: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    dir: PathBuf,
}

impl LogSettings {
    fn parse(level: &str, dir: &str) -> Result<Self, LoggingError> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            other => return Err(LoggingError::UnsupportedLevel(other.to_string())),
        };

        let dir = dir.trim();
        if dir.is_empty() {
            return Err(LoggingError::EmptyDirectory);
        }
        if !Path::new(dir).is_absolute() {
            return Err(LoggingError::RelativeDirectory(dir.to_string()));
        }

        Ok(Self {
            level,
            dir: PathBuf::from(dir),
        })
    }

    fn check_matches(&self, requested: &Self) -> Result<(), LoggingError> {
        if self.dir != requested.dir {
            return Err(LoggingError::Conflict {
                setting: "directory",
                active: self.dir.display().to_string(),
                requested: requested.dir.display().to_string(),
            });
        }
        if self.level != requested.level {
            return Err(LoggingError::Conflict {
                setting: "level",
                active: self.level.to_string(),
                requested: requested.level.to_string(),
            });
        }
        Ok(())
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts rolling file logs at `level` under the absolute directory `log_dir`.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(requested.clone()))?;
    active.settings.check_matches(&requested)
}

/// Active `(level, log_dir)`, if logging has been started.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.settings.level, active.settings.dir.clone()))
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDirectory {
        path: settings.dir.display().to_string(),
        source,
    })?;

    let handle = Logger::try_with_str(settings.level)?
        .log_to_file(
            FileSpec::default()
                .directory(&settings.dir)
                .basename(FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    PANIC_HOOK.call_once(install_panic_hook);

    info!(
        "event=logging_init module=core status=ok level={} log_dir={} os={} debug_build={} version={}",
        settings.level,
        settings.dir.display(),
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic module=core status=error location={location} payload={}",
            panic_summary(panic)
        );
        previous(panic);
    }));
}

fn panic_summary(panic: &PanicHookInfo<'_>) -> String {
    let payload = panic
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    single_line(payload, PANIC_PAYLOAD_LIMIT)
}

// Payloads may quote note text; keep them on one line and short.
fn single_line(value: &str, max_chars: usize) -> String {
    let mut out: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
