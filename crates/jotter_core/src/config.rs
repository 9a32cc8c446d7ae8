//! Storage location and logging settings.
//!
//! # Invariants
//! - The database path is fixed and owned by the application; nothing in
//!   the process environment changes it.
//! - Resolution never fails; a missing platform data dir falls back to the
//!   system temp dir.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "jotter";
pub const DB_FILE_NAME: &str = "notes.db";
const LOG_DIR_NAME: &str = "logs";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Application-owned locations under the platform data directory.
    pub fn resolve() -> Self {
        let app_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);
        Self {
            db_path: app_dir.join(DB_FILE_NAME),
            log_dir: app_dir.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }
}
