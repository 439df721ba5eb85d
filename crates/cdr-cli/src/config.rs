//! Runtime settings resolved from flags, environment and defaults

use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub recordings_dir: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            db_path: cli
                .db_path
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(cdr_db::default_db_path),
            recordings_dir: cli
                .recordings_dir
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(cdr_recordings::default_recordings_dir),
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
