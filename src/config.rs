use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_DB_PATH;

pub const ENV_DB_PATH: &str = "BUFFON_DB_PATH";
pub const ENV_HISTORY_WINDOW: &str = "BUFFON_HISTORY_WINDOW";

/// Settings for one interactive session over a single experiment file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// SQLite file holding the rounds; one experiment per file.
    pub db_path: PathBuf,
    /// Rounds shown at each end of the compact history.
    pub history_window: usize,
    /// Where exports without an explicit path are written.
    pub export_dir: PathBuf,
    /// Seed for simulated drops; random when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            history_window: 5,
            export_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Defaults, then the JSON file at `path` if given, then environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Applies `BUFFON_DB_PATH` and `BUFFON_HISTORY_WINDOW` as returned by `var`.
    pub fn with_overrides<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = var(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            self.db_path = PathBuf::from(p.trim());
        }
        if let Some(w) = var(ENV_HISTORY_WINDOW) {
            self.history_window = w
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_HISTORY_WINDOW}: {w:?}"))?;
        }
        Ok(self)
    }
}
