//! Durable key/value storage for the best score
//!
//! The store is a small JSON object on disk mapping keys to string values.
//! The best score lives under [`HIGH_SCORE_KEY`] as a decimal string; any
//! other keys in the file are kept untouched on write.

use anyhow::{Context, Result};
use log::warn;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which the best score is stored
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Default location of the store file
pub const DEFAULT_STORE_FILE: &str = ".neon_snake_scores.json";

type Entries = BTreeMap<String, String>;

/// File-backed store for the high score
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted best score
    ///
    /// A missing file, a missing key or a value that does not parse as a
    /// non-negative integer all read as 0.
    pub fn load(&self) -> u32 {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Ignoring unreadable score store {:?}: {err:#}", self.path);
                return 0;
            }
        };

        entries
            .get(HIGH_SCORE_KEY)
            .map(|raw| parse_score(raw))
            .unwrap_or(0)
    }

    /// Persist a new best score
    pub fn save(&self, score: u32) -> Result<()> {
        // Keep whatever else is in the store; a corrupt file is replaced
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(HIGH_SCORE_KEY.to_string(), score.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize scores")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write scores to {:?}", self.path))?;

        Ok(())
    }

    fn read_entries(&self) -> Result<Entries> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };

        serde_json::from_str(&json).with_context(|| format!("Malformed score store {:?}", self.path))
    }
}

/// Parse a stored score, coercing anything malformed to 0
fn parse_score(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(score) => score,
        Err(_) => {
            warn!("Stored high score {raw:?} is not a number, using 0");
            0
        }
    }
}
