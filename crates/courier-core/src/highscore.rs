//! Best-score persistence.
//!
//! The best score is stored as a single JSON object, `{"highScore": N}`.
//! A missing file reads as 0. A new score is written only when it beats the
//! stored one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Errors that can occur reading or writing the high-score file.
#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    /// The file exists but could not be read or written.
    #[error("high score file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file content is not a valid high-score record.
    #[error("high score file is malformed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// On-disk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Best score achieved.
    #[serde(rename = "highScore")]
    pub high_score: u32,
}

/// File-backed high-score store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    /// A store backed by the file at `path`. Nothing is read until
    /// [`HighScoreStore::load`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored best score, or 0 when no file exists yet.
    pub fn load(&self) -> Result<u32, HighScoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no high score file yet");
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&contents)?;
        Ok(record.high_score)
    }

    /// Store `score` if it beats the current best. Returns whether it was
    /// written.
    pub fn submit(&self, score: u32) -> Result<bool, HighScoreError> {
        let best = self.load()?;
        if score <= best {
            debug!(score, best, "score does not beat high score");
            return Ok(false);
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        std::fs::write(&self.path, json)?;
        info!(score, previous = best, path = %self.path.display(), "new high score saved");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> HighScoreStore {
        HighScoreStore::new(dir.path().join("highscore.json"))
    }

    #[test]
    fn missing_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load().unwrap(), 0);
    }

    #[test]
    fn only_higher_scores_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.submit(12).unwrap());
        assert!(!store.submit(12).unwrap());
        assert!(!store.submit(3).unwrap());
        assert_eq!(store.load().unwrap(), 12);
        assert!(store.submit(20).unwrap());
        assert_eq!(store.load().unwrap(), 20);
    }

    #[test]
    fn file_uses_camel_case_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.submit(7).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["highScore"], 7);
    }

    #[test]
    fn reads_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"highScore": 41}"#).unwrap();
        assert_eq!(store.load().unwrap(), 41);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(HighScoreError::Json { .. })));
    }
}
