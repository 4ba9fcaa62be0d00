//! High-score persistence behind a small storage port.
//!
//! The session reads the best score once at startup and writes it back
//! whenever a game ends on a new record. Storage trouble is never fatal:
//! the caller degrades to a zero high score or skips the write.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where the single best-score value lives between sessions
pub trait ScoreStore: Send {
    /// Read the stored high score, `None` if nothing was saved yet
    fn load(&mut self) -> Result<Option<u32>>;

    /// Persist a new high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// File-backed store holding the high score as a small JSON document
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&mut self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read high score file {:?}", self.path))?;
        let record: HighScoreRecord = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse high score file {:?}", self.path))?;

        Ok(Some(record.high_score))
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })
            .context("failed to serialize high score")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write high score file {:?}", self.path))?;

        Ok(())
    }
}

/// In-memory store for tests and throwaway games
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    value: Option<u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self { value: Some(value) }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.value = Some(high_score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonScoreStore::new(dir.path().join("highscore.json"));

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonScoreStore::new(dir.path().join("highscore.json"));

        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), Some(42));

        store.save(99).unwrap();
        assert_eq!(store.load().unwrap(), Some(99));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scores").join("best.json");
        let mut store = JsonScoreStore::new(&path);

        store.save(7).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), Some(7));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "not json at all").unwrap();
        let mut store = JsonScoreStore::new(&path);

        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(3).unwrap();
        assert_eq!(store.load().unwrap(), Some(3));
    }
}
