//! High score persistence
//!
//! The simulation only needs one number: the best score so far, read at
//! session start and raised when a session beats it. Where it lives is up to
//! the host, behind the `HighScoreStore` trait.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a final score; returns true if it set a new best
    pub fn check(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// Storage for the persisted high score
pub trait HighScoreStore {
    fn load(&self) -> Result<HighScore, StoreError>;
    fn save(&mut self, score: HighScore) -> Result<(), StoreError>;
}

/// In-memory store (tests, hosts without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: HighScore,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self {
            score: HighScore::new(best),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScore, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: HighScore) -> Result<(), StoreError> {
        self.score = score;
        Ok(())
    }
}

/// Pretty JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    /// A missing file is a fresh start; a corrupt one is replaced by 0
    fn load(&self) -> Result<HighScore, StoreError> {
        if !self.path.exists() {
            log::info!("No high score at {}, starting fresh", self.path.display());
            return Ok(HighScore::default());
        }
        let json = std::fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        match serde_json::from_str::<HighScore>(&json) {
            Ok(score) => {
                log::info!("Loaded high score {}", score.best);
                Ok(score)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", self.path.display(), e);
                Ok(HighScore::default())
            }
        }
    }

    fn save(&mut self, score: HighScore) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }
        let json = serde_json::to_string_pretty(&score).map_err(StoreError::Parse)?;
        std::fs::write(&self.path, json).map_err(StoreError::Write)?;
        log::info!("High score {} saved", score.best);
        Ok(())
    }
}
