//! High-score slots.
//!
//! On disk the slot is a small JSON document:
//! ```text
//! <data_dir>/highscore.json   {"schema_version": 1, "high_score": 1234}
//! ```
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous record intact.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current schema version of the on-disk record.
const SCORE_SCHEMA_VERSION: u32 = 1;

const SLOT_FILE: &str = "highscore.json";

/// Errors from high-score persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

/// The persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub schema_version: u32,
    pub high_score: u64,
}

impl HighScoreRecord {
    pub fn new(high_score: u64) -> Self {
        Self {
            schema_version: SCORE_SCHEMA_VERSION,
            high_score,
        }
    }
}

/// A place the high score survives between sessions.
pub trait ScoreStore {
    /// Current high score; zero when nothing was ever recorded.
    fn load(&self) -> Result<u64, StoreError>;

    /// Offer a finished run's score. Stores it only if it beats the current
    /// record and returns whether it did.
    fn record(&mut self, score: u64) -> Result<bool, StoreError>;
}

/// Volatile store, for tests and sessions run without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    high_score: u64,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(high_score: u64) -> Self {
        Self { high_score }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.high_score)
    }

    fn record(&mut self, score: u64) -> Result<bool, StoreError> {
        if score > self.high_score {
            self.high_score = score;
            return Ok(true);
        }
        Ok(false)
    }
}

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    root: PathBuf,
}

impl FileScoreStore {
    /// Open (creating the directory if needed) a store under `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self) -> PathBuf {
        self.root.join(SLOT_FILE)
    }

    fn read_record(&self) -> Result<Option<HighScoreRecord>, StoreError> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let record: HighScoreRecord = serde_json::from_reader(std::fs::File::open(&path)?)?;
        if record.schema_version != SCORE_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: record.schema_version,
                expected_version: SCORE_SCHEMA_VERSION,
            });
        }
        Ok(Some(record))
    }

    fn write_record(&self, record: &HighScoreRecord) -> Result<(), StoreError> {
        let tmp = self.root.join(format!("{SLOT_FILE}.tmp"));
        serde_json::to_writer_pretty(std::fs::File::create(&tmp)?, record)?;
        std::fs::rename(&tmp, self.slot_path())?;
        Ok(())
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.read_record()?.map_or(0, |r| r.high_score))
    }

    fn record(&mut self, score: u64) -> Result<bool, StoreError> {
        let best = self.load()?;
        if score <= best {
            tracing::debug!(score, best, "score below record, not stored");
            return Ok(false);
        }
        self.write_record(&HighScoreRecord::new(score))?;
        tracing::info!(score, previous = best, path = %self.slot_path().display(), "new high score saved");
        Ok(true)
    }
}
