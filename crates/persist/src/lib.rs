//! Persistence of the single scalar the games keep between sessions: the
//! runner high score.
//!
//! # Invariants
//! - A stored high score only ever increases.
//! - A missing slot reads as zero; a corrupt or foreign slot fails closed.

mod store;

pub use store::{FileScoreStore, HighScoreRecord, MemoryScoreStore, ScoreStore, StoreError};

pub fn crate_info() -> &'static str {
    "blockrun-persist v0.1.0"
}
