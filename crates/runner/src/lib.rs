//! Runner kernel: the game-state record and the per-tick update that drives
//! the endless runner.
//!
//! # Invariants
//! - Health never drops below zero; reaching zero ends the run.
//! - Score grows by one per surviving tick and freezes at game over.
//! - The high score only ever increases.
//! - Obstacles are ordered by spawn time and leave once past the despawn depth,
//!   so their count stays within [`RunnerConfig::max_live_obstacles`].
//! - Given the same seed and inputs, two runs produce identical states.
//!
//! [`RunnerConfig::max_live_obstacles`]: blockrun_common::RunnerConfig::max_live_obstacles

pub mod autopilot;
pub mod clock;
pub mod event;
pub mod state;
mod update;

pub use autopilot::Autopilot;
pub use clock::FixedStep;
pub use event::RunnerEvent;
pub use state::{Agent, AgentPhase, GameState, Obstacle, ObstacleId, RunSummary};
pub use update::{TickInput, TickOutcome};

pub fn crate_info() -> &'static str {
    "blockrun-runner v0.1.0"
}
