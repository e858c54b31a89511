use crate::state::ObstacleId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Record of a notable change during a tick.
///
/// The host drains these after each frame to mirror obstacle lifetimes into
/// its scene and to persist a new high score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunnerEvent {
    /// Agent left the ground.
    Jumped { frame: u64 },
    /// Agent touched down again.
    Landed { frame: u64 },
    ObstacleSpawned { id: ObstacleId, position: Vec3 },
    /// Obstacle passed the despawn depth and was dropped.
    ObstacleDespawned { id: ObstacleId },
    /// Obstacle within collision range took `damage` off the agent.
    Hit {
        id: ObstacleId,
        damage: u32,
        health: u32,
    },
    /// Health reached zero. `new_record` is set when `score` raised the high score.
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
    /// State returned to the start of a run.
    Reset,
}
