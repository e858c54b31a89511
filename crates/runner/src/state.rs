use crate::event::RunnerEvent;
use blockrun_common::{ConfigError, RunnerConfig, SeededRng};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Stable identifier for an obstacle, unique within one [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// Vertical movement phase of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentPhase {
    #[default]
    Grounded,
    /// Rising after a jump.
    Jumping,
    /// Past the apex, coming down.
    Falling,
}

/// The player-controlled runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub phase: AgentPhase,
}

impl Agent {
    pub fn on_ground(ground_y: f32) -> Self {
        Self {
            position: Vec3::new(0.0, ground_y, 0.0),
            vertical_velocity: 0.0,
            phase: AgentPhase::Grounded,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.phase != AgentPhase::Grounded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
}

/// Complete state of one runner session.
///
/// The update step lives in [`GameState::tick`]; everything else here is
/// construction, inspection and reset.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: RunnerConfig,
    pub(crate) agent: Agent,
    pub(crate) health: u32,
    pub(crate) score: u64,
    pub(crate) high_score: u64,
    /// Oldest first.
    pub(crate) obstacles: VecDeque<Obstacle>,
    pub(crate) frame: u64,
    pub(crate) game_over: bool,
    pub(crate) seed: u64,
    pub(crate) rng: SeededRng,
    pub(crate) next_obstacle_id: u64,
    pub(crate) event_log: Vec<RunnerEvent>,
}

impl GameState {
    /// Fresh run with a zero high score.
    pub fn new(config: RunnerConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_high_score(config, seed, 0)
    }

    /// Fresh run carrying a previously persisted high score.
    ///
    /// The config is validated first; a zero spawn interval or a non-positive
    /// speed would leave the spawn schedule undefined.
    pub fn with_high_score(
        config: RunnerConfig,
        seed: u64,
        high_score: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            agent: Agent::on_ground(config.ground_y),
            health: config.max_health,
            score: 0,
            high_score,
            obstacles: VecDeque::with_capacity(config.max_live_obstacles()),
            frame: 0,
            game_over: false,
            seed,
            rng: SeededRng::new(seed),
            next_obstacle_id: 0,
            event_log: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Live obstacles, oldest first.
    pub fn obstacles(&self) -> impl ExactSizeIterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Number of ticks simulated since the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Read-only access to the pending event log.
    pub fn events(&self) -> &[RunnerEvent] {
        &self.event_log
    }

    /// Drain and return the pending events.
    pub fn drain_events(&mut self) -> Vec<RunnerEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Start a new run. Obstacles are cleared, health and score restored;
    /// the high score is kept. The spawn RNG continues its sequence so
    /// consecutive runs differ.
    pub fn reset(&mut self) {
        self.agent = Agent::on_ground(self.config.ground_y);
        self.health = self.config.max_health;
        self.score = 0;
        self.obstacles.clear();
        self.frame = 0;
        self.game_over = false;
        self.event_log.push(RunnerEvent::Reset);
        tracing::debug!(high_score = self.high_score, "runner reset");
    }

    /// Snapshot of the headline numbers.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            frame: self.frame,
            score: self.score,
            high_score: self.high_score,
            health: self.health,
            obstacles: self.obstacles.len(),
            game_over: self.game_over,
        }
    }

    /// Deterministic FNV-1a hash of the simulated state, for replay checks.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        mix(&mut h, &self.score.to_le_bytes());
        mix(&mut h, &self.health.to_le_bytes());
        mix(&mut h, &self.rng.state().to_le_bytes());
        for v in self.agent.position.to_array() {
            mix(&mut h, &v.to_le_bytes());
        }
        for o in &self.obstacles {
            mix(&mut h, &o.id.0.to_le_bytes());
            for v in o.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}

/// Headline numbers of a run, for logs and the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: u64,
    pub frame: u64,
    pub score: u64,
    pub high_score: u64,
    pub health: u32,
    pub obstacles: usize,
    pub game_over: bool,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Run: seed={} frame={} score={} high_score={} health={} obstacles={}{}",
            self.seed,
            self.frame,
            self.score,
            self.high_score,
            self.health,
            self.obstacles,
            if self.game_over { " GAME OVER" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_clean() {
        let s = GameState::new(RunnerConfig::default(), 1).unwrap();
        assert_eq!(s.health(), 100);
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), 0);
        assert_eq!(s.frame(), 0);
        assert_eq!(s.obstacle_count(), 0);
        assert!(!s.is_game_over());
        assert_eq!(s.agent().phase, AgentPhase::Grounded);
        assert_eq!(s.agent().position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn construction_rejects_undefined_spawn_schedule() {
        let stalled = RunnerConfig {
            obstacle_speed: 0.0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            GameState::new(stalled, 1),
            Err(ConfigError::Invalid {
                field: "runner.obstacle_speed",
                ..
            })
        ));

        let never = RunnerConfig {
            spawn_interval_ticks: 0,
            ..RunnerConfig::default()
        };
        assert!(GameState::with_high_score(never, 1, 10).is_err());
    }

    #[test]
    fn persisted_high_score_is_carried() {
        let s = GameState::with_high_score(RunnerConfig::default(), 1, 512).unwrap();
        assert_eq!(s.high_score(), 512);
    }

    #[test]
    fn reset_keeps_high_score_and_logs_event() {
        let mut s = GameState::with_high_score(RunnerConfig::default(), 1, 77).unwrap();
        s.score = 30;
        s.health = 0;
        s.game_over = true;
        s.frame = 30;
        s.obstacles.push_back(Obstacle {
            id: ObstacleId(0),
            position: Vec3::ZERO,
        });

        s.reset();

        assert_eq!(s.score(), 0);
        assert_eq!(s.health(), 100);
        assert_eq!(s.frame(), 0);
        assert_eq!(s.obstacle_count(), 0);
        assert!(!s.is_game_over());
        assert_eq!(s.high_score(), 77);
        assert_eq!(s.events(), &[RunnerEvent::Reset]);
    }

    #[test]
    fn summary_display_marks_game_over() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        assert!(s.summary().to_string().starts_with("Run: seed=1 frame=0"));
        assert!(!s.summary().to_string().contains("GAME OVER"));
        s.game_over = true;
        assert!(s.summary().to_string().contains("GAME OVER"));
    }
}
