use crate::event::RunnerEvent;
use crate::state::{Agent, AgentPhase, GameState, Obstacle, ObstacleId};
use blockrun_common::RunnerConfig;
use glam::Vec3;

/// Player intent for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// Start a jump if the agent is on the ground.
    pub jump: bool,
    /// Lateral steering in `[-1, 1]`; negative is left.
    pub steer: f32,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            steer: 0.0,
        }
    }
}

/// Result of one call to [`GameState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The run continues.
    Running,
    /// Health reached zero on this tick.
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
    /// The run had already ended; nothing was simulated.
    Halted,
}

impl GameState {
    /// Advance the simulation by one tick.
    ///
    /// Order: kinematics, obstacle motion, spawning, despawning, collisions,
    /// then scoring or the terminal transition.
    pub fn tick(&mut self, input: TickInput) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Halted;
        }
        self.frame += 1;

        self.apply_kinematics(input);
        self.advance_obstacles();
        if self.frame % self.config.spawn_interval_ticks == 0 {
            self.spawn_obstacle();
        }
        self.despawn_passed();
        self.resolve_collisions();

        if self.health == 0 {
            return self.finish_run();
        }
        self.score += 1;
        TickOutcome::Running
    }

    fn apply_kinematics(&mut self, input: TickInput) {
        let cfg = &self.config;
        let agent = &mut self.agent;

        let steer = input.steer.clamp(-1.0, 1.0);
        if steer != 0.0 {
            agent.position.x = (agent.position.x + steer * cfg.steer_speed)
                .clamp(-cfg.lane_half_width, cfg.lane_half_width);
        }

        if input.jump && agent.phase == AgentPhase::Grounded {
            agent.vertical_velocity = cfg.jump_velocity;
            agent.phase = AgentPhase::Jumping;
            self.event_log.push(RunnerEvent::Jumped { frame: self.frame });
        }

        if agent.is_airborne() {
            agent.position.y += agent.vertical_velocity;
            agent.vertical_velocity -= cfg.gravity;
            if agent.phase == AgentPhase::Jumping && agent.vertical_velocity <= 0.0 {
                agent.phase = AgentPhase::Falling;
            }
            if agent.position.y <= cfg.ground_y {
                *agent = Agent {
                    position: Vec3::new(agent.position.x, cfg.ground_y, agent.position.z),
                    ..Agent::on_ground(cfg.ground_y)
                };
                self.event_log.push(RunnerEvent::Landed { frame: self.frame });
            }
        }
    }

    fn advance_obstacles(&mut self) {
        let step = self.config.obstacle_speed;
        for o in &mut self.obstacles {
            o.position.z += step;
        }
    }

    fn spawn_obstacle(&mut self) {
        let half = self.config.lane_half_width;
        let x = self.rng.range_f32(-half, half);
        let position = Vec3::new(x, self.config.ground_y, self.config.spawn_depth);
        let id = ObstacleId(self.next_obstacle_id);
        self.next_obstacle_id += 1;

        self.obstacles.push_back(Obstacle { id, position });
        self.event_log.push(RunnerEvent::ObstacleSpawned { id, position });
        tracing::debug!(id = id.0, x, frame = self.frame, "obstacle spawned");
    }

    fn despawn_passed(&mut self) {
        while let Some(front) = self.obstacles.front() {
            if front.position.z <= self.config.despawn_depth {
                break;
            }
            let id = front.id;
            self.obstacles.pop_front();
            self.event_log.push(RunnerEvent::ObstacleDespawned { id });
            tracing::debug!(id = id.0, frame = self.frame, "obstacle despawned");
        }
    }

    fn resolve_collisions(&mut self) {
        let agent_pos = self.agent.position;
        for o in &self.obstacles {
            if !collides(&self.config, agent_pos, o.position) {
                continue;
            }
            self.health = self.health.saturating_sub(self.config.damage_per_hit);
            self.event_log.push(RunnerEvent::Hit {
                id: o.id,
                damage: self.config.damage_per_hit,
                health: self.health,
            });
            tracing::debug!(id = o.id.0, health = self.health, "agent hit");
        }
    }

    fn finish_run(&mut self) -> TickOutcome {
        self.game_over = true;
        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
        }
        self.event_log.push(RunnerEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record,
        });
        tracing::info!(
            score = self.score,
            high_score = self.high_score,
            new_record,
            frame = self.frame,
            "game over"
        );
        TickOutcome::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record,
        }
    }
}

/// Distance test between the agent and one obstacle.
pub(crate) fn collides(config: &RunnerConfig, agent: Vec3, obstacle: Vec3) -> bool {
    agent.distance(obstacle) < config.collision_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Obstacles always spawn dead centre, straight at an idle agent.
    fn head_on_config() -> RunnerConfig {
        RunnerConfig {
            lane_half_width: 0.0,
            ..RunnerConfig::default()
        }
    }

    fn place(state: &mut GameState, position: Vec3) -> ObstacleId {
        let id = ObstacleId(state.next_obstacle_id);
        state.next_obstacle_id += 1;
        state.obstacles.push_back(Obstacle { id, position });
        id
    }

    #[test]
    fn obstacle_at_despawn_depth_lives_one_more_tick() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        let id = place(&mut s, Vec3::new(0.0, 0.5, 9.5));

        s.tick(TickInput::idle());
        assert_eq!(s.obstacles().next().map(|o| (o.id, o.position.z)), Some((id, 10.0)));

        s.drain_events();
        s.tick(TickInput::idle());
        assert_eq!(s.obstacle_count(), 0);
        assert_eq!(s.events(), &[RunnerEvent::ObstacleDespawned { id }]);
    }

    #[test]
    fn tick_advances_frame_and_score() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        assert_eq!(s.tick(TickInput::idle()), TickOutcome::Running);
        assert_eq!(s.tick(TickInput::idle()), TickOutcome::Running);
        assert_eq!(s.frame(), 2);
        assert_eq!(s.score(), 2);
    }

    #[test]
    fn obstacle_spawns_on_interval() {
        let cfg = RunnerConfig::default();
        let mut s = GameState::new(cfg.clone(), 9).unwrap();
        for _ in 0..cfg.spawn_interval_ticks - 1 {
            s.tick(TickInput::idle());
        }
        assert_eq!(s.obstacle_count(), 0);

        s.tick(TickInput::idle());
        assert_eq!(s.obstacle_count(), 1);
        let o = s.obstacles().next().unwrap();
        assert_eq!(o.position.z, cfg.spawn_depth);
        assert_eq!(o.position.y, cfg.ground_y);
        assert!(o.position.x.abs() <= cfg.lane_half_width);
        assert!(matches!(
            s.events().last(),
            Some(RunnerEvent::ObstacleSpawned { .. })
        ));
    }

    #[test]
    fn obstacles_move_at_constant_speed() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        place(&mut s, Vec3::new(3.0, 0.5, -20.0));
        s.tick(TickInput::idle());
        s.tick(TickInput::idle());
        assert_relative_eq!(s.obstacles().next().unwrap().position.z, -19.0);
    }

    #[test]
    fn oldest_obstacle_dropped_past_threshold() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        let old = place(&mut s, Vec3::new(3.0, 0.5, 9.75));
        place(&mut s, Vec3::new(3.0, 0.5, -5.0));
        s.tick(TickInput::idle());
        assert_eq!(s.obstacle_count(), 1);
        assert!(s.events().contains(&RunnerEvent::ObstacleDespawned { id: old }));
    }

    #[test]
    fn obstacle_count_stays_bounded() {
        let cfg = RunnerConfig {
            max_health: u32::MAX,
            ..RunnerConfig::default()
        };
        let bound = cfg.max_live_obstacles();
        let mut s = GameState::new(cfg, 3).unwrap();
        for _ in 0..5_000 {
            s.tick(TickInput::idle());
            assert!(s.obstacle_count() <= bound);
        }
        assert!(s.obstacle_count() > 0);
    }

    #[test]
    fn jump_rises_then_lands_on_ground() {
        let cfg = RunnerConfig::default();
        let mut s = GameState::new(cfg.clone(), 1).unwrap();
        s.tick(TickInput::jump());
        assert_eq!(s.agent().phase, AgentPhase::Jumping);
        assert!(s.agent().position.y > cfg.ground_y);

        let mut saw_falling = false;
        let mut peak = s.agent().position.y;
        for _ in 0..200 {
            s.tick(TickInput::idle());
            peak = peak.max(s.agent().position.y);
            if s.agent().phase == AgentPhase::Falling {
                saw_falling = true;
            }
            if s.agent().phase == AgentPhase::Grounded {
                break;
            }
        }
        assert!(saw_falling);
        assert_eq!(s.agent().phase, AgentPhase::Grounded);
        assert_eq!(s.agent().position.y, cfg.ground_y);
        assert_eq!(s.agent().vertical_velocity, 0.0);
        assert!(peak > cfg.ground_y + cfg.collision_radius);
        assert!(s.events().iter().any(|e| matches!(e, RunnerEvent::Landed { .. })));
    }

    #[test]
    fn jump_ignored_while_airborne() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        s.tick(TickInput::jump());
        let v = s.agent().vertical_velocity;
        s.tick(TickInput::jump());
        assert!(s.agent().vertical_velocity < v);
        let jumps = s
            .events()
            .iter()
            .filter(|e| matches!(e, RunnerEvent::Jumped { .. }))
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn steering_is_clamped_to_lane() {
        let cfg = RunnerConfig::default();
        let mut s = GameState::new(cfg.clone(), 1).unwrap();
        for _ in 0..100 {
            s.tick(TickInput {
                jump: false,
                steer: 5.0,
            });
        }
        assert_eq!(s.agent().position.x, cfg.lane_half_width);
    }

    #[test]
    fn contact_deals_damage() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        let id = place(&mut s, Vec3::new(0.0, 0.5, -0.5));
        s.tick(TickInput::idle());
        assert_eq!(s.health(), 90);
        assert!(s.events().contains(&RunnerEvent::Hit {
            id,
            damage: 10,
            health: 90
        }));
    }

    #[test]
    fn near_miss_deals_no_damage() {
        let mut s = GameState::new(RunnerConfig::default(), 1).unwrap();
        place(&mut s, Vec3::new(1.5, 0.5, -0.5));
        s.tick(TickInput::idle());
        assert_eq!(s.health(), 100);
    }

    #[test]
    fn jumping_clears_an_obstacle() {
        let cfg = head_on_config();
        let mut s = GameState::new(cfg, 1).unwrap();
        place(&mut s, Vec3::new(0.0, 0.5, -8.0));
        s.tick(TickInput::jump());
        for _ in 0..40 {
            s.tick(TickInput::idle());
        }
        assert_eq!(s.health(), 100);
    }

    #[test]
    fn health_clamps_at_zero_and_ends_run() {
        let cfg = RunnerConfig {
            damage_per_hit: 60,
            ..RunnerConfig::default()
        };
        let mut s = GameState::new(cfg, 1).unwrap();
        place(&mut s, Vec3::new(0.0, 0.5, -0.5));
        place(&mut s, Vec3::new(0.0, 0.5, -0.6));
        let outcome = s.tick(TickInput::idle());
        assert_eq!(s.health(), 0);
        assert!(s.is_game_over());
        assert!(matches!(outcome, TickOutcome::GameOver { .. }));
    }

    #[test]
    fn score_monotonic_then_frozen_after_game_over() {
        let mut s = GameState::new(head_on_config(), 5).unwrap();
        let mut last = 0;
        let mut ended = false;
        for _ in 0..10_000 {
            let outcome = s.tick(TickInput::idle());
            assert!(s.score() >= last);
            last = s.score();
            if matches!(outcome, TickOutcome::GameOver { .. }) {
                ended = true;
                break;
            }
        }
        assert!(ended, "head-on obstacles must end the run");
        let frozen = s.score();
        let frame = s.frame();
        assert_eq!(s.tick(TickInput::jump()), TickOutcome::Halted);
        assert_eq!(s.score(), frozen);
        assert_eq!(s.frame(), frame);
    }

    #[test]
    fn new_record_raises_high_score() {
        let mut s = GameState::with_high_score(head_on_config(), 5, 3).unwrap();
        let outcome = loop {
            match s.tick(TickInput::idle()) {
                TickOutcome::Running => continue,
                other => break other,
            }
        };
        let score = s.score();
        assert!(score > 3);
        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                score,
                high_score: score,
                new_record: true
            }
        );
        assert_eq!(s.high_score(), score);
    }

    #[test]
    fn high_score_never_lowered() {
        let mut s = GameState::with_high_score(head_on_config(), 5, 1_000_000).unwrap();
        while !s.is_game_over() {
            s.tick(TickInput::idle());
        }
        assert_eq!(s.high_score(), 1_000_000);
        assert!(s.events().iter().any(|e| matches!(
            e,
            RunnerEvent::GameOver {
                new_record: false,
                ..
            }
        )));
    }

    #[test]
    fn reset_after_game_over_resumes_simulation() {
        let mut s = GameState::new(head_on_config(), 5).unwrap();
        while !s.is_game_over() {
            s.tick(TickInput::idle());
        }
        let best = s.high_score();
        s.reset();
        assert_eq!(s.tick(TickInput::idle()), TickOutcome::Running);
        assert_eq!(s.score(), 1);
        assert_eq!(s.high_score(), best);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = GameState::new(RunnerConfig::default(), 42).unwrap();
        let mut b = GameState::new(RunnerConfig::default(), 42).unwrap();
        for i in 0..600 {
            let input = TickInput {
                jump: i % 45 == 0,
                steer: if i % 90 < 45 { 0.5 } else { -0.5 },
            };
            a.tick(input);
            b.tick(input);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn different_seeds_place_obstacles_differently() {
        let mut a = GameState::new(RunnerConfig::default(), 1).unwrap();
        let mut b = GameState::new(RunnerConfig::default(), 2).unwrap();
        for _ in 0..60 {
            a.tick(TickInput::idle());
            b.tick(TickInput::idle());
        }
        let xa = a.obstacles().next().unwrap().position.x;
        let xb = b.obstacles().next().unwrap().position.x;
        assert_ne!(xa, xb);
    }
}
