use blockrun_common::{ConfigError, RunnerConfig};
use blockrun_persist::ScoreStore;
use blockrun_render::RunnerScene;
use blockrun_runner::{GameState, RunnerEvent, TickInput, TickOutcome};

/// A runner game wired to its scene mirror and high-score slot.
///
/// Each step ticks the simulation, forwards the drained events to the scene
/// and persists a new record when a run ends.
pub struct RunnerSession {
    state: GameState,
    scene: RunnerScene,
    store: Box<dyn ScoreStore>,
}

impl RunnerSession {
    /// Start a session. An unreadable slot is logged and treated as zero; an
    /// invalid runner config is an error.
    pub fn new(
        config: RunnerConfig,
        seed: u64,
        store: Box<dyn ScoreStore>,
    ) -> Result<Self, ConfigError> {
        let high_score = store.load().unwrap_or_else(|err| {
            tracing::warn!(%err, "could not read high score, starting from 0");
            0
        });
        let state = GameState::with_high_score(config, seed, high_score)?;
        let scene = RunnerScene::new(&state);
        Ok(Self {
            state,
            scene,
            store,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scene(&self) -> &RunnerScene {
        &self.scene
    }

    pub fn step(&mut self, input: TickInput) -> TickOutcome {
        let outcome = self.state.tick(input);
        self.sync();
        outcome
    }

    pub fn restart(&mut self) {
        self.state.reset();
        self.sync();
    }

    fn sync(&mut self) {
        let events = self.state.drain_events();
        self.scene.apply(&events);
        self.scene.refresh(&self.state);

        for event in &events {
            if let RunnerEvent::GameOver {
                score,
                new_record: true,
                ..
            } = event
            {
                if let Err(err) = self.store.record(*score) {
                    tracing::warn!(%err, score, "could not save high score");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockrun_persist::{FileScoreStore, MemoryScoreStore, StoreError};

    fn head_on() -> RunnerConfig {
        RunnerConfig {
            lane_half_width: 0.0,
            ..RunnerConfig::default()
        }
    }

    fn play_out(session: &mut RunnerSession) -> TickOutcome {
        loop {
            match session.step(TickInput::idle()) {
                TickOutcome::Running => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn loads_persisted_high_score() {
        let session = RunnerSession::new(
            RunnerConfig::default(),
            1,
            Box::new(MemoryScoreStore::with_high_score(321)),
        )
        .unwrap();
        assert_eq!(session.state().high_score(), 321);
    }

    #[test]
    fn scene_follows_the_simulation() {
        let mut session = RunnerSession::new(head_on(), 1, Box::new(MemoryScoreStore::new())).unwrap();
        for _ in 0..200 {
            session.step(TickInput::idle());
        }
        assert_eq!(
            session.scene().obstacle_objects(),
            session.state().obstacle_count()
        );
        session.restart();
        assert_eq!(session.scene().obstacle_objects(), 0);
    }

    #[test]
    fn game_over_ends_in_terminal_outcome() {
        let mut session = RunnerSession::new(head_on(), 1, Box::new(MemoryScoreStore::new())).unwrap();
        let outcome = play_out(&mut session);
        assert!(matches!(outcome, TickOutcome::GameOver { new_record: true, .. }));
        assert_eq!(session.step(TickInput::idle()), TickOutcome::Halted);
        assert_eq!(session.state().high_score(), session.state().score());
    }

    #[test]
    fn new_record_is_written_to_the_slot() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileScoreStore::open(tmp.path()).unwrap();
        let mut session = RunnerSession::new(head_on(), 1, Box::new(store)).unwrap();
        play_out(&mut session);
        let score = session.state().score();
        assert!(score > 0);

        let reopened = FileScoreStore::open(tmp.path()).unwrap();
        assert_eq!(reopened.load().unwrap(), score);

        // A second, shorter run leaves the record alone.
        let mut again = RunnerSession::new(
            RunnerConfig {
                damage_per_hit: 100,
                ..head_on()
            },
            1,
            Box::new(reopened),
        )
        .unwrap();
        play_out(&mut again);
        assert!(again.state().score() < score);
        let check = FileScoreStore::open(tmp.path()).unwrap();
        assert_eq!(check.load().unwrap(), score);
    }

    /// Slot that always fails to read.
    struct Broken;

    impl ScoreStore for Broken {
        fn load(&self) -> Result<u64, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn record(&mut self, _: u64) -> Result<bool, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn rejects_a_config_without_a_spawn_schedule() {
        let config = RunnerConfig {
            spawn_interval_ticks: 0,
            ..RunnerConfig::default()
        };
        let err = RunnerSession::new(config, 1, Box::new(MemoryScoreStore::new()));
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn broken_store_does_not_stop_the_game() {
        let mut session = RunnerSession::new(head_on(), 1, Box::new(Broken)).unwrap();
        assert_eq!(session.state().high_score(), 0);
        assert!(matches!(play_out(&mut session), TickOutcome::GameOver { .. }));
    }
}
