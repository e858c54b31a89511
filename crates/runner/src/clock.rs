/// Fixed-timestep accumulator between the display refresh and the simulation.
///
/// Each frame hands in the wall-clock delta; the clock answers how many whole
/// ticks to simulate. Catch-up is capped so a long stall (a suspended
/// terminal, a debugger) does not replay seconds of game in one frame.
#[derive(Debug, Clone)]
pub struct FixedStep {
    tick_seconds: f64,
    accumulator: f64,
    max_steps: u32,
}

impl FixedStep {
    pub fn new(tick_hz: f64, max_steps: u32) -> Self {
        Self {
            tick_seconds: 1.0 / tick_hz,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Feed `dt` seconds and return the number of ticks due this frame.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.tick_seconds {
            self.accumulator -= self.tick_seconds;
            steps += 1;
            if steps == self.max_steps {
                // Drop whole ticks still owed; keep the fractional part.
                self.accumulator %= self.tick_seconds;
                break;
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ticks_are_emitted() {
        let mut clock = FixedStep::new(60.0, 5);
        assert_eq!(clock.advance(1.0 / 60.0 + 1e-9), 1);
        assert_eq!(clock.advance(0.5 / 60.0), 0);
        assert_eq!(clock.advance(0.6 / 60.0), 1);
    }

    #[test]
    fn remainder_carries_over() {
        let mut clock = FixedStep::new(10.0, 5);
        assert_eq!(clock.advance(0.25), 2);
        // The leftover half tick completes with the next half.
        assert_eq!(clock.advance(0.05 + 1e-9), 1);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = FixedStep::new(60.0, 5);
        assert_eq!(clock.advance(10.0), 5);
        // Backlog was dropped; the next short frame is not flooded.
        assert!(clock.advance(1.0 / 120.0) <= 1);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut clock = FixedStep::new(60.0, 5);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(1.0 / 60.0 + 1e-9), 1);
    }
}
