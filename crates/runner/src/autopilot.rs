use crate::state::GameState;
use crate::update::TickInput;

/// Scripted player for headless runs and demos.
///
/// Looks at the nearest obstacle still ahead of the agent. If it sits in the
/// agent's lane and is within `trigger_distance`, jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Depth gap at which a jump is started.
    pub trigger_distance: f32,
    /// Extra lateral clearance on top of the collision radius.
    pub lane_margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            trigger_distance: 8.0,
            lane_margin: 0.25,
        }
    }
}

impl Autopilot {
    pub fn decide(&self, state: &GameState) -> TickInput {
        let agent = state.agent();
        if agent.is_airborne() {
            return TickInput::idle();
        }
        let reach = state.config().collision_radius + self.lane_margin;
        let threat = state
            .obstacles()
            .filter(|o| o.position.z < agent.position.z)
            .filter(|o| (o.position.x - agent.position.x).abs() < reach)
            .map(|o| agent.position.z - o.position.z)
            .fold(f32::INFINITY, f32::min);

        if threat <= self.trigger_distance {
            TickInput::jump()
        } else {
            TickInput::idle()
        }
    }
}
