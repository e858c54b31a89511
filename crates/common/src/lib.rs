//! Shared building blocks for the blockrun demos: pixel rectangles, the
//! perspective camera used by both demos, the deterministic spawn RNG and the
//! YAML-backed game configuration.

pub mod camera;
pub mod config;
pub mod rng;
pub mod types;

pub use camera::{PerspectiveCamera, Ray, ViewOffset, pixel_to_ndc};
pub use config::{ConfigError, DisplayConfig, GameConfig, RunnerConfig, SandboxConfig, ViewMode};
pub use rng::SeededRng;
pub use types::{Rect, WindowSize};

pub fn crate_info() -> &'static str {
    "blockrun-common v0.1.0"
}
