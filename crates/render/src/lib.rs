//! Rendering adapter: a renderer-agnostic scene graph, the mono/stereo frame
//! step and two text renderers.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate game state.
//! - The stereo passes tile the window exactly: left half, then right half.
//! - The camera's view offset is cleared again once a frame is done.
//!
//! No GPU backend lives here. Anything implementing [`Renderer`] can be
//! driven by [`render_frame`].

mod ascii;
mod renderer;
pub mod scene;
pub mod stereo;

pub use ascii::{AsciiRenderer, stitch_panes};
pub use renderer::{DebugTextRenderer, Renderer, render_frame};
pub use scene::{ObjectId, ObjectKind, RunnerScene, Scene, SceneObject};
pub use stereo::{Eye, EyePass, frame_passes};

pub fn crate_info() -> &'static str {
    "blockrun-render v0.1.0"
}
