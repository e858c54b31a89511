use crate::scene::{ObjectKind, Scene};
use crate::stereo::{EyePass, frame_passes};
use blockrun_common::{PerspectiveCamera, ViewMode, WindowSize};
use std::fmt::Write as _;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and the camera (with the pass's view offset
/// already applied) and produces output for one pass.
pub trait Renderer {
    /// The output type produced by this renderer for one pass.
    type Output;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, pass: &EyePass) -> Self::Output;
}

/// Draw one frame: one pass in mono mode, left then right eye in stereo.
///
/// The camera's view offset is set per pass and cleared afterwards, so code
/// running between frames (picking, for one) sees the plain projection.
pub fn render_frame<R: Renderer>(
    renderer: &mut R,
    scene: &Scene,
    camera: &mut PerspectiveCamera,
    mode: ViewMode,
    window: WindowSize,
) -> Vec<R::Output> {
    let passes = frame_passes(mode, window);
    let mut outputs = Vec::with_capacity(passes.len());
    for pass in &passes {
        match pass.view_offset {
            Some(offset) => camera.set_view_offset(offset),
            None => camera.clear_view_offset(),
        }
        outputs.push(renderer.render(scene, camera, pass));
    }
    camera.clear_view_offset();
    outputs
}

/// Human-readable dump of what each pass would draw.
///
/// Objects are projected through the pass's camera; those landing inside clip
/// space are listed as visible.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, pass: &EyePass) -> String {
        let mut out = String::new();
        let v = pass.viewport;
        let _ = writeln!(
            out,
            "=== {:?} eye: viewport=({:.0}, {:.0}, {:.0}x{:.0}) scissor={} ===",
            pass.eye,
            v.x,
            v.y,
            v.width,
            v.height,
            if pass.scissor.is_some() { "on" } else { "off" }
        );
        let p = camera.position;
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.2}",
            p.x, p.y, p.z, camera.fov_degrees, camera.aspect
        );

        let view_proj = camera.view_projection();
        let mut visible = 0;
        for (id, obj) in scene.iter() {
            let clip = view_proj * obj.position.extend(1.0);
            let in_view = clip.w > 0.0 && {
                let ndc = clip.truncate() / clip.w;
                ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && ndc.z.abs() <= 1.0
            };
            // The ground is a plane, not a point; always report it.
            let shown = in_view || matches!(obj.kind, ObjectKind::Ground { .. });
            if shown {
                visible += 1;
            }
            let pos = obj.position;
            let _ = writeln!(
                out,
                "  [{:>4}] {:<8} pos=({:.2}, {:.2}, {:.2}){}",
                id.0,
                obj.kind.label(),
                pos.x,
                pos.y,
                pos.z,
                if shown { "" } else { " (culled)" }
            );
        }
        let _ = writeln!(out, "Objects: {} visible of {}", visible, scene.len());
        out
    }
}
