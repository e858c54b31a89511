use blockrun_common::{Rect, ViewMode, ViewOffset, WindowSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    /// Single full-window view.
    Center,
    Left,
    Right,
}

/// One render pass of a frame: where to draw and which part of the camera
/// frustum to show there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePass {
    pub eye: Eye,
    pub viewport: Rect,
    /// `Some` when the scissor test is enabled for this pass.
    pub scissor: Option<Rect>,
    pub view_offset: Option<ViewOffset>,
}

/// Passes making up one frame in `mode`.
///
/// Stereo splits the window into two side-by-side halves. Each eye keeps the
/// full-window frustum size and shifts its view offset by the eye's
/// horizontal origin, so the right eye sees the frustum moved right by half
/// the window.
pub fn frame_passes(mode: ViewMode, window: WindowSize) -> Vec<EyePass> {
    let w = window.width as f32;
    let h = window.height as f32;
    match mode {
        ViewMode::Mono => vec![EyePass {
            eye: Eye::Center,
            viewport: window.full_rect(),
            scissor: None,
            view_offset: None,
        }],
        ViewMode::Stereo => {
            let half = w / 2.0;
            [(Eye::Left, 0.0), (Eye::Right, half)]
                .into_iter()
                .map(|(eye, x)| {
                    let rect = Rect::new(x, 0.0, half, h);
                    EyePass {
                        eye,
                        viewport: rect,
                        scissor: Some(rect),
                        view_offset: Some(ViewOffset {
                            full_width: w,
                            full_height: h,
                            x,
                            y: 0.0,
                            width: w,
                            height: h,
                        }),
                    }
                })
                .collect()
        }
    }
}
