use crate::renderer::Renderer;
use crate::scene::{ObjectKind, Scene};
use crate::stereo::EyePass;
use blockrun_common::PerspectiveCamera;

/// Top-down character-cell renderer for terminals.
///
/// Orthographic: lateral `x` maps to columns and depth `z` to rows (far at
/// the top). The perspective camera is ignored. The pass viewport decides the
/// pane size, and an eye's view offset slides the lateral window the same
/// fraction of its width that the offset slides the frustum.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    /// Pixels per character column.
    pub cell_width: f32,
    /// Pixels per character row.
    pub cell_height: f32,
    /// Lateral extent shown, `(min, max)`.
    pub x_range: (f32, f32),
    /// Depth extent shown, `(far, near)`.
    pub z_range: (f32, f32),
    /// Objects higher than this draw as airborne.
    pub air_threshold: f32,
}

impl AsciiRenderer {
    pub fn new(x_range: (f32, f32), z_range: (f32, f32)) -> Self {
        Self {
            cell_width: 1.0,
            cell_height: 1.0,
            x_range,
            z_range,
            air_threshold: 1.0,
        }
    }

    fn lateral_window(&self, pass: &EyePass) -> (f32, f32) {
        let (x0, x1) = self.x_range;
        match pass.view_offset {
            Some(o) if o.full_width > 0.0 => {
                let shift = (x1 - x0) * o.x / o.full_width;
                (x0 + shift, x1 + shift)
            }
            _ => (x0, x1),
        }
    }

    fn glyph(&self, kind: &ObjectKind, y: f32) -> Option<char> {
        match kind {
            ObjectKind::Agent if y > self.air_threshold => Some('^'),
            ObjectKind::Agent => Some('A'),
            ObjectKind::Obstacle => Some('#'),
            ObjectKind::Block(k) => k.name().chars().next(),
            ObjectKind::Ground { .. } => None,
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = Vec<String>;

    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera, pass: &EyePass) -> Vec<String> {
        let cols = ((pass.viewport.width / self.cell_width).floor() as usize).max(3);
        let rows = ((pass.viewport.height / self.cell_height).floor() as usize).max(1);
        let mut grid = vec![vec![' '; cols]; rows];
        for row in &mut grid {
            row[0] = '|';
            row[cols - 1] = '|';
        }

        let inner = (cols - 2) as f32;
        let (x0, x1) = self.lateral_window(pass);
        let (far, near) = self.z_range;
        for (_, obj) in scene.iter() {
            let Some(ch) = self.glyph(&obj.kind, obj.position.y) else {
                continue;
            };
            let u = (obj.position.x - x0) / (x1 - x0);
            let v = (obj.position.z - far) / (near - far);
            if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                continue;
            }
            let col = 1 + ((u * (inner - 1.0)).round() as usize).min(cols - 3);
            let row = ((v * (rows as f32 - 1.0)).round() as usize).min(rows - 1);
            // The agent keeps its cell when an obstacle overlaps it.
            if grid[row][col] != 'A' && grid[row][col] != '^' {
                grid[row][col] = ch;
            }
        }

        grid.into_iter().map(|r| r.into_iter().collect()).collect()
    }
}

/// Place panes side by side, row by row, separated by `gap`.
pub fn stitch_panes(panes: &[Vec<String>], gap: &str) -> Vec<String> {
    let rows = panes.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|r| {
            panes
                .iter()
                .map(|p| p.get(r).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(gap)
        })
        .collect()
}
