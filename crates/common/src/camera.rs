use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Sub-window of a larger virtual frustum, as used for multi-viewport setups.
///
/// `full_*` is the size of the whole virtual image; `x`, `y`, `width` and
/// `height` select the part this camera renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOffset {
    pub full_width: f32,
    pub full_height: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera shared by the runner and the sandbox.
///
/// Rotation is an XYZ Euler triple in radians. The projection uses OpenGL
/// clip conventions (`z` in `[-1, 1]`), right-handed, looking down `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    view: Option<ViewOffset>,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_degrees,
            aspect,
            near,
            far,
            zoom: 1.0,
            view: None,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_view_offset(&mut self, offset: ViewOffset) {
        self.view = Some(offset);
    }

    pub fn clear_view_offset(&mut self) {
        self.view = None;
    }

    pub fn view_offset(&self) -> Option<ViewOffset> {
        self.view
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Camera-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Projection including the current view offset, if any.
    pub fn projection_matrix(&self) -> Mat4 {
        let (left, right, top, bottom) = self.frustum_bounds(self.view);
        frustum(left, right, top, bottom, self.near, self.far)
    }

    /// Projection of the whole frustum, ignoring any view offset.
    pub fn full_projection_matrix(&self) -> Mat4 {
        let (left, right, top, bottom) = self.frustum_bounds(None);
        frustum(left, right, top, bottom, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Near-plane bounds `(left, right, top, bottom)`.
    pub fn frustum_bounds(&self, view: Option<ViewOffset>) -> (f32, f32, f32, f32) {
        let mut top = self.near * (self.fov_degrees.to_radians() * 0.5).tan() / self.zoom;
        let mut height = 2.0 * top;
        let mut width = self.aspect * height;
        let mut left = -0.5 * width;

        if let Some(v) = view {
            left += v.x * width / v.full_width;
            top -= v.y * height / v.full_height;
            width *= v.width / v.full_width;
            height *= v.height / v.full_height;
        }

        (left, left + width, top, top - height)
    }

    /// Ray from the camera through a point in normalized device coordinates.
    ///
    /// Picking always uses the full frustum so the pointer maps onto the whole
    /// window regardless of which eye was drawn last.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.full_projection_matrix().inverse();
        let view_point = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let world_point = self.world_matrix().transform_point3(view_point);
        Ray::new(self.position, world_point - self.position)
    }
}

/// Pixel position to normalized device coordinates (`y` grows upward).
pub fn pixel_to_ndc(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((px / width) * 2.0 - 1.0, -(py / height) * 2.0 + 1.0)
}

fn frustum(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -2.0 * far * near / (far - near);
    Mat4::from_cols_array(&[
        x, 0.0, 0.0, 0.0, //
        0.0, y, 0.0, 0.0, //
        a, b, c, -1.0, //
        0.0, 0.0, d, 0.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_projection_is_finite() {
        let cam = PerspectiveCamera::default();
        let vp = cam.view_projection();
        assert!(vp.is_finite());
    }

    #[test]
    fn centre_ray_looks_down_negative_z() {
        let cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn yaw_rotates_the_pick_ray() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        cam.rotation.y = std::f32::consts::FRAC_PI_2;
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        // Turning left by 90 degrees looks down -X.
        assert_relative_eq!(ray.direction.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn top_right_corner_ray_points_up_and_right() {
        let cam = PerspectiveCamera::new(90.0, 1.0, 0.1, 1000.0);
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 1.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y > 0.0);
        // 90 degree fov: the corner lies at 45 degrees on each axis.
        assert_relative_eq!(ray.direction.x, ray.direction.y, epsilon = 1e-5);
        assert_relative_eq!(ray.direction.x, -ray.direction.z, epsilon = 1e-5);
    }

    #[test]
    fn full_view_offset_matches_plain_projection() {
        let mut cam = PerspectiveCamera::new(60.0, 2.0, 0.1, 100.0);
        let plain = cam.projection_matrix();
        cam.set_view_offset(ViewOffset {
            full_width: 800.0,
            full_height: 400.0,
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 400.0,
        });
        assert!(cam.projection_matrix().abs_diff_eq(plain, 1e-6));
    }

    #[test]
    fn horizontal_offset_shifts_the_frustum() {
        let mut cam = PerspectiveCamera::new(60.0, 2.0, 0.1, 100.0);
        let (l0, r0, _, _) = cam.frustum_bounds(None);
        cam.set_view_offset(ViewOffset {
            full_width: 800.0,
            full_height: 400.0,
            x: 400.0,
            y: 0.0,
            width: 800.0,
            height: 400.0,
        });
        let (l1, r1, _, _) = cam.frustum_bounds(cam.view_offset());
        let half = (r0 - l0) * 0.5;
        assert_relative_eq!(l1, l0 + half, epsilon = 1e-6);
        assert_relative_eq!(r1, r0 + half, epsilon = 1e-6);

        cam.clear_view_offset();
        assert!(cam.view_offset().is_none());
    }

    #[test]
    fn pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, 100.0, 50.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(100.0, 50.0, 100.0, 50.0), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_ndc(50.0, 25.0, 100.0, 50.0), Vec2::ZERO);
    }
}
