//! Free-fly editor camera

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Pitch limit in radians; keeps the look-at basis away from the up axis.
const PITCH_LIMIT: f32 = 1.56;

/// Pixel size of the surface the camera projects onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Width / height, guarded against a minimized window
    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Directional fly keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyDirection {
    Forward,
    Back,
    Left,
    Right,
}

/// A yaw/pitch camera that flies through the scene.
///
/// The camera looks along `-view_vector()`. Matrices are only valid for
/// the viewport passed to the last [`FlyCamera::rebuild`].
#[derive(Debug, Clone)]
pub struct FlyCamera {
    /// Camera position
    pub position: Vec3,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,

    viewport: Viewport,
    view: Mat4,
    projection: Mat4,
    projection_view: Mat4,
    inverse_projection_view: Mat4,
}

impl Default for FlyCamera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            yaw: (-90.0f32).to_radians(),
            pitch: 0.0,
            fov: 90.0,
            near: 0.1,
            far: 100.0,
            viewport: Viewport::default(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            projection_view: Mat4::IDENTITY,
            inverse_projection_view: Mat4::IDENTITY,
        };
        camera.rebuild(Viewport::default());
        camera
    }
}

impl FlyCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit vector pointing from the look target back to the camera
    pub fn view_vector(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
    }

    /// Direction the camera looks in
    pub fn forward(&self) -> Vec3 {
        -self.view_vector()
    }

    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Strafe axis, `up × view_vector`
    pub fn side(&self) -> Vec3 {
        self.up().cross(self.view_vector())
    }

    /// Turn by the given yaw/pitch deltas in radians
    pub fn look(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move `speed` world units along a fly direction
    pub fn fly(&mut self, direction: FlyDirection, speed: f32) {
        let offset = match direction {
            FlyDirection::Forward => self.forward(),
            FlyDirection::Back => -self.forward(),
            FlyDirection::Left => -self.side(),
            FlyDirection::Right => self.side(),
        };
        self.position += offset * speed;
    }

    /// Recompute view, projection and their product for this frame.
    ///
    /// The projection's vertical scale is negated so clip-space +Y points
    /// down the screen, matching pixel coordinates with a top-left origin.
    pub fn rebuild(&mut self, viewport: Viewport) {
        self.viewport = viewport;

        let mut projection = Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            viewport.aspect(),
            self.near,
            self.far,
        );
        projection.y_axis.y = -projection.y_axis.y;

        self.view = Mat4::look_at_rh(self.position, self.position + self.forward(), self.up());
        self.projection = projection;
        self.projection_view = projection * self.view;
        self.inverse_projection_view = self.projection_view.inverse();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn projection_view(&self) -> Mat4 {
        self.projection_view
    }

    pub fn inverse_projection_view(&self) -> Mat4 {
        self.inverse_projection_view
    }

    /// World point to homogeneous clip space
    pub fn clip(&self, point: Vec3) -> Vec4 {
        self.projection_view * point.extend(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn default_camera_looks_down_positive_z() {
        let camera = FlyCamera::new();
        assert_abs_diff_eq!(camera.forward(), Vec3::Z, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.side(), -Vec3::X, epsilon = 1e-6);
        assert_eq!(camera.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn fly_moves_along_basis() {
        let mut camera = FlyCamera::new();
        camera.fly(FlyDirection::Forward, 2.0);
        assert_abs_diff_eq!(camera.position, Vec3::new(0.0, 1.0, 2.0), epsilon = 1e-5);
        camera.fly(FlyDirection::Right, 1.0);
        assert_abs_diff_eq!(camera.position, Vec3::new(-1.0, 1.0, 2.0), epsilon = 1e-5);
        camera.fly(FlyDirection::Back, 2.0);
        camera.fly(FlyDirection::Left, 1.0);
        assert_abs_diff_eq!(camera.position, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn look_clamps_pitch() {
        let mut camera = FlyCamera::new();
        camera.look(0.5, 10.0);
        assert_relative_eq!(camera.pitch, PITCH_LIMIT);
        assert_relative_eq!(camera.yaw, (-90.0f32).to_radians() + 0.5);
    }

    #[test]
    fn point_ahead_projects_to_positive_w() {
        let camera = FlyCamera::new();
        let clip = camera.clip(Vec3::new(0.0, 1.0, 5.0));
        assert_relative_eq!(clip.w, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(clip.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn y_flip_puts_points_above_camera_at_negative_clip_y() {
        let camera = FlyCamera::new();
        let clip = camera.clip(Vec3::new(0.0, 2.0, 5.0));
        assert!(clip.y < 0.0);
    }

    #[test]
    fn inverse_round_trips() {
        let mut camera = FlyCamera::new();
        camera.rebuild(Viewport::new(800.0, 600.0));
        let product = camera.projection_view() * camera.inverse_projection_view();
        assert_abs_diff_eq!(product, Mat4::IDENTITY, epsilon = 1e-4);
        assert_eq!(camera.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn aspect_guards_zero_height() {
        assert_relative_eq!(Viewport::new(100.0, 0.0).aspect(), 100.0);
    }
}
