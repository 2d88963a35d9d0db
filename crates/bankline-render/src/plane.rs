//! Planes and screen-ray casts used to drag points around.
//!
//! A pick ray is the segment from the camera to the far-plane point under
//! the cursor. It hits a plane only when it runs from the plane's front
//! side (the camera side) to its back side.

use crate::projection::{normalize_screen, unproject};
use crate::FlyCamera;
use glam::{Vec2, Vec3};

const DEGENERATE_EPSILON: f32 = 1e-12;

/// An infinite plane through `point` facing along `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self { normal, point }
    }

    /// The y = 0 plane, facing up
    pub fn ground() -> Self {
        Self::new(Vec3::Y, Vec3::ZERO)
    }

    /// Positive in front of the plane, negative behind it
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Intersect the segment `p0 → p1`, interpolating by signed distance.
    ///
    /// Misses when the far end is still in front, when the start is already
    /// behind, or when the plane normal or the distances degenerate.
    pub fn intersect_segment(&self, p0: Vec3, p1: Vec3) -> Option<Vec3> {
        if self.normal.length_squared() < DEGENERATE_EPSILON {
            return None;
        }

        let d0 = self.signed_distance(p0);
        let d1 = self.signed_distance(p1);
        if d1 > 0.0 || d0 < 0.0 {
            return None;
        }

        let denom = d0.abs() + d1.abs();
        if denom < f32::EPSILON {
            return None;
        }
        Some(p0.lerp(p1, d0 / denom))
    }
}

/// Cast the ray under a screen pixel against `plane`.
///
/// The ray stops at the far plane, so geometry further than `camera.far`
/// along the view cannot be hit even where the near-clipped grid still
/// draws it.
pub fn raycast(camera: &FlyCamera, plane: &Plane, screen: Vec2) -> Option<Vec3> {
    let normalized = normalize_screen(screen, camera.viewport());
    let far = unproject(camera, normalized)?;
    plane.intersect_segment(camera.position, far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::world_to_screen;
    use crate::Viewport;
    use approx::assert_abs_diff_eq;

    fn camera_looking_down() -> FlyCamera {
        let mut camera = FlyCamera::new();
        camera.position = Vec3::new(0.0, 5.0, -5.0);
        // Positive pitch tilts the view vector up, so the camera looks down.
        camera.pitch = (30.0f32).to_radians();
        camera.rebuild(Viewport::new(1280.0, 720.0));
        camera
    }

    #[test]
    fn segment_crossing_front_to_back_hits() {
        let plane = Plane::ground();
        let hit = plane
            .intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, -2.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(hit, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn far_end_in_front_misses() {
        let plane = Plane::ground();
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(5.0, 1.0, 0.0))
            .is_none());
    }

    #[test]
    fn parallel_segment_misses() {
        let plane = Plane::ground();
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(9.0, 1.0, 0.0))
            .is_none());
        assert!(plane
            .intersect_segment(Vec3::new(0.0, -1.0, 0.0), Vec3::new(9.0, -1.0, 0.0))
            .is_none());
        assert!(plane.intersect_segment(Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn start_behind_plane_misses() {
        let plane = Plane::ground();
        assert!(plane
            .intersect_segment(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, -3.0, 0.0))
            .is_none());
    }

    #[test]
    fn degenerate_normal_misses() {
        let plane = Plane::new(Vec3::ZERO, Vec3::ZERO);
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -2.0, 0.0))
            .is_none());
    }

    #[test]
    fn raycast_reaches_only_as_far_as_the_far_plane() {
        let target = Vec3::new(0.0, 0.0, 10.0);
        for (far, expect_hit) in [(100.0, true), (5.0, false)] {
            let mut camera = FlyCamera::new();
            camera.far = far;
            camera.rebuild(Viewport::new(640.0, 480.0));

            let screen = world_to_screen(&camera, target);
            let hit = raycast(&camera, &Plane::ground(), Vec2::new(screen.x, screen.y));
            assert_eq!(hit.is_some(), expect_hit, "far = {}", far);
            if let Some(hit) = hit {
                assert_abs_diff_eq!(hit, target, epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn raycast_finds_ground_point_under_cursor() {
        let camera = camera_looking_down();
        let target = Vec3::new(1.0, 0.0, 3.0);
        let screen = world_to_screen(&camera, target);

        let hit = raycast(&camera, &Plane::ground(), screen.truncate().truncate()).unwrap();
        assert_abs_diff_eq!(hit, target, epsilon = 1e-2);
    }

    #[test]
    fn raycast_above_horizon_misses_ground() {
        let mut camera = FlyCamera::new();
        camera.pitch = (-20.0f32).to_radians();
        camera.rebuild(Viewport::new(1280.0, 720.0));

        // Screen centre looks upward, away from the ground.
        let centre = Vec2::new(640.0, 360.0);
        assert!(raycast(&camera, &Plane::ground(), centre).is_none());
    }
}
