//! World-space drawing helpers on top of a [`Canvas`]

use crate::projection::{clip_line_to_near, project_to_screen, world_to_screen};
use crate::{Canvas, FlyCamera};
use glam::{Vec2, Vec3};

/// Smallest on-screen marker radius in pixels
pub const MIN_MARKER_RADIUS: f32 = 3.0;

/// Screen centre of a marker at `point` and its depth-scaled radius
/// `size / w`, or `None` when the point is at or behind the near plane.
pub fn project_marker(camera: &FlyCamera, point: Vec3, size: f32) -> Option<(Vec2, f32)> {
    let screen = world_to_screen(camera, point);
    if screen.z <= -camera.near || screen.w <= 0.0 {
        return None;
    }
    Some((Vec2::new(screen.x, screen.y), size / screen.w))
}

/// Draw a marker disc for a world point in the current draw color.
///
/// The radius shrinks with depth but never below [`MIN_MARKER_RADIUS`].
pub fn draw_point_3d(canvas: &mut impl Canvas, camera: &FlyCamera, point: Vec3, size: f32) {
    let Some((centre, radius)) = project_marker(camera, point, size) else {
        return;
    };
    let color = canvas.draw_color();
    canvas.fill_circle(centre, radius.max(MIN_MARKER_RADIUS), color);
}

/// Draw a world-space line, clipped against the near plane.
pub fn draw_line_3d(canvas: &mut impl Canvas, camera: &FlyCamera, from: Vec3, to: Vec3) {
    let Some((a, b)) = clip_line_to_near(camera.clip(from), camera.clip(to), camera.near) else {
        return;
    };
    let viewport = camera.viewport();
    let a = project_to_screen(a, viewport);
    let b = project_to_screen(b, viewport);
    canvas.draw_line(Vec2::new(a.x, a.y), Vec2::new(b.x, b.y));
}
