//! Clip-space to screen mapping, unprojection, and near-plane clipping.
//!
//! The screen mapping scales NDC by the full viewport size around its
//! centre, so NDC ±0.5 spans the window. `unproject` applies the matching
//! inverse, which keeps picking rays and drawn geometry in agreement.

use crate::{FlyCamera, Viewport};
use glam::{Vec2, Vec3, Vec4};

const W_EPSILON: f32 = 1e-8;

/// Perspective-divide x and y and map them to pixels. z and w pass through.
pub fn project_to_screen(clip: Vec4, viewport: Viewport) -> Vec4 {
    let d = 1.0 / clip.w;
    Vec4::new(
        clip.x * d * viewport.width + viewport.width / 2.0,
        clip.y * d * viewport.height + viewport.height / 2.0,
        clip.z,
        clip.w,
    )
}

/// Project a world point straight to screen space.
pub fn world_to_screen(camera: &FlyCamera, point: Vec3) -> Vec4 {
    project_to_screen(camera.clip(point), camera.viewport())
}

/// Map a normalized `[0, 1]²` screen position to the world point it sees on
/// the far plane. `None` if the inverse transform degenerates.
pub fn unproject(camera: &FlyCamera, normalized: Vec2) -> Option<Vec3> {
    let ndc = (normalized * 2.0 - Vec2::ONE) * 0.5;
    let world = camera.inverse_projection_view() * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    if world.w.abs() < W_EPSILON || !world.is_finite() {
        return None;
    }
    Some(world.truncate() / world.w)
}

/// Pixel position to normalized `[0, 1]²` screen position.
pub fn normalize_screen(pixel: Vec2, viewport: Viewport) -> Vec2 {
    pixel / viewport.size().max(Vec2::ONE)
}

/// Signed distance of a clip-space point to the near plane; negative is behind.
pub fn near_plane_distance(clip: Vec4, near: f32) -> f32 {
    clip.z + near
}

/// Clip a clip-space segment against the near plane.
///
/// Returns `None` when both ends are behind it. An end that is in front is
/// returned unchanged; an end behind is moved onto the plane.
pub fn clip_line_to_near(p0: Vec4, p1: Vec4, near: f32) -> Option<(Vec4, Vec4)> {
    let d0 = near_plane_distance(p0, near);
    let d1 = near_plane_distance(p1, near);

    if d0 < 0.0 && d1 < 0.0 {
        return None;
    }

    if d0 < 0.0 {
        Some((clip_to_plane(p0, p1, d0, d1)?, p1))
    } else if d1 < 0.0 {
        Some((p0, clip_to_plane(p1, p0, d1, d0)?))
    } else {
        Some((p0, p1))
    }
}

fn clip_to_plane(behind: Vec4, front: Vec4, d_behind: f32, d_front: f32) -> Option<Vec4> {
    let denom = d_behind - d_front;
    if denom.abs() < f32::EPSILON {
        return None;
    }
    Some(behind.lerp(front, d_behind / denom))
}
