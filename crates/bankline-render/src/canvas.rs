//! 2D drawing surface the editor renders into

use bankline_core::Color;
use glam::Vec2;

/// Immediate-mode pixel-space drawing.
///
/// Lines use the current draw color; circles take their own. Implemented by
/// the on-screen overlay and by [`crate::PickBuffer`], which is the only
/// target that can read pixels back.
pub trait Canvas {
    fn set_draw_color(&mut self, color: Color);

    fn draw_color(&self) -> Color;

    fn draw_line(&mut self, from: Vec2, to: Vec2);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Color of a rendered pixel, if this target keeps its pixels
    fn read_pixel(&self, x: i32, y: i32) -> Option<Color>;
}
