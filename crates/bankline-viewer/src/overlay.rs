//! Display canvas backed by an egui painter

use bankline_core::Color;
use bankline_render::Canvas;
use glam::Vec2;

/// Draws the editor's display pass as egui shapes.
///
/// Editor coordinates are physical window pixels; egui paints in points,
/// so every position and radius is divided by `pixels_per_point`.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    pixels_per_point: f32,
    color: Color,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, pixels_per_point: f32) -> Self {
        Self {
            painter,
            pixels_per_point: pixels_per_point.max(f32::EPSILON),
            color: Color::WHITE,
        }
    }

    fn pos(&self, pixel: Vec2) -> egui::Pos2 {
        egui::pos2(pixel.x / self.pixels_per_point, pixel.y / self.pixels_per_point)
    }
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

impl Canvas for EguiCanvas<'_> {
    fn set_draw_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_color(&self) -> Color {
        self.color
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            egui::Stroke::new(1.0, color32(self.color)),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        self.painter
            .circle_filled(self.pos(center), radius / self.pixels_per_point, color32(color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        self.painter.circle_stroke(
            self.pos(center),
            radius / self.pixels_per_point,
            egui::Stroke::new(1.0, color32(color)),
        );
    }

    /// Display frames are never read back
    fn read_pixel(&self, _x: i32, _y: i32) -> Option<Color> {
        None
    }
}
