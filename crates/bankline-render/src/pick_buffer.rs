//! CPU raster used as an off-screen id buffer for color picking.
//!
//! Marker discs are painted here with ids encoded in their colors, then the
//! single pixel under the cursor is read back. Later draws overwrite earlier
//! ones, so the last marker drawn at a pixel wins. Nothing drawn here ever
//! reaches the displayed frame.

use crate::Canvas;
use bankline_core::Color;
use glam::Vec2;

/// Fixed-size RGBA framebuffer
#[derive(Debug, Clone)]
pub struct PickBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    draw_color: Color,
}

impl PickBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::new(0, 0, 0, 0); width as usize * height as usize],
            draw_color: Color::WHITE,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize, discarding contents. No-op if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::new(0, 0, 0, 0); width as usize * height as usize];
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Fill `x0..=x1` on row `y`, clipped to the buffer
    fn span(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i32 - 1);
        for x in start..=end {
            self.put(x, y, color);
        }
    }

    /// Rows of a circle that can touch the buffer
    fn circle_rows(&self, cy: i32, r: i32) -> std::ops::RangeInclusive<i32> {
        let top = cy.saturating_sub(r).max(0);
        let bottom = cy.saturating_add(r).min(self.height as i32 - 1);
        top..=bottom
    }

    /// Clip a segment to the buffer rectangle (Liang-Barsky).
    fn clip_segment(&self, a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
        let max = Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0);
        let d = b - a;
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;

        let edges = [
            (-d.x, a.x),
            (d.x, max.x - a.x),
            (-d.y, a.y),
            (d.y, max.y - a.y),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((a + d * t0, a + d * t1))
    }
}

/// Half width of a circle of radius `r` at row offset `dy`
fn half_chord(r: i32, dy: i32) -> i32 {
    let r = r as i64;
    let dy = dy as i64;
    ((r * r - dy * dy).max(0) as f64).sqrt() as i32
}

impl Canvas for PickBuffer {
    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn draw_color(&self) -> Color {
        self.draw_color
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        if !from.is_finite() || !to.is_finite() || self.width == 0 || self.height == 0 {
            return;
        }
        let Some((a, b)) = self.clip_segment(from, to) else {
            return;
        };

        // Bresenham
        let color = self.draw_color;
        let (mut x, mut y) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let (cx, cy) = (center.x as i32, center.y as i32);
        let r = radius as i32;

        for y in self.circle_rows(cy, r) {
            let half = half_chord(r, y - cy);
            self.span(cx.saturating_sub(half), cx.saturating_add(half), y, color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let (cx, cy) = (center.x as i32, center.y as i32);
        let r = radius as i32;
        let inner = (r - 1).max(0);

        for y in self.circle_rows(cy, r) {
            let dy = y - cy;
            let outer_half = half_chord(r, dy);
            if dy.abs() >= inner {
                self.span(cx.saturating_sub(outer_half), cx.saturating_add(outer_half), y, color);
                continue;
            }
            let inner_half = half_chord(inner, dy);
            self.span(cx.saturating_sub(outer_half), cx.saturating_sub(inner_half), y, color);
            self.span(cx.saturating_add(inner_half), cx.saturating_add(outer_half), y, color);
        }
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).map(|i| self.pixels[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_circle_covers_centre_and_radius() {
        let mut buffer = PickBuffer::new(64, 64);
        buffer.fill_circle(Vec2::new(32.0, 32.0), 5.0, Color::RED);

        assert_eq!(buffer.read_pixel(32, 32), Some(Color::RED));
        assert_eq!(buffer.read_pixel(37, 32), Some(Color::RED));
        assert_eq!(buffer.read_pixel(32, 27), Some(Color::RED));
        assert_eq!(buffer.read_pixel(38, 32), Some(Color::new(0, 0, 0, 0)));
        assert_eq!(buffer.read_pixel(36, 36), Some(Color::new(0, 0, 0, 0)));
    }

    #[test]
    fn later_draws_win() {
        let mut buffer = PickBuffer::new(32, 32);
        buffer.fill_circle(Vec2::new(10.0, 10.0), 4.0, Color::GREEN);
        buffer.fill_circle(Vec2::new(12.0, 10.0), 4.0, Color::BLUE);

        assert_eq!(buffer.read_pixel(11, 10), Some(Color::BLUE));
        assert_eq!(buffer.read_pixel(7, 10), Some(Color::GREEN));
    }

    #[test]
    fn stroke_circle_leaves_centre_empty() {
        let mut buffer = PickBuffer::new(64, 64);
        buffer.stroke_circle(Vec2::new(32.0, 32.0), 10.0, Color::RED);

        assert_eq!(buffer.read_pixel(42, 32), Some(Color::RED));
        assert_eq!(buffer.read_pixel(32, 22), Some(Color::RED));
        assert_eq!(buffer.read_pixel(32, 32), Some(Color::new(0, 0, 0, 0)));
    }

    #[test]
    fn line_uses_draw_color() {
        let mut buffer = PickBuffer::new(16, 16);
        buffer.set_draw_color(Color::GRAY);
        buffer.draw_line(Vec2::new(0.0, 0.0), Vec2::new(15.0, 15.0));

        for i in 0..16 {
            assert_eq!(buffer.read_pixel(i, i), Some(Color::GRAY));
        }
        assert_eq!(buffer.draw_color(), Color::GRAY);
    }

    #[test]
    fn offscreen_geometry_is_clipped() {
        let mut buffer = PickBuffer::new(16, 16);
        buffer.set_draw_color(Color::WHITE);
        buffer.draw_line(Vec2::new(-1.0e6, 8.0), Vec2::new(1.0e6, 8.0));
        buffer.fill_circle(Vec2::new(8.0, 8.0), 1.0e6, Color::RED);
        buffer.draw_line(Vec2::new(-50.0, -50.0), Vec2::new(-10.0, -40.0));

        assert_eq!(buffer.read_pixel(0, 0), Some(Color::RED));
        assert_eq!(buffer.read_pixel(15, 15), Some(Color::RED));
    }

    #[test]
    fn read_outside_is_none() {
        let buffer = PickBuffer::new(8, 8);
        assert_eq!(buffer.read_pixel(-1, 0), None);
        assert_eq!(buffer.read_pixel(8, 0), None);
        assert_eq!(buffer.read_pixel(0, 8), None);
    }

    #[test]
    fn resize_and_clear() {
        let mut buffer = PickBuffer::new(8, 8);
        buffer.resize(20, 10);
        assert_eq!((buffer.width(), buffer.height()), (20, 10));
        buffer.clear(Color::BLACK);
        assert_eq!(buffer.read_pixel(19, 9), Some(Color::BLACK));
    }
}
