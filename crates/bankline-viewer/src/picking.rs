//! Color-coded marker picking.
//!
//! Each pickable marker is drawn into the pick buffer as a disc whose color
//! encodes what it is: red holds the category, green and blue hold the
//! point index plus one. Reading the pixel under the cursor and decoding it
//! yields the marker on top, or nothing for the cleared background.

use bankline_core::{Color, Spline};
use bankline_render::draw::draw_point_3d;
use bankline_render::{Canvas, FlyCamera, PickBuffer};
use glam::Vec2;

/// Color the pick buffer is cleared to; decodes as "nothing"
pub const BACKGROUND: Color = Color::new(0, 0, 0, 0);

/// Kind of marker under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickCategory {
    Point = 1,
    /// Tangent handle at `point + control`
    Control = 2,
    /// Bank handle at `point + normal * length`
    Normal = 3,
}

impl PickCategory {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(PickCategory::Point),
            2 => Some(PickCategory::Control),
            3 => Some(PickCategory::Normal),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A marker picked on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickTarget {
    pub index: usize,
    pub category: PickCategory,
}

impl PickTarget {
    pub fn new(index: usize, category: PickCategory) -> Self {
        Self { index, category }
    }
}

/// Pick color for a marker. Ids wrap past 16 bits.
pub fn encode(target: PickTarget) -> Color {
    let id = target.index.wrapping_add(1);
    Color::new(
        target.category.as_u8(),
        ((id >> 8) & 0xff) as u8,
        (id & 0xff) as u8,
        255,
    )
}

/// Marker for a pick color, `None` for background or unknown categories
pub fn decode(color: Color) -> Option<PickTarget> {
    let category = PickCategory::from_u8(color.r)?;
    let id = ((color.g as usize) << 8) + color.b as usize;
    if id == 0 {
        return None;
    }
    Some(PickTarget::new(id - 1, category))
}

/// Draw every marker in pick colors: points, then tangent handles, then
/// bank handles. Later markers cover earlier ones.
pub fn render_pick_pass(
    canvas: &mut impl Canvas,
    spline: &Spline,
    camera: &FlyCamera,
    point_size: f32,
    normal_length: f32,
) {
    for (i, &p) in spline.points().iter().enumerate() {
        canvas.set_draw_color(encode(PickTarget::new(i, PickCategory::Point)));
        draw_point_3d(canvas, camera, p, point_size);
    }

    for (i, (&p, &c)) in spline.points().iter().zip(spline.controls()).enumerate() {
        canvas.set_draw_color(encode(PickTarget::new(i, PickCategory::Control)));
        draw_point_3d(canvas, camera, p + c, point_size);
    }

    for (i, (&p, &n)) in spline.points().iter().zip(spline.normals()).enumerate() {
        canvas.set_draw_color(encode(PickTarget::new(i, PickCategory::Normal)));
        draw_point_3d(canvas, camera, p + n.normalize_or_zero() * normal_length, point_size);
    }
}

/// Render the pick pass into `buffer` and decode the pixel under `pointer`.
pub fn pick(
    buffer: &mut PickBuffer,
    spline: &Spline,
    camera: &FlyCamera,
    pointer: Vec2,
    point_size: f32,
    normal_length: f32,
) -> Option<PickTarget> {
    buffer.clear(BACKGROUND);
    render_pick_pass(buffer, spline, camera, point_size, normal_length);
    buffer
        .read_pixel(pointer.x as i32, pointer.y as i32)
        .and_then(decode)
}
