//! Bankline Render - view math and raster targets for the track editor
//!
//! This crate turns the editor's 3D scene into 2D draw calls: a yaw/pitch
//! fly camera, clip-space projection with near-plane clipping, plane ray
//! casts for dragging, and the `Canvas` trait both the on-screen overlay
//! and the CPU pick buffer implement. It also owns the wgpu surface the
//! editor window presents through.

mod camera;
pub mod canvas;
mod context;
pub mod draw;
mod pick_buffer;
pub mod plane;
pub mod projection;

pub use camera::{FlyCamera, FlyDirection, Viewport};
pub use canvas::Canvas;
pub use context::{RenderContext, RenderError};
pub use pick_buffer::PickBuffer;
pub use plane::Plane;
