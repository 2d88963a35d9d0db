//! Bankline Core - Track model for the Bankline editor
//!
//! This crate provides the types every other Bankline crate depends on:
//! - `Spline` - Closed-loop cubic Bezier track with banking normals
//! - `RibbonSlice` - Cross-sections of the track ribbon sampled by arc length
//! - `track_file` - Count-prefixed binary track format
//! - `Color` - 8-bit RGBA draw color
//! - Error types and Result alias

mod error;
pub mod ribbon;
mod spline;
pub mod track_file;
mod types;

pub use error::{BanklineError, Result};
pub use ribbon::{sample_ribbon, RibbonSlice};
pub use spline::{Spline, SEGMENT_SAMPLES};
pub use types::Color;

pub use glam::{Mat4, Vec2, Vec3, Vec4};
