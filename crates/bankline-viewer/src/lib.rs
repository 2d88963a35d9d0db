//! Bankline Viewer - interactive track editor
//!
//! Hosts the editor in a winit window with an egui side panel. The
//! `TrackEditor` owns the spline, camera and interaction mode; the app
//! feeds it one `InputState` per frame and draws its display pass through
//! an egui painter.

pub mod app;
pub mod config;
pub mod input;
mod overlay;
pub mod panels;
pub mod picking;
pub mod track_editor;

pub use config::EditorConfig;
pub use input::{EditorKey, InputState};
pub use picking::{PickCategory, PickTarget};
pub use track_editor::{EditorMode, TrackEditor};
