//! GUI panels for the editor

pub mod track_panel;

pub use track_panel::TrackPanelAction;
