//! egui side panel showing the edited track and the editor controls.

use crate::track_editor::TrackEditor;

/// Actions returned by the panel that the app must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPanelAction {
    Save,
}

/// Draw the track panel. Returns a list of actions to process.
pub fn track_panel(ui: &mut egui::Ui, editor: &TrackEditor) -> Vec<TrackPanelAction> {
    let mut actions = Vec::new();
    let spline = editor.spline();

    ui.heading("Track Editor");
    ui.separator();

    // Track info
    match editor.track_path() {
        Some(path) => ui.label(format!("File: {}", path.display())),
        None => ui.label("File: (none)"),
    };
    ui.label(format!("Points: {}", spline.len()));
    ui.label(format!("Length: {:.2}", spline.total_length()));
    ui.label(format!("Mode: {}", editor.mode().label()));

    let camera = editor.camera();
    ui.label(format!(
        "Camera: ({:.2}, {:.2}, {:.2})",
        camera.position.x, camera.position.y, camera.position.z
    ));

    if !spline.is_empty() {
        ui.collapsing("Segments", |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                for (i, length) in spline.lengths().iter().enumerate() {
                    ui.label(format!("{} \u{2192} {}: {:.3}", i, (i + 1) % spline.len(), length));
                }
            });
        });
    }

    ui.separator();

    // Actions
    let can_save = editor.track_path().is_some();
    if ui
        .add_enabled(can_save, egui::Button::new("Save (Ctrl+S)"))
        .clicked()
    {
        actions.push(TrackPanelAction::Save);
    }
    if !can_save {
        ui.label("Start with `bankline edit <TRACK>` to save.");
    }

    // Status
    if editor.is_modified() {
        ui.colored_label(egui::Color32::YELLOW, "Unsaved changes");
    }

    ui.separator();

    // Help
    ui.collapsing("Controls", |ui| {
        ui.label("Hold E + click: place point on the ground");
        ui.label("Left-drag marker: move point / tangent / bank");
        ui.label("Hold F while dragging: drag facing the camera");
        ui.label("Hold Space: free look");
        ui.label("W/A/S/D: fly");
        ui.label("Left Ctrl: fly slowly");
        ui.label("Ctrl+S: save");
    });

    actions
}
