//! Interactive track editor state machine and display pass.
//!
//! The editor is ticked once per frame with a fresh [`InputState`]. Each
//! tick steers the camera, rebuilds its matrices for the current viewport,
//! then runs the transition function of the current [`EditorMode`]. Drawing
//! is a separate pass over any [`Canvas`], so the same editor renders into
//! the window overlay and into test buffers.

use crate::config::{EditorConfig, MAX_GRID_EXTENT};
use crate::input::{EditorKey, InputState};
use crate::picking::{self, PickCategory, PickTarget};
use bankline_core::{sample_ribbon, track_file, BanklineError, Color, Result, Spline};
use bankline_render::draw::{draw_line_3d, draw_point_3d, project_marker};
use bankline_render::plane::raycast;
use bankline_render::{Canvas, FlyCamera, FlyDirection, PickBuffer, Plane, Viewport};
use glam::Vec3;
use std::path::{Path, PathBuf};

/// What the pointer is doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorMode {
    Idle,
    /// Camera steers with the pointer while the free-look key is held
    FreeLook,
    /// Place key held; `preview` is the ground point under the cursor
    PlacingPoint { preview: Option<Vec3> },
    /// A marker grabbed on button press follows the cursor
    DraggingHandle { target: PickTarget },
}

impl EditorMode {
    pub fn label(&self) -> &'static str {
        match self {
            EditorMode::Idle => "Idle",
            EditorMode::FreeLook => "Free look",
            EditorMode::PlacingPoint { .. } => "Placing point",
            EditorMode::DraggingHandle { target } => match target.category {
                PickCategory::Point => "Dragging point",
                PickCategory::Control => "Dragging tangent",
                PickCategory::Normal => "Dragging bank",
            },
        }
    }
}

const FLY_KEYS: [(EditorKey, FlyDirection); 4] = [
    (EditorKey::Forward, FlyDirection::Forward),
    (EditorKey::Back, FlyDirection::Back),
    (EditorKey::Left, FlyDirection::Left),
    (EditorKey::Right, FlyDirection::Right),
];

/// Owns the track being edited and everything needed to interact with it
pub struct TrackEditor {
    spline: Spline,
    camera: FlyCamera,
    mode: EditorMode,
    pick_buffer: PickBuffer,
    config: EditorConfig,
    track_path: Option<PathBuf>,
    modified: bool,
}

impl TrackEditor {
    /// An empty track with no file behind it
    pub fn new(config: EditorConfig) -> Self {
        Self::with_spline(config, Spline::new(), None)
    }

    pub fn with_spline(config: EditorConfig, spline: Spline, track_path: Option<PathBuf>) -> Self {
        let camera = config.build_camera();
        let viewport = camera.viewport();
        Self {
            spline,
            camera,
            mode: EditorMode::Idle,
            pick_buffer: PickBuffer::new(viewport.width as u32, viewport.height as u32),
            config,
            track_path,
            modified: false,
        }
    }

    /// Open a track file, or start an empty track that will be saved there
    pub fn open(config: EditorConfig, path: PathBuf) -> Result<Self> {
        let spline = if path.exists() {
            track_file::load(&path)?
        } else {
            log::info!("{} does not exist yet; starting an empty track", path.display());
            Spline::new()
        };
        Ok(Self::with_spline(config, spline, Some(path)))
    }

    pub fn spline(&self) -> &Spline {
        &self.spline
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn track_path(&self) -> Option<&Path> {
        self.track_path.as_deref()
    }

    /// Unsaved changes since load or the last save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The host should grab and hide the cursor
    pub fn wants_cursor_grab(&self) -> bool {
        matches!(self.mode, EditorMode::FreeLook)
    }

    /// Write the track to its file
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.track_path.clone().ok_or_else(|| {
            BanklineError::InvalidParameter("track has no file to save to".into())
        })?;
        track_file::save(&path, &self.spline)?;
        self.modified = false;
        Ok(path)
    }

    /// Advance one frame.
    pub fn tick(&mut self, input: &InputState, viewport: Viewport) {
        if self.mode == EditorMode::FreeLook {
            let delta = input.look_delta();
            let sensitivity = self.config.camera.look_sensitivity;
            self.camera.look(
                delta.x * sensitivity / viewport.width.max(1.0),
                delta.y * sensitivity / viewport.height.max(1.0),
            );
        }
        self.fly(input);
        self.camera.rebuild(viewport);
        self.pick_buffer
            .resize(viewport.width.max(1.0) as u32, viewport.height.max(1.0) as u32);

        let mode = self.mode;
        self.mode = match mode {
            EditorMode::Idle => self.tick_idle(input),
            EditorMode::FreeLook => self.tick_free_look(input),
            EditorMode::PlacingPoint { .. } => self.tick_placing(input),
            EditorMode::DraggingHandle { target } => self.tick_dragging(input, target),
        };
    }

    fn fly(&mut self, input: &InputState) {
        let speed = if input.is_key_down(EditorKey::SlowMove) {
            self.config.camera.speed_slow
        } else {
            self.config.camera.speed_fast
        };
        for (key, direction) in FLY_KEYS {
            if input.is_key_down(key) {
                self.camera.fly(direction, speed);
            }
        }
    }

    fn tick_idle(&mut self, input: &InputState) -> EditorMode {
        if input.is_key_down(EditorKey::Place) {
            return EditorMode::PlacingPoint { preview: None };
        }
        if input.is_key_down(EditorKey::FreeLook) {
            return EditorMode::FreeLook;
        }
        if input.main_pressed() {
            let hit = picking::pick(
                &mut self.pick_buffer,
                &self.spline,
                &self.camera,
                input.pointer(),
                self.config.display.point_size,
                self.config.track.normal_handle_length,
            );
            if let Some(target) = hit {
                log::debug!("Grabbed {:?} handle of point {}", target.category, target.index);
                return EditorMode::DraggingHandle { target };
            }
        }
        EditorMode::Idle
    }

    fn tick_free_look(&self, input: &InputState) -> EditorMode {
        if input.is_key_down(EditorKey::FreeLook) {
            EditorMode::FreeLook
        } else {
            EditorMode::Idle
        }
    }

    fn tick_placing(&mut self, input: &InputState) -> EditorMode {
        if !input.is_key_down(EditorKey::Place) {
            return EditorMode::Idle;
        }

        let hit = raycast(&self.camera, &Plane::ground(), input.pointer());
        if input.main_released() {
            if let Some(position) = hit {
                self.spline.insert_point(position);
                self.modified = true;
            }
            return EditorMode::Idle;
        }
        EditorMode::PlacingPoint { preview: hit }
    }

    fn tick_dragging(&mut self, input: &InputState, target: PickTarget) -> EditorMode {
        if !input.main_down() {
            log::debug!("Released {:?} handle of point {}", target.category, target.index);
            return EditorMode::Idle;
        }

        let face_camera = input.is_key_down(EditorKey::FaceCamera);
        let Some(plane) = self.drag_plane(target, face_camera) else {
            return EditorMode::Idle;
        };
        let Some(hit) = raycast(&self.camera, &plane, input.pointer()) else {
            return EditorMode::DraggingHandle { target };
        };

        let moved = match target.category {
            PickCategory::Point => self.spline.move_point(target.index, hit),
            PickCategory::Control => self.spline.move_control(target.index, hit),
            PickCategory::Normal => self.spline.move_normal(target.index, hit),
        };
        match moved {
            Ok(()) => {
                self.modified = true;
                EditorMode::DraggingHandle { target }
            }
            Err(e) => {
                log::warn!("Drag aborted: {}", e);
                EditorMode::Idle
            }
        }
    }

    /// Plane the grabbed marker slides on. `None` if the point is gone.
    fn drag_plane(&self, target: PickTarget, face_camera: bool) -> Option<Plane> {
        let point = *self.spline.points().get(target.index)?;
        let control = *self.spline.controls().get(target.index)?;
        let eye = self.camera.position;

        let plane = match target.category {
            PickCategory::Point | PickCategory::Control => {
                let through = if target.category == PickCategory::Control {
                    point + control
                } else {
                    point
                };
                let normal = if face_camera {
                    let mut toward = eye - through;
                    toward.y = 0.0;
                    toward.normalize_or_zero()
                } else {
                    Vec3::Y
                };
                Plane::new(normal, through)
            }
            PickCategory::Normal => {
                let mut normal = control.normalize_or_zero();
                if (eye - point).dot(normal) < 0.0 {
                    normal = -normal;
                }
                Plane::new(normal, point)
            }
        };
        Some(plane)
    }

    // --- Display pass ---

    /// Draw the grid, ribbon, markers and placement preview.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.draw_grid(canvas);
        self.draw_ribbon(canvas);
        self.draw_markers(canvas);
        self.draw_preview(canvas);
    }

    fn draw_grid(&self, canvas: &mut impl Canvas) {
        let extent = self.config.display.grid_extent.clamp(0, MAX_GRID_EXTENT);
        let scale = self.config.display.grid_scale;
        let edge = extent as f32 * scale;

        canvas.set_draw_color(Color::GRAY);
        for i in -extent..=extent {
            let v = i as f32 * scale;
            draw_line_3d(canvas, &self.camera, Vec3::new(v, 0.0, -edge), Vec3::new(v, 0.0, edge));
            draw_line_3d(canvas, &self.camera, Vec3::new(-edge, 0.0, v), Vec3::new(edge, 0.0, v));
        }
    }

    fn draw_ribbon(&self, canvas: &mut impl Canvas) {
        let track = &self.config.track;
        let slices = match sample_ribbon(&self.spline, track.ribbon_spacing, track.ribbon_half_width) {
            Ok(slices) => slices,
            Err(e) => {
                log::trace!("No ribbon: {}", e);
                return;
            }
        };
        let ground = |v: Vec3| Vec3::new(v.x, 0.0, v.z);

        canvas.set_draw_color(Color::WHITE);
        for (i, slice) in slices.iter().enumerate() {
            draw_line_3d(canvas, &self.camera, slice.left, slice.right);
            draw_line_3d(canvas, &self.camera, slice.left, ground(slice.left));
            draw_line_3d(canvas, &self.camera, slice.right, ground(slice.right));

            if i > 0 {
                let prev = &slices[i - 1];
                draw_line_3d(canvas, &self.camera, prev.left, slice.left);
                draw_line_3d(canvas, &self.camera, prev.right, slice.right);
            }
        }

        if let (Some(first), Some(last)) = (slices.first(), slices.last()) {
            if slices.len() > 1 {
                draw_line_3d(canvas, &self.camera, last.left, first.left);
                draw_line_3d(canvas, &self.camera, last.right, first.right);
            }
        }
    }

    fn draw_markers(&self, canvas: &mut impl Canvas) {
        let size = self.config.display.point_size;
        let normal_length = self.config.track.normal_handle_length;
        let points = self.spline.points();

        canvas.set_draw_color(Color::GREEN);
        for &p in points {
            draw_point_3d(canvas, &self.camera, p, size);
        }

        canvas.set_draw_color(Color::BLUE);
        for (&p, &c) in points.iter().zip(self.spline.controls()) {
            draw_point_3d(canvas, &self.camera, p + c, size);
            draw_line_3d(canvas, &self.camera, p + c, p - c);
        }

        canvas.set_draw_color(Color::RED);
        for (&p, &n) in points.iter().zip(self.spline.normals()) {
            let handle = p + n.normalize_or_zero() * normal_length;
            draw_point_3d(canvas, &self.camera, handle, size);
            draw_line_3d(canvas, &self.camera, p, handle);
        }
    }

    fn draw_preview(&self, canvas: &mut impl Canvas) {
        let EditorMode::PlacingPoint { preview: Some(p) } = self.mode else {
            return;
        };
        if let Some((centre, radius)) = project_marker(&self.camera, p, self.config.display.point_size) {
            canvas.stroke_circle(centre, radius, Color::RED);
        }
    }
}
