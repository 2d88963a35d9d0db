//! Per-frame input snapshot consumed by the track editor

use glam::Vec2;
use std::collections::HashSet;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Logical editor keys.
///
/// Each key carries a stable numeric code so bindings and saved key maps
/// stay independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKey {
    /// Fly at the slow speed while held
    SlowMove,
    Forward,
    Back,
    Left,
    Right,
    /// Hold to steer the camera with the pointer
    FreeLook,
    /// Hold to place a new point on the ground
    Place,
    /// Drag tangent handles and points on a camera-facing plane
    FaceCamera,
}

impl EditorKey {
    pub const ALL: [EditorKey; 8] = [
        EditorKey::SlowMove,
        EditorKey::Forward,
        EditorKey::Back,
        EditorKey::Left,
        EditorKey::Right,
        EditorKey::FreeLook,
        EditorKey::Place,
        EditorKey::FaceCamera,
    ];

    pub fn code(self) -> u32 {
        match self {
            EditorKey::SlowMove => 224,
            EditorKey::Forward => 119,
            EditorKey::Back => 115,
            EditorKey::Left => 97,
            EditorKey::Right => 100,
            EditorKey::FreeLook => 32,
            EditorKey::Place => 101,
            EditorKey::FaceCamera => 102,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.code() == code)
    }

    /// Default winit binding
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ControlLeft => Some(EditorKey::SlowMove),
            KeyCode::KeyW => Some(EditorKey::Forward),
            KeyCode::KeyS => Some(EditorKey::Back),
            KeyCode::KeyA => Some(EditorKey::Left),
            KeyCode::KeyD => Some(EditorKey::Right),
            KeyCode::Space => Some(EditorKey::FreeLook),
            KeyCode::KeyE => Some(EditorKey::Place),
            KeyCode::KeyF => Some(EditorKey::FaceCamera),
            _ => None,
        }
    }
}

/// Keyboard and pointer state for one editor tick.
///
/// Button edges are latched until [`InputState::end_frame`], so a click
/// that starts and ends between two ticks is still seen as a press followed
/// by a release.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<EditorKey>,

    /// Pointer position in window pixels
    pointer: Vec2,
    /// Pointer movement since the last tick
    pointer_delta: Vec2,
    /// Raw device motion (for the grabbed cursor in free look)
    raw_delta: Vec2,

    main_down: bool,
    main_pressed: bool,
    main_released: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit key press. Unbound keys are ignored.
    pub fn process_key_down(&mut self, key: KeyCode) {
        if let Some(key) = EditorKey::from_key_code(key) {
            self.press_key(key);
        }
    }

    /// Process a winit key release
    pub fn process_key_up(&mut self, key: KeyCode) {
        if let Some(key) = EditorKey::from_key_code(key) {
            self.release_key(key);
        }
    }

    pub fn press_key(&mut self, key: EditorKey) {
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: EditorKey) {
        self.keys_down.remove(&key);
    }

    /// Only the left button drives the editor
    pub fn process_mouse_button_down(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.press_main();
        }
    }

    pub fn process_mouse_button_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.release_main();
        }
    }

    pub fn press_main(&mut self) {
        if !self.main_down {
            self.main_pressed = true;
        }
        self.main_down = true;
    }

    pub fn release_main(&mut self) {
        if self.main_down {
            self.main_released = true;
        }
        self.main_down = false;
    }

    /// Process cursor movement in window pixels
    pub fn process_mouse_move(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        self.pointer_delta += position - self.pointer;
        self.pointer = position;
    }

    /// Process raw device motion
    pub fn process_mouse_raw_delta(&mut self, dx: f32, dy: f32) {
        self.raw_delta += Vec2::new(dx, dy);
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.release_main();
    }

    /// Call at end of tick to clear per-frame state
    pub fn end_frame(&mut self) {
        self.main_pressed = false;
        self.main_released = false;
        self.pointer_delta = Vec2::ZERO;
        self.raw_delta = Vec2::ZERO;
    }

    // --- Query methods ---

    pub fn is_key_down(&self, key: EditorKey) -> bool {
        self.keys_down.contains(&key)
    }

    /// Look up a key by its numeric code
    pub fn is_code_down(&self, code: u32) -> bool {
        EditorKey::from_code(code).is_some_and(|key| self.is_key_down(key))
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Movement used to steer the camera.
    ///
    /// Prefers raw device motion, which keeps arriving while the cursor is
    /// grabbed, and falls back to the cursor delta.
    pub fn look_delta(&self) -> Vec2 {
        if self.raw_delta != Vec2::ZERO {
            self.raw_delta
        } else {
            self.pointer_delta
        }
    }

    pub fn main_down(&self) -> bool {
        self.main_down
    }

    pub fn main_pressed(&self) -> bool {
        self.main_pressed
    }

    pub fn main_released(&self) -> bool {
        self.main_released
    }
}
