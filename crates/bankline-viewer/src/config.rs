//! Layered editor configuration
//!
//! Config is loaded with layers of precedence (highest wins):
//! 1. Environment variables: `BANKLINE_FOV`, `BANKLINE_POINT_SIZE`
//! 2. An explicit `--config` file, or project-local `.bankline/config.toml`
//! 3. Global: `~/.bankline/config.toml`
//! 4. Built-in defaults
//!
//! Files are merged key by key, so a project file that only sets
//! `[display] point_size` keeps every other value from the layers below.

use bankline_core::{BanklineError, Result};
use bankline_render::FlyCamera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest accepted `track.ribbon_spacing`
pub const MIN_RIBBON_SPACING: f32 = 0.01;

/// Largest accepted `display.grid_extent`
pub const MAX_GRID_EXTENT: i32 = 1000;

/// Fly camera defaults and motion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near_z: f32,
    pub far_z: f32,
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Radians turned per window-width of pointer travel
    pub look_sensitivity: f32,
    pub speed_slow: f32,
    pub speed_fast: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near_z: 0.1,
            far_z: 100.0,
            position: [0.0, 1.0, 0.0],
            yaw_degrees: -90.0,
            pitch_degrees: 0.0,
            look_sensitivity: 10.0,
            speed_slow: 0.005,
            speed_fast: 0.03,
        }
    }
}

/// Track ribbon and handle geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub ribbon_half_width: f32,
    pub ribbon_spacing: f32,
    pub normal_handle_length: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            ribbon_half_width: 0.2,
            ribbon_spacing: 0.5,
            normal_handle_length: 0.5,
        }
    }
}

/// Window and marker sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Marker size; on-screen radius is `point_size / w`
    pub point_size: f32,
    /// Grid lines run from `-grid_extent` to `grid_extent`
    pub grid_extent: i32,
    pub grid_scale: f32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            point_size: 20.0,
            grid_extent: 20,
            grid_scale: 1.0,
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Resolved editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub track: TrackConfig,
    pub display: DisplayConfig,
}

impl EditorConfig {
    /// Load config with layered precedence: defaults < global < project or
    /// explicit file < env vars.
    ///
    /// An explicit path must exist; the global and project files are
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut table = toml::Table::new();

        // Layer 1: Global config (~/.bankline/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                Self::merge_tables(&mut table, Self::load_table(&global_path)?);
            }
        }

        // Layer 2: Explicit file, else project-local config (.bankline/config.toml)
        match explicit {
            Some(path) => Self::merge_tables(&mut table, Self::load_table(path)?),
            None => {
                let local_path = PathBuf::from(".bankline/config.toml");
                if local_path.exists() {
                    Self::merge_tables(&mut table, Self::load_table(&local_path)?);
                }
            }
        }

        let mut config = Self::from_table(table)?;

        // Layer 3: Environment variable overrides
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Render the resolved config as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(BanklineError::ConfigError(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near_z > 0.0 && camera.far_z > camera.near_z) {
            return Err(BanklineError::ConfigError(format!(
                "camera clip range must satisfy 0 < near_z < far_z, got {}..{}",
                camera.near_z, camera.far_z
            )));
        }
        if !(self.track.ribbon_spacing.is_finite() && self.track.ribbon_spacing >= MIN_RIBBON_SPACING) {
            return Err(BanklineError::ConfigError(format!(
                "track.ribbon_spacing must be at least {}, got {}",
                MIN_RIBBON_SPACING, self.track.ribbon_spacing
            )));
        }
        if !(self.display.point_size.is_finite() && self.display.point_size > 0.0) {
            return Err(BanklineError::ConfigError(format!(
                "display.point_size must be positive, got {}",
                self.display.point_size
            )));
        }
        if !(0..=MAX_GRID_EXTENT).contains(&self.display.grid_extent) {
            return Err(BanklineError::ConfigError(format!(
                "display.grid_extent must be in 0..={}, got {}",
                MAX_GRID_EXTENT, self.display.grid_extent
            )));
        }
        if !(self.display.grid_scale.is_finite() && self.display.grid_scale > 0.0) {
            return Err(BanklineError::ConfigError(format!(
                "display.grid_scale must be positive, got {}",
                self.display.grid_scale
            )));
        }
        Ok(())
    }

    /// A camera placed and shaped per `[camera]`
    pub fn build_camera(&self) -> FlyCamera {
        let c = &self.camera;
        let mut camera = FlyCamera::new();
        camera.position = Vec3::from_array(c.position);
        camera.yaw = c.yaw_degrees.to_radians();
        camera.pitch = 0.0;
        camera.look(0.0, c.pitch_degrees.to_radians());
        camera.fov = c.fov_degrees;
        camera.near = c.near_z;
        camera.far = c.far_z;
        camera.rebuild(camera.viewport());
        camera
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bankline").join("config.toml"))
    }

    fn load_table(path: &Path) -> Result<toml::Table> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| {
            BanklineError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded config layer {}", path.display());
        Ok(table)
    }

    fn from_table(table: toml::Table) -> Result<Self> {
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Merge `overlay` into `base`; nested tables merge per key.
    fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
        for (key, value) in overlay {
            match (base.get_mut(&key), value) {
                (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                    Self::merge_tables(existing, incoming);
                }
                (_, value) => {
                    base.insert(key, value);
                }
            }
        }
    }

    /// Apply `BANKLINE_*` overrides from `lookup`. Unparseable values are
    /// logged and skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(fov) = parse_override(&lookup, "BANKLINE_FOV") {
            self.camera.fov_degrees = fov;
        }
        if let Some(size) = parse_override(&lookup, "BANKLINE_POINT_SIZE") {
            self.display.point_size = size;
        }
    }
}

fn parse_override(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<f32> {
    let raw = lookup(name)?;
    match raw.trim().parse::<f32>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}
