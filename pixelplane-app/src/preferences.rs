use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use pixelplane_core::Camera;
use pixelplane_render::BuiltinShader;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// User settings persisted as `preferences.json` next to the executable.
///
/// Only window and overlay settings live here. The camera is never saved:
/// every launch starts from `initial_zoom` centred on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Repaint rate of the render loop.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Zoom multiplier per mouse-wheel notch.
    #[serde(default = "default_wheel_zoom_factor")]
    pub wheel_zoom_factor: f64,
    /// World units per pixel at startup and after a reset.
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,
    /// Fraction of the view to pan per arrow-key press.
    #[serde(default = "default_pan_fraction")]
    pub pan_fraction: f64,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_debug_panel: bool,
    #[serde(default)]
    pub shader: BuiltinShader,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_target_fps() -> u32 {
    60
}
fn default_wheel_zoom_factor() -> f64 {
    1.1
}
fn default_initial_zoom() -> f64 {
    Camera::DEFAULT_ZOOM
}
fn default_pan_fraction() -> f64 {
    0.1
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            target_fps: default_target_fps(),
            wheel_zoom_factor: default_wheel_zoom_factor(),
            initial_zoom: default_initial_zoom(),
            pan_fraction: default_pan_fraction(),
            show_grid: true,
            show_debug_panel: true,
            shader: BuiltinShader::default(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    prefs.sanitized()
                }
                Err(e) => {
                    error!("Failed to parse preferences: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read preferences file: {e}");
                Self::default()
            }
        }
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Replace out-of-range values with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.window_width >= 1.0 && self.window_height >= 1.0) {
            warn!(
                "Ignoring window size {}x{}",
                self.window_width, self.window_height
            );
            self.window_width = defaults.window_width;
            self.window_height = defaults.window_height;
        }
        if self.target_fps == 0 {
            warn!("Ignoring target_fps of 0");
            self.target_fps = defaults.target_fps;
        }
        if !(self.wheel_zoom_factor.is_finite() && self.wheel_zoom_factor > 1.0) {
            warn!("Ignoring wheel_zoom_factor {}", self.wheel_zoom_factor);
            self.wheel_zoom_factor = defaults.wheel_zoom_factor;
        }
        if Camera::new(0.0, 0.0, self.initial_zoom).is_err() {
            warn!("Ignoring initial_zoom {}", self.initial_zoom);
            self.initial_zoom = defaults.initial_zoom;
        }
        if !(self.pan_fraction.is_finite() && self.pan_fraction > 0.0 && self.pan_fraction <= 1.0) {
            warn!("Ignoring pan_fraction {}", self.pan_fraction);
            self.pan_fraction = defaults.pan_fraction;
        }
        self
    }

    /// The camera a fresh session (or a reset) starts from.
    pub fn initial_camera(&self) -> Camera {
        Camera::new(0.0, 0.0, self.initial_zoom).unwrap_or_default()
    }
}

/// `preferences.json` beside the executable, or in the working directory
/// when the executable path is unknown.
fn config_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join("preferences.json")
}
