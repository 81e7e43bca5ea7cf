//! Editor settings

use serde::{Deserialize, Serialize};

/// Snap increments applied while the gizmo is dragged with snapping on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Translation step in world units
    pub translation: f64,
    /// Rotation step in radians
    pub rotation: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            translation: 0.5,
            rotation: std::f64::consts::FRAC_PI_4,
        }
    }
}

/// Camera defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Vertical field of view of the perspective camera (degrees)
    pub fov_degrees: f64,
    /// Initial eye position
    pub position: [f64; 3],
    /// Multiplier applied to the framing distance when focusing on objects
    pub focus_margin: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            position: [5.0, 5.0, 5.0],
            focus_margin: 2.5,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Height at which new primitives are spawned (resting on the ground grid)
    pub spawn_height: f64,
    /// Color shown for every mesh while colors are toggled off
    pub neutral_color: u32,
    /// Pointer travel (pixels) above which a press/release is a drag, not a click
    pub click_tolerance_px: f64,
    pub snap: SnapSettings,
    #[serde(default)]
    pub camera: CameraSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            spawn_height: 0.5,
            neutral_color: 0x808080,
            click_tolerance_px: 5.0,
            snap: SnapSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring malformed settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(dir) = path.parent() {
                if std::fs::create_dir_all(dir).is_ok() {
                    if let Ok(json) = serde_json::to_string_pretty(self) {
                        let _ = std::fs::write(path, json);
                    }
                }
            }
        }
    }
}
