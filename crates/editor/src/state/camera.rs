//! Camera rig: projection toggle, framing and view-cube presets

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use super::settings::CameraSettings;
use super::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Quarter-turn step of the view cube arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStep {
    Left,
    Right,
    Up,
    Down,
    RollLeft,
    RollRight,
}

/// Orbit camera described by eye position and target
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub projection: Projection,
    pub position: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view (degrees)
    pub fov_degrees: f64,
    focus_margin: f64,
}

impl CameraRig {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            projection: Projection::Perspective,
            position: DVec3::from_array(settings.position),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_degrees: settings.fov_degrees,
            focus_margin: settings.focus_margin,
        }
    }

    /// Switch projection; eye and target stay where they are
    pub fn toggle_projection(&mut self) -> Projection {
        self.projection = match self.projection {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        };
        self.projection
    }

    /// Move the eye so a box of `size` centred on `center` fills the view
    pub fn frame(&mut self, center: DVec3, size: DVec3) {
        let max_dim = size.max_element();
        let fov = self.fov_degrees.to_radians();
        let distance = (max_dim / 2.0 * (fov * 2.0).tan()).abs() * self.focus_margin;

        let mut direction = (self.position - self.target).normalize_or_zero();
        if direction.length_squared() < 0.1 || direction.y.abs() > 0.98 {
            direction = DVec3::ONE.normalize();
        }

        self.position = center + direction * distance;
        self.target = center;
    }

    /// Look at the origin from `direction`, keeping the eye distance.
    /// Ignored for a zero direction.
    pub fn look_from(&mut self, direction: DVec3, up: Option<DVec3>) {
        let direction = direction.normalize_or_zero();
        if direction == DVec3::ZERO {
            return;
        }
        self.position = direction * self.position.length();
        if let Some(up) = up.map(DVec3::normalize_or_zero).filter(|u| *u != DVec3::ZERO) {
            self.up = up;
        }
        self.target = DVec3::ZERO;
    }

    /// Turn the view a quarter around the origin
    pub fn step_view(&mut self, step: ViewStep) {
        let angle = std::f64::consts::FRAC_PI_2;
        let view_dir = (self.target - self.position).normalize_or_zero();
        let right = view_dir.cross(self.up).normalize_or_zero();

        let (mut position, mut up) = (self.position, self.up);
        let rotation = match step {
            ViewStep::Left => Some(DQuat::from_axis_angle(DVec3::Y, angle)),
            ViewStep::Right => Some(DQuat::from_axis_angle(DVec3::Y, -angle)),
            ViewStep::Up if right != DVec3::ZERO => Some(DQuat::from_axis_angle(right, angle)),
            ViewStep::Down if right != DVec3::ZERO => Some(DQuat::from_axis_angle(right, -angle)),
            ViewStep::RollLeft | ViewStep::RollRight if view_dir != DVec3::ZERO => {
                let roll = if step == ViewStep::RollLeft { angle } else { -angle };
                up = DQuat::from_axis_angle(view_dir, roll) * up;
                None
            }
            _ => None,
        };
        if let Some(q) = rotation {
            position = q * position;
            up = q * up;
        }
        self.look_from(position, Some(up));
    }
}

impl EditorState {
    /// Frame the camera on the given objects. No-op if none is in the scene.
    pub fn focus_on(&mut self, ids: &[ObjectId]) -> bool {
        let Some(bounds) = self.graph.world_bounds(ids) else {
            return false;
        };
        self.camera.frame(bounds.center(), bounds.size());
        true
    }

    /// Frame the camera on the current selection
    pub fn focus_selection(&mut self) -> bool {
        let selected = self.selection.all().to_vec();
        self.focus_on(&selected)
    }

    /// Snap the camera to look at the origin from `direction` (view-cube face click)
    pub fn view_from(&mut self, direction: DVec3, up: Option<DVec3>) {
        self.camera.look_from(direction, up);
        self.notify_refresh();
    }

    /// Rotate the view a quarter turn (view-cube arrows)
    pub fn step_view(&mut self, step: ViewStep) {
        self.camera.step_view(step);
        self.notify_refresh();
    }

    /// Switch between perspective and orthographic projection
    pub fn toggle_projection(&mut self) -> Projection {
        let projection = self.camera.toggle_projection();
        self.notify_refresh();
        projection
    }
}
