//! Transform manipulator state

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use super::settings::EditorSettings;
use super::EditorState;

/// Which transform the gizmo drags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Frame the gizmo axes are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoSpace {
    #[default]
    World,
    Local,
}

/// State of the transform gizmo
#[derive(Debug, Default)]
pub struct GizmoState {
    /// Node the gizmo manipulates (a single object or the selection group)
    pub attached: Option<ObjectId>,
    pub mode: GizmoMode,
    pub space: GizmoSpace,
    /// Whether a gizmo drag is in progress
    pub dragging: bool,
    pub translation_snap: Option<f64>,
    pub rotation_snap: Option<f64>,
    snap_steps: (f64, f64),
}

impl GizmoState {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            snap_steps: (settings.snap.translation, settings.snap.rotation),
            ..Self::default()
        }
    }

    /// Enable or disable snapping using the configured steps
    pub fn set_snap(&mut self, enabled: bool) {
        self.translation_snap = enabled.then_some(self.snap_steps.0);
        self.rotation_snap = enabled.then_some(self.snap_steps.1);
    }
}

/// Smallest scale magnitude a drag may reach; zero would make the world matrix singular
const MIN_SCALE: f64 = 1e-6;

/// Keep a scale component away from zero, on the side it came from
fn clamp_scale(old: f64, new: f64) -> f64 {
    if new.abs() >= MIN_SCALE {
        new
    } else if new == 0.0 {
        MIN_SCALE.copysign(old)
    } else {
        MIN_SCALE.copysign(new)
    }
}

fn snap(value: f64, step: Option<f64>) -> f64 {
    match step {
        Some(step) if step > 0.0 => (value / step).round() * step,
        _ => value,
    }
}

impl EditorState {
    /// Apply one pointer-move frame of a drag to the gizmo's node.
    ///
    /// `delta` is a translation, Euler XYZ angles in radians, or a scale
    /// increment depending on the gizmo mode. Ignored outside a drag.
    pub fn drag_gizmo(&mut self, delta: DVec3) {
        if !self.gizmo.dragging {
            return;
        }
        let Some(target) = self.gizmo.attached.clone() else {
            return;
        };
        let Some(node) = self.graph.get_mut(&target) else {
            return;
        };

        let local = &mut node.local;
        match self.gizmo.mode {
            GizmoMode::Translate => {
                let delta = match self.gizmo.space {
                    GizmoSpace::World => delta,
                    GizmoSpace::Local => local.rotation * delta,
                };
                let p = local.position + delta;
                let step = self.gizmo.translation_snap;
                local.position = DVec3::new(snap(p.x, step), snap(p.y, step), snap(p.z, step));
            }
            GizmoMode::Rotate => {
                let step = self.gizmo.rotation_snap;
                let q = DQuat::from_euler(
                    EulerRot::XYZ,
                    snap(delta.x, step),
                    snap(delta.y, step),
                    snap(delta.z, step),
                );
                local.rotation = match self.gizmo.space {
                    GizmoSpace::World => q * local.rotation,
                    GizmoSpace::Local => local.rotation * q,
                }
                .normalize();
            }
            GizmoMode::Scale => {
                let s = local.scale + delta;
                local.scale = DVec3::new(
                    clamp_scale(local.scale.x, s.x),
                    clamp_scale(local.scale.y, s.y),
                    clamp_scale(local.scale.z, s.z),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PrimitiveKind;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_snap_rounding() {
        assert_eq!(snap(0.74, Some(0.5)), 0.5);
        assert_eq!(snap(0.76, Some(0.5)), 1.0);
        assert_eq!(snap(0.76, None), 0.76);
        assert_eq!(snap(0.76, Some(0.0)), 0.76);
    }

    #[test]
    fn test_clamp_scale_avoids_zero() {
        assert_eq!(clamp_scale(1.0, 0.0), MIN_SCALE);
        assert_eq!(clamp_scale(-2.0, 0.0), -MIN_SCALE);
        assert_eq!(clamp_scale(1.0, -1e-9), -MIN_SCALE);
        assert_eq!(clamp_scale(1.0, 0.25), 0.25);
        assert_eq!(clamp_scale(1.0, -3.0), -3.0);
    }

    #[test]
    fn test_set_snap_uses_settings() {
        let mut g = GizmoState::new(&EditorSettings::default());
        g.set_snap(true);
        assert_eq!(g.translation_snap, Some(0.5));
        assert!(g.rotation_snap.is_some());
        g.set_snap(false);
        assert!(g.translation_snap.is_none());
        assert!(g.rotation_snap.is_none());
    }

    #[test]
    fn test_drag_ignored_when_not_dragging() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.drag_gizmo(DVec3::X);
        let p = e.world_transform(&id).unwrap().position;
        assert!(p.abs_diff_eq(DVec3::new(0.0, 0.5, 0.0), EPS));
    }

    #[test]
    fn test_drag_translate_with_snap() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.gizmo.set_snap(true);
        e.begin_transform_capture();
        e.drag_gizmo(DVec3::new(0.3, 0.0, 0.0));
        let p = e.world_transform(&id).unwrap().position;
        assert!(p.abs_diff_eq(DVec3::new(0.5, 0.5, 0.0), EPS));
    }

    #[test]
    fn test_drag_rotate_and_scale() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.begin_transform_capture();

        e.gizmo.mode = GizmoMode::Rotate;
        e.drag_gizmo(DVec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
        let r = e.world_transform(&id).unwrap().rotation;
        assert!(r.abs_diff_eq(DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2), 1e-9));

        e.gizmo.mode = GizmoMode::Scale;
        e.drag_gizmo(DVec3::new(1.0, 0.0, 0.0));
        let s = e.world_transform(&id).unwrap().scale;
        assert!(s.abs_diff_eq(DVec3::new(2.0, 1.0, 1.0), 1e-9));
    }
}
