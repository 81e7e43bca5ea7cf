//! View toggles: colors, edge overlay, gizmo space/mode, snapping

use shared::Color;

use super::gizmo::{GizmoMode, GizmoSpace};
use super::EditorState;

/// Display flags
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Show real colors; when false every mesh shows the neutral color
    pub show_colors: bool,
    /// Show the edge overlay on meshes
    pub show_wireframes: bool,
    pub snap_enabled: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_colors: true,
            show_wireframes: true,
            snap_enabled: false,
        }
    }
}

impl EditorState {
    /// Color a mesh is drawn with under the current view flags
    pub fn display_color(&self, id: &str) -> Option<Color> {
        let color = self.color_of(id)?;
        Some(if self.view.show_colors {
            color
        } else {
            self.settings.neutral_color
        })
    }

    pub fn toggle_colors(&mut self, active: bool) {
        self.view.show_colors = active;
        self.notify_refresh();
    }

    pub fn toggle_wireframes(&mut self, active: bool) {
        self.view.show_wireframes = active;
        self.notify_refresh();
    }

    /// Switch gizmo space; the gizmo is reattached to whatever it held
    pub fn toggle_space(&mut self, local: bool) {
        self.gizmo.space = if local {
            GizmoSpace::Local
        } else {
            GizmoSpace::World
        };
        self.sync_gizmo();
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.gizmo.mode = mode;
    }

    pub fn toggle_snap(&mut self, active: bool) {
        self.view.snap_enabled = active;
        self.gizmo.set_snap(active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PrimitiveKind;

    #[test]
    fn test_colors_off_shows_neutral_and_keeps_real() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.set_selection_color(0xff0000);

        e.toggle_colors(false);
        assert_eq!(e.display_color(&id), Some(0x808080));
        assert_eq!(e.color_of(&id), Some(0xff0000));

        e.toggle_colors(true);
        assert_eq!(e.display_color(&id), Some(0xff0000));
    }

    #[test]
    fn test_toggle_space_keeps_attachment() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.toggle_space(true);
        assert_eq!(e.gizmo.space, GizmoSpace::Local);
        assert_eq!(e.gizmo.attached.as_ref(), Some(&id));
    }

    #[test]
    fn test_toggle_snap() {
        let mut e = EditorState::default();
        e.toggle_snap(true);
        assert!(e.view.snap_enabled);
        assert_eq!(e.gizmo.translation_snap, Some(0.5));
        e.toggle_snap(false);
        assert!(e.gizmo.translation_snap.is_none());
    }

    #[test]
    fn test_toggle_wireframes_bumps_version() {
        let mut e = EditorState::default();
        let v = e.version();
        e.toggle_wireframes(false);
        assert!(!e.view.show_wireframes);
        assert!(e.version() > v);
    }
}
