//! Pointer picking and keyboard shortcut handling

use serde::{Deserialize, Serialize};

use super::gizmo::GizmoMode;
use super::graph::Ray;
use super::EditorState;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    /// Cmd on macOS
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    /// Ctrl or Cmd
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl EditorState {
    /// Handle a pointer release over the viewport.
    ///
    /// Releases after more than the click tolerance of travel, or while the
    /// gizmo is dragging, are not clicks. A hit selects (toggles with `append`);
    /// a miss clears the selection unless `append`.
    pub fn pointer_click(&mut self, ray: &Ray, append: bool, moved_px: f64) -> bool {
        if moved_px > self.settings.click_tolerance_px || self.gizmo.dragging {
            return false;
        }
        match self.graph.pick(ray, &self.objects) {
            Some(hit) => self.set_selection(&[hit], append),
            None if !append => self.clear_selection(),
            None => return false,
        }
        true
    }

    /// Dispatch a keyboard shortcut. Returns true if it was handled.
    pub fn handle_shortcut(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Char(c) => match (c.to_ascii_lowercase(), modifiers.command()) {
                ('z', true) => {
                    if modifiers.shift {
                        self.redo();
                    } else {
                        self.undo();
                    }
                }
                ('y', true) => {
                    self.redo();
                }
                ('d', true) => {
                    self.duplicate_selection();
                }
                ('z', false) => self.set_gizmo_mode(GizmoMode::Translate),
                ('r', false) => self.set_gizmo_mode(GizmoMode::Rotate),
                ('s', false) => self.set_gizmo_mode(GizmoMode::Scale),
                ('f', false) => {
                    self.focus_selection();
                }
                _ => return false,
            },
            Key::Delete | Key::Backspace => {
                self.remove_selection();
            }
            Key::Escape => self.clear_selection(),
        }
        true
    }
}
