//! Selection model and the transient group wrapper used for multi-select

use glam::DVec3;
use shared::ObjectId;

use super::graph::{NodeKind, NodeTransform};
use super::EditorState;

/// Object selection state (supports multi-select)
#[derive(Debug, Default)]
pub struct SelectionState {
    /// Selected object IDs (in order of selection)
    selected: Vec<ObjectId>,
    /// Wrapper node parenting the selection while more than one object is selected
    group: Option<ObjectId>,
}

impl SelectionState {
    /// Primary (first) selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.first()
    }

    /// All selected objects
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Number of selected objects
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Active group wrapper, if any
    pub fn group(&self) -> Option<&ObjectId> {
        self.group.as_ref()
    }

    /// Toggle selection (Shift+click behavior)
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Replace the selection, dropping duplicates but keeping first-seen order
    pub fn replace(&mut self, ids: &[ObjectId]) {
        self.selected.clear();
        for id in ids {
            if !self.is_selected(id) {
                self.selected.push(id.clone());
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.selected.retain(|s| s != id);
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

impl EditorState {
    /// Replace or toggle the selection, regrouping around the change.
    ///
    /// IDs that are not in the editable object list are ignored.
    pub fn set_selection(&mut self, ids: &[ObjectId], append: bool) {
        self.dissolve_group();

        let listed: Vec<ObjectId> = ids.iter().filter(|id| self.is_listed(id)).cloned().collect();
        if append {
            for id in listed {
                self.selection.toggle(id);
            }
        } else {
            self.selection.replace(&listed);
        }
        tracing::debug!("Selection: {} object(s)", self.selection.count());

        self.form_group();
        self.sync_gizmo();
        self.notify_refresh();
    }

    /// Select everything in the object list
    pub fn select_all(&mut self) {
        let all = self.objects.clone();
        self.set_selection(&all, false);
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.set_selection(&[], false);
    }

    /// Put every grouped object back under the scene root and drop the wrapper.
    /// No-op when no group exists.
    pub fn dissolve_group(&mut self) {
        let Some(group) = self.selection.group.take() else {
            return;
        };
        let children = self
            .graph
            .get(&group)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        for child in &children {
            self.graph.attach(child, None);
        }
        self.graph.destroy(&group);
        if self.gizmo.attached.as_deref() == Some(group.as_str()) {
            self.gizmo.attached = None;
        }
    }

    /// Wrap the selection in a group centred on its members.
    /// No-op when fewer than two objects are selected or a group already exists.
    pub fn form_group(&mut self) {
        if self.selection.count() <= 1 || self.selection.group.is_some() {
            return;
        }

        let members: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.graph.is_attached(id))
            .cloned()
            .collect();
        if members.len() <= 1 {
            return;
        }

        let center = members
            .iter()
            .filter_map(|id| self.graph.world_transform(id))
            .fold(DVec3::ZERO, |acc, t| acc + t.position)
            / members.len() as f64;

        let group = self.graph.insert_detached(
            "selection".to_string(),
            NodeKind::Group,
            NodeTransform::from_position(center),
        );
        self.graph.add_to_root(&group);
        for id in &members {
            self.graph.attach(id, Some(&group));
        }
        self.selection.group = Some(group);
    }

    /// Point the gizmo at the sole selected object, the group, or nothing
    pub fn sync_gizmo(&mut self) {
        self.gizmo.attached = match self.selection.count() {
            0 => None,
            1 => self.selection.primary().cloned(),
            _ => self.selection.group.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PrimitiveKind;

    const EPS: f64 = 1e-9;

    fn editor_with(positions: &[[f64; 3]]) -> (EditorState, Vec<ObjectId>) {
        let mut e = EditorState::default();
        let ids = positions
            .iter()
            .map(|p| e.add_primitive_at(PrimitiveKind::Cube, DVec3::from_array(*p)))
            .collect();
        e.clear_selection();
        (e, ids)
    }

    #[test]
    fn test_state_initial_empty() {
        let s = SelectionState::default();
        assert!(s.primary().is_none());
        assert!(s.all().is_empty());
        assert_eq!(s.count(), 0);
        assert!(s.group().is_none());
    }

    #[test]
    fn test_state_toggle() {
        let mut s = SelectionState::default();
        s.toggle("a".to_string());
        s.toggle("b".to_string());
        s.toggle("a".to_string());
        assert_eq!(s.all(), &["b".to_string()]);
    }

    #[test]
    fn test_state_replace_dedups() {
        let mut s = SelectionState::default();
        s.replace(&["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(s.all(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_single_selection_has_no_group() {
        let (mut e, ids) = editor_with(&[[0.0, 0.0, 0.0]]);
        e.set_selection(&ids, false);
        assert!(e.selection.group().is_none());
        assert_eq!(e.gizmo.attached.as_ref(), Some(&ids[0]));
    }

    #[test]
    fn test_multi_selection_forms_group_at_centroid() {
        let (mut e, ids) = editor_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        e.set_selection(&ids, false);

        let group = e.selection.group().cloned().unwrap();
        assert_eq!(e.gizmo.attached.as_ref(), Some(&group));
        let center = e.graph.world_transform(&group).unwrap().position;
        assert!(center.abs_diff_eq(DVec3::new(2.0, 0.0, 0.0), EPS));
        assert_eq!(e.graph.get(&group).unwrap().children(), ids.as_slice());
    }

    #[test]
    fn test_group_round_trip_keeps_world_positions() {
        let (mut e, ids) = editor_with(&[[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        e.set_selection(&ids, false);
        e.dissolve_group();

        assert!(e.selection.group().is_none());
        let a = e.world_transform(&ids[0]).unwrap().position;
        let b = e.world_transform(&ids[1]).unwrap().position;
        assert!(a.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), EPS));
        assert!(b.abs_diff_eq(DVec3::new(3.0, 0.0, 0.0), EPS));
        // Only the two cubes remain; the wrapper is gone
        assert_eq!(e.graph.len(), 2);
    }

    #[test]
    fn test_dissolve_and_form_idempotent() {
        let (mut e, ids) = editor_with(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        e.dissolve_group();
        e.set_selection(&ids, false);
        let group = e.selection.group().cloned();
        e.form_group();
        assert_eq!(e.selection.group().cloned(), group);
        e.dissolve_group();
        e.dissolve_group();
        assert!(e.selection.group().is_none());
    }

    #[test]
    fn test_append_toggle_twice_is_empty() {
        let (mut e, ids) = editor_with(&[[0.0, 0.0, 0.0]]);
        e.set_selection(&ids[..1], true);
        assert_eq!(e.selection.count(), 1);
        e.set_selection(&ids[..1], true);
        assert!(e.selection.is_empty());
        assert!(e.gizmo.attached.is_none());
    }

    #[test]
    fn test_append_keeps_selection_order() {
        let (mut e, ids) = editor_with(&[[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        e.set_selection(&[ids[2].clone()], false);
        e.set_selection(&[ids[0].clone()], true);
        assert_eq!(e.selection.all(), &[ids[2].clone(), ids[0].clone()]);
        e.set_selection(&[ids[2].clone()], true);
        assert_eq!(e.selection.all(), &[ids[0].clone()]);
        assert!(e.selection.group().is_none());
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let (mut e, ids) = editor_with(&[[0.0; 3]]);
        e.set_selection(&[ids[0].clone(), "ghost".to_string()], false);
        assert_eq!(e.selection.all(), ids.as_slice());
    }

    #[test]
    fn test_select_all() {
        let (mut e, ids) = editor_with(&[[0.0; 3], [1.0, 0.0, 0.0]]);
        e.select_all();
        assert_eq!(e.selection.all(), ids.as_slice());
        assert!(e.selection.group().is_some());
    }
}
