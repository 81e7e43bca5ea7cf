//! Object create / duplicate / remove / edit operations
//!
//! Every operation that changes the object list records the matching history action.

use glam::DVec3;
use shared::{Color, ObjectId, PrimitiveKind, MAX_COLOR};

use super::graph::{NodeKind, NodeTransform};
use super::history::HistoryAction;
use super::EditorState;

impl EditorState {
    /// Spawn a unit primitive resting on the ground plane and select it
    pub fn add_primitive(&mut self, kind: PrimitiveKind) -> ObjectId {
        let position = DVec3::new(0.0, self.settings.spawn_height, 0.0);
        self.add_primitive_at(kind, position)
    }

    /// Spawn a unit primitive at `position` with a random color and select it
    pub fn add_primitive_at(&mut self, kind: PrimitiveKind, position: DVec3) -> ObjectId {
        let color = rand::random::<Color>() & MAX_COLOR;
        let id = self.spawn_object(
            kind.base_name().to_string(),
            kind,
            color,
            NodeTransform::from_position(position),
        );
        tracing::debug!("Added {} {}", kind.base_name(), id);

        self.push_action(HistoryAction::Add { object: id.clone() });
        self.set_selection(std::slice::from_ref(&id), false);
        id
    }

    /// Clone every selected mesh at its world transform and select the copies
    pub fn duplicate_selection(&mut self) -> Vec<ObjectId> {
        if self.selection.is_empty() {
            return Vec::new();
        }

        let originals = self.selection.all().to_vec();
        let mut clones = Vec::with_capacity(originals.len());
        for original in &originals {
            let Some(node) = self.graph.get(original) else {
                continue;
            };
            let NodeKind::Mesh { primitive, color } = node.kind else {
                continue;
            };
            let name = format!("{}_copy", node.name);
            let world = self.graph.world_transform(original).unwrap_or_default();
            clones.push(self.spawn_object(name, primitive, color, world));
        }
        if clones.is_empty() {
            return clones;
        }

        tracing::debug!("Duplicated {} object(s)", clones.len());
        self.push_action(HistoryAction::AddBatch {
            objects: clones.clone(),
        });
        self.set_selection(&clones, false);
        clones
    }

    /// Remove the selected objects from the scene (kept for undo).
    /// Returns them in object-list order.
    pub fn remove_selection(&mut self) -> Vec<ObjectId> {
        if self.selection.is_empty() {
            return Vec::new();
        }

        self.dissolve_group();
        // Undo re-appends in this order
        let removed: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|id| self.selection.is_selected(id))
            .cloned()
            .collect();
        self.push_action(HistoryAction::Remove {
            objects: removed.clone(),
        });
        for id in &removed {
            self.graph.detach(id);
            self.unlist_object(id);
        }
        tracing::debug!("Removed {} object(s)", removed.len());

        self.clear_selection();
        removed
    }

    /// Recolor the selection. No-op when nothing is selected or nothing would change.
    pub fn set_selection_color(&mut self, color: Color) -> bool {
        let color = color & MAX_COLOR;
        let objects: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.color_of(id).is_some())
            .cloned()
            .collect();
        let before: Vec<Color> = objects.iter().filter_map(|id| self.color_of(id)).collect();
        if objects.is_empty() || before.iter().all(|c| *c == color) {
            return false;
        }

        for id in &objects {
            self.set_mesh_color(id, color);
        }
        self.push_action(HistoryAction::ColorChange {
            objects,
            before,
            after: color,
        });
        self.notify_refresh();
        true
    }

    /// Move an object to `index` in the object list (clamped). Not recorded in history.
    pub fn move_in_list(&mut self, id: &str, index: usize) -> bool {
        let Some(from) = self.objects.iter().position(|o| o == id) else {
            return false;
        };
        let item = self.objects.remove(from);
        let to = index.min(self.objects.len());
        self.objects.insert(to, item);
        self.notify_refresh();
        true
    }

    /// Rename an object. Not recorded in history.
    pub fn rename(&mut self, id: &str, name: String) -> bool {
        if !self.is_listed(id) {
            return false;
        }
        let Some(node) = self.graph.get_mut(id) else {
            return false;
        };
        node.name = name;
        self.notify_refresh();
        true
    }

    pub(crate) fn set_mesh_color(&mut self, id: &str, new_color: Color) {
        if let Some(node) = self.graph.get_mut(id) {
            if let NodeKind::Mesh { color, .. } = &mut node.kind {
                *color = new_color;
            }
        }
    }

    /// Create a mesh under the scene root and list it, without touching history
    pub(crate) fn spawn_object(
        &mut self,
        name: String,
        primitive: PrimitiveKind,
        color: Color,
        transform: NodeTransform,
    ) -> ObjectId {
        let id = self
            .graph
            .insert_detached(name, NodeKind::Mesh { primitive, color }, transform);
        self.graph.add_to_root(&id);
        self.list_object(&id);
        id
    }
}
