//! Undo/redo functionality
//!
//! History is a linear action log with a cursor. Pushing while actions are
//! undone discards them; there is no redo tree.

use std::collections::HashSet;

use shared::{Color, ObjectId};

use super::graph::NodeTransform;
use super::EditorState;

/// A reversible edit, holding everything needed to replay it both ways
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    /// One object created
    Add { object: ObjectId },
    /// Several objects created together (duplicate, import)
    AddBatch { objects: Vec<ObjectId> },
    /// Objects removed, in object-list order
    Remove { objects: Vec<ObjectId> },
    /// World transforms before and after a gizmo drag; `before[i]` and `after[i]` belong to `objects[i]`
    TransformMulti {
        objects: Vec<ObjectId>,
        before: Vec<NodeTransform>,
        after: Vec<NodeTransform>,
    },
    /// Color edit; `before[i]` belongs to `objects[i]`
    ColorChange {
        objects: Vec<ObjectId>,
        before: Vec<Color>,
        after: Color,
    },
}

impl HistoryAction {
    /// Objects the action refers to
    pub fn objects(&self) -> &[ObjectId] {
        match self {
            HistoryAction::Add { object } => std::slice::from_ref(object),
            HistoryAction::AddBatch { objects }
            | HistoryAction::Remove { objects }
            | HistoryAction::TransformMulti { objects, .. }
            | HistoryAction::ColorChange { objects, .. } => objects,
        }
    }

    /// Short label for menus and logs
    pub fn label(&self) -> &'static str {
        match self {
            HistoryAction::Add { .. } => "add",
            HistoryAction::AddBatch { .. } => "add_batch",
            HistoryAction::Remove { .. } => "remove",
            HistoryAction::TransformMulti { .. } => "transform_multi",
            HistoryAction::ColorChange { .. } => "color_change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

/// Action stack with an undo/redo cursor
#[derive(Debug, Default)]
pub struct History {
    stack: Vec<HistoryAction>,
    /// Number of applied actions; `stack[applied - 1]` is the last applied one
    applied: usize,
}

impl History {
    pub fn actions(&self) -> &[HistoryAction] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Index of the last applied action, -1 when nothing is applied
    pub fn index(&self) -> isize {
        self.applied as isize - 1
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.applied < self.stack.len()
    }

    /// Append an action, returning the redo branch it discarded
    pub fn push(&mut self, action: HistoryAction) -> Vec<HistoryAction> {
        let discarded = self.stack.split_off(self.applied);
        self.stack.push(action);
        self.applied = self.stack.len();
        discarded
    }

    /// Move the cursor back, returning the action to reverse
    pub fn step_back(&mut self) -> Option<&HistoryAction> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.stack.get(self.applied)
    }

    /// Move the cursor forward, returning the action to replay
    pub fn step_forward(&mut self) -> Option<&HistoryAction> {
        if self.applied >= self.stack.len() {
            return None;
        }
        self.applied += 1;
        self.stack.get(self.applied - 1)
    }

    fn references(&self, id: &str) -> bool {
        self.stack.iter().any(|a| a.objects().iter().any(|o| o == id))
    }
}

impl EditorState {
    /// Record an action. Objects only reachable through the discarded redo
    /// branch are dropped from the scene graph.
    pub fn push_action(&mut self, action: HistoryAction) {
        tracing::debug!("History push: {}", action.label());
        let discarded = self.history.push(action);
        if discarded.is_empty() {
            return;
        }

        let orphans: HashSet<ObjectId> = discarded
            .iter()
            .flat_map(|a| a.objects().iter().cloned())
            .filter(|id| !self.graph.is_attached(id) && !self.history.references(id))
            .collect();
        for id in &orphans {
            self.graph.destroy(id);
        }
        tracing::debug!(
            "History branch truncated: {} action(s), {} orphan(s) dropped",
            discarded.len(),
            orphans.len()
        );
    }

    /// Undo last change. No-op at the start of history.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.step_back().cloned() else {
            return false;
        };
        tracing::debug!("Undo: {}", action.label());
        self.apply_action(&action, Direction::Undo);
        true
    }

    /// Redo last undone change. No-op at the end of history.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.step_forward().cloned() else {
            return false;
        };
        tracing::debug!("Redo: {}", action.label());
        self.apply_action(&action, Direction::Redo);
        true
    }

    /// Replay an action in either direction
    pub fn apply_action(&mut self, action: &HistoryAction, direction: Direction) {
        self.dissolve_group();

        match (action, direction) {
            (HistoryAction::Add { object }, Direction::Undo) => {
                self.graph.detach(object);
                self.unlist_object(object);
                self.selection.clear();
            }
            (HistoryAction::Add { object }, Direction::Redo) => {
                self.graph.add_to_root(object);
                self.list_object(object);
                self.selection.replace(std::slice::from_ref(object));
            }
            (HistoryAction::AddBatch { objects }, Direction::Undo)
            | (HistoryAction::Remove { objects }, Direction::Redo) => {
                for id in objects {
                    self.graph.detach(id);
                    self.unlist_object(id);
                }
                self.selection.clear();
            }
            (HistoryAction::AddBatch { objects }, Direction::Redo)
            | (HistoryAction::Remove { objects }, Direction::Undo) => {
                for id in objects {
                    self.graph.add_to_root(id);
                    self.list_object(id);
                }
                self.selection.replace(objects);
            }
            (
                HistoryAction::TransformMulti {
                    objects,
                    before,
                    after,
                },
                direction,
            ) => {
                let data = match direction {
                    Direction::Undo => before,
                    Direction::Redo => after,
                };
                for (id, transform) in objects.iter().zip(data) {
                    self.graph.set_world_transform(id, transform);
                }
                self.selection.replace(objects);
            }
            (
                HistoryAction::ColorChange {
                    objects,
                    before,
                    after,
                },
                direction,
            ) => {
                for (i, id) in objects.iter().enumerate() {
                    let color = match direction {
                        Direction::Undo => before.get(i).copied().unwrap_or(*after),
                        Direction::Redo => *after,
                    };
                    self.set_mesh_color(id, color);
                }
            }
        }

        self.form_group();
        self.sync_gizmo();
        self.notify_refresh();
    }
}
