//! Transform capture around a gizmo drag
//!
//! One drag gesture produces exactly one `TransformMulti` entry, whatever
//! the number of pointer-move frames in between.

use shared::ObjectId;

use super::graph::NodeTransform;
use super::history::HistoryAction;
use super::EditorState;

/// World transform of one object, keyed by its ID
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedTransform {
    pub id: ObjectId,
    pub transform: NodeTransform,
}

impl EditorState {
    /// Snapshot world transforms of the selection at drag start.
    /// Does nothing on an empty selection.
    pub fn begin_transform_capture(&mut self) {
        if self.selection.is_empty() {
            self.drag_start = None;
            return;
        }
        let captured = self.capture_selection();
        tracing::debug!("Drag start: {} object(s) captured", captured.len());
        self.drag_start = Some(captured);
        self.gizmo.dragging = true;
    }

    /// Snapshot again at drag end and record the gesture as one history entry.
    /// Does nothing without a matching [`begin_transform_capture`](Self::begin_transform_capture).
    pub fn commit_transform_capture(&mut self) {
        self.gizmo.dragging = false;
        let Some(start) = self.drag_start.take() else {
            return;
        };

        let after = self.capture_selection();
        if after.is_empty() {
            return;
        }

        // Align by identity: an object missing from the start snapshot did not move
        let before: Vec<NodeTransform> = after
            .iter()
            .map(|a| {
                start
                    .iter()
                    .find(|s| s.id == a.id)
                    .map_or(a.transform, |s| s.transform)
            })
            .collect();
        let (objects, after): (Vec<ObjectId>, Vec<NodeTransform>) =
            after.into_iter().map(|c| (c.id, c.transform)).unzip();

        self.push_action(HistoryAction::TransformMulti {
            objects,
            before,
            after,
        });
        self.notify_refresh();
    }

    /// True between drag start and drag end
    pub fn is_capturing(&self) -> bool {
        self.drag_start.is_some()
    }

    /// World transforms of the selection, read through the current parent
    fn capture_selection(&self) -> Vec<CapturedTransform> {
        self.selection
            .all()
            .iter()
            .filter_map(|id| {
                self.graph.world_transform(id).map(|transform| CapturedTransform {
                    id: id.clone(),
                    transform,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use shared::PrimitiveKind;

    use super::*;
    use crate::state::gizmo::GizmoMode;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_commit_without_begin_is_noop() {
        let mut e = EditorState::default();
        e.add_primitive(PrimitiveKind::Cube);
        let len = e.history.len();
        e.commit_transform_capture();
        assert_eq!(e.history.len(), len);
    }

    #[test]
    fn test_begin_on_empty_selection_is_noop() {
        let mut e = EditorState::default();
        e.add_primitive(PrimitiveKind::Cube);
        e.clear_selection();
        e.begin_transform_capture();
        assert!(!e.is_capturing());
        e.commit_transform_capture();
        assert_eq!(e.history.len(), 1);
    }

    #[test]
    fn test_one_entry_per_gesture() {
        let mut e = EditorState::default();
        let id = e.add_primitive(PrimitiveKind::Cube);
        e.gizmo.mode = GizmoMode::Translate;

        e.begin_transform_capture();
        for _ in 0..10 {
            e.drag_gizmo(DVec3::new(0.2, 0.0, 0.0));
        }
        e.commit_transform_capture();

        assert_eq!(e.history.len(), 2);
        match e.history.actions().last() {
            Some(HistoryAction::TransformMulti {
                objects,
                before,
                after,
            }) => {
                assert_eq!(objects, &vec![id]);
                assert!(before[0].position.abs_diff_eq(DVec3::new(0.0, 0.5, 0.0), EPS));
                assert!(after[0].position.abs_diff_eq(DVec3::new(2.0, 0.5, 0.0), 1e-6));
            }
            other => panic!("Expected TransformMulti, got {other:?}"),
        }
    }

    #[test]
    fn test_capture_reads_world_through_group() {
        let mut e = EditorState::default();
        let a = e.add_primitive_at(PrimitiveKind::Cube, DVec3::new(1.0, 0.0, 0.0));
        let b = e.add_primitive_at(PrimitiveKind::Cube, DVec3::new(3.0, 0.0, 0.0));
        e.set_selection(&[a.clone(), b.clone()], false);

        e.begin_transform_capture();
        e.drag_gizmo(DVec3::new(0.0, 0.0, 1.0));
        e.commit_transform_capture();

        let Some(HistoryAction::TransformMulti { before, after, .. }) = e.history.actions().last() else {
            panic!("Expected TransformMulti");
        };
        assert!(before[0].position.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), EPS));
        assert!(before[1].position.abs_diff_eq(DVec3::new(3.0, 0.0, 0.0), EPS));
        assert!(after[0].position.abs_diff_eq(DVec3::new(1.0, 0.0, 1.0), EPS));
        assert!(after[1].position.abs_diff_eq(DVec3::new(3.0, 0.0, 1.0), EPS));
    }
}
