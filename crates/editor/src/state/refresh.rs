//! UI refresh notifications
//!
//! The object tree and the property panel live outside the core. They are
//! told to redraw after every state-changing operation.

use shared::ObjectId;

pub trait UiRefresh {
    /// Object list changed (membership, order, names or highlighted rows)
    fn refresh_tree(&mut self, objects: &[ObjectId], selected: &[ObjectId]);

    /// Property panel should show the current selection
    fn refresh_properties(&mut self, selected: &[ObjectId]);
}

/// Refresh sink for headless use
#[derive(Debug, Default)]
pub struct NullRefresh;

impl UiRefresh for NullRefresh {
    fn refresh_tree(&mut self, _objects: &[ObjectId], _selected: &[ObjectId]) {}

    fn refresh_properties(&mut self, _selected: &[ObjectId]) {}
}
