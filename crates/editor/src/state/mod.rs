//! Editor state
//!
//! [`EditorState`] is the single context every editing operation runs against:
//! scene graph, editable object list, selection, history, gizmo and view flags.

pub mod camera;
pub mod gizmo;
pub mod graph;
pub mod history;
pub mod input;
mod object_ops;
pub mod persistence;
pub mod refresh;
pub mod selection;
pub mod settings;
mod transform_ops;
pub mod view;

use shared::{Color, ObjectId};

pub use camera::{CameraRig, Projection, ViewStep};
pub use gizmo::{GizmoMode, GizmoSpace, GizmoState};
pub use graph::{NodeKind, NodeTransform, Ray, SceneGraph};
pub use history::{Direction, History, HistoryAction};
pub use persistence::ImportError;
pub use refresh::{NullRefresh, UiRefresh};
pub use selection::SelectionState;
pub use settings::EditorSettings;
pub use transform_ops::CapturedTransform;
pub use view::ViewState;

/// Combined editor state
pub struct EditorState {
    /// Scene graph owning every object, including removed ones awaiting undo
    pub graph: SceneGraph,
    /// Editable objects in display order
    objects: Vec<ObjectId>,
    pub selection: SelectionState,
    pub history: History,
    pub gizmo: GizmoState,
    pub view: ViewState,
    pub camera: CameraRig,
    pub settings: EditorSettings,
    /// World transforms captured when a gizmo drag started
    drag_start: Option<Vec<CapturedTransform>>,
    refresh: Box<dyn UiRefresh>,
    /// Monotonically increasing counter, bumped on every UI notification
    version: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            graph: SceneGraph::default(),
            objects: Vec::new(),
            selection: SelectionState::default(),
            history: History::default(),
            gizmo: GizmoState::new(&settings),
            view: ViewState::default(),
            camera: CameraRig::new(&settings.camera),
            settings,
            drag_start: None,
            refresh: Box::new(NullRefresh),
            version: 0,
        }
    }

    /// Replace the UI refresh collaborator
    pub fn with_refresh(mut self, refresh: Box<dyn UiRefresh>) -> Self {
        self.set_refresh(refresh);
        self
    }

    pub fn set_refresh(&mut self, refresh: Box<dyn UiRefresh>) {
        self.refresh = refresh;
    }

    /// Editable objects in display order
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn is_listed(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o == id)
    }

    /// Current state version (increments on every UI notification)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Stored color of a mesh (not the displayed one)
    pub fn color_of(&self, id: &str) -> Option<Color> {
        self.graph.get(id)?.color()
    }

    /// World transform of an object
    pub fn world_transform(&self, id: &str) -> Option<NodeTransform> {
        self.graph.world_transform(id)
    }

    /// Tell the tree and property panel to redraw
    pub fn notify_refresh(&mut self) {
        self.version += 1;
        self.refresh.refresh_tree(&self.objects, self.selection.all());
        self.refresh.refresh_properties(self.selection.all());
    }

    /// Append to the object list unless already present
    fn list_object(&mut self, id: &str) {
        if !self.is_listed(id) {
            self.objects.push(id.to_string());
        }
    }

    /// Drop from the object list and, in the same step, from the selection
    fn unlist_object(&mut self, id: &str) {
        self.objects.retain(|o| o != id);
        self.selection.remove(id);
    }
}
