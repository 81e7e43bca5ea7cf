//! JSON command protocol.
//!
//! Lets scripts, tests and the browser bindings drive the editor without a UI.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::{ObjectId, PrimitiveKind, SceneSnapshot};

use crate::state::camera::ViewStep;
use crate::state::gizmo::GizmoMode;
use crate::state::graph::Ray;
use crate::state::input::{Key, Modifiers};
use crate::state::EditorState;

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Spawn a primitive and select it
    Add {
        primitive: PrimitiveKind,
        #[serde(default)]
        position: Option<[f64; 3]>,
    },
    /// Replace (or toggle, with `append`) the selection
    Select {
        ids: Vec<ObjectId>,
        #[serde(default)]
        append: bool,
    },
    ClearSelection,
    SelectAll,
    /// Remove the selected objects
    Remove,
    /// Duplicate the selected objects
    Duplicate,
    Undo,
    Redo,
    /// Gizmo drag start
    BeginDrag,
    /// One pointer-move frame of a gizmo drag
    Drag { delta: [f64; 3] },
    /// Gizmo drag end
    EndDrag,
    /// Recolor the selection
    SetColor { color: ColorValue },
    /// Pointer release over the viewport
    Click {
        origin: [f64; 3],
        direction: [f64; 3],
        #[serde(default)]
        append: bool,
        #[serde(default)]
        moved_px: f64,
    },
    /// Keyboard shortcut
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    SetMode { mode: GizmoMode },
    ToggleColors { active: bool },
    ToggleWireframes { active: bool },
    ToggleSpace { local: bool },
    ToggleSnap { active: bool },
    ToggleProjection,
    /// Look at the origin from a direction (view-cube face)
    ViewFrom {
        direction: [f64; 3],
        #[serde(default)]
        up: Option<[f64; 3]>,
    },
    /// Quarter-turn the view (view-cube arrows)
    StepView { step: ViewStep },
    /// Move an object within the object list
    Reorder { id: ObjectId, index: usize },
    Rename { id: ObjectId, name: String },
    /// Frame the camera on the selection
    Focus,
    /// List objects, selection and history cursor
    Inspect,
    /// Export the scene as JSON
    ExportScene,
    /// Import a scene document (all-or-nothing)
    ImportScene { scene: SceneSnapshot },
}

/// Color given either packed (`16711680`) or as a hex string (`"#ff0000"`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Packed(u32),
    Hex(String),
}

impl ColorValue {
    /// Packed 0xRRGGBB value, or None when malformed or out of range
    pub fn resolve(&self) -> Option<shared::Color> {
        match self {
            ColorValue::Packed(c) => (*c <= shared::MAX_COLOR).then_some(*c),
            ColorValue::Hex(text) => shared::color_from_hex(text),
        }
    }
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn inspect(editor: &EditorState) -> serde_json::Value {
    let objects: Vec<serde_json::Value> = editor
        .objects()
        .iter()
        .filter_map(|id| {
            let node = editor.graph.get(id)?;
            let world = editor.world_transform(id)?;
            Some(serde_json::json!({
                "id": id,
                "name": node.name,
                "primitive": node.primitive(),
                "color": node.color().map(shared::color_to_hex),
                "display_color": editor.display_color(id).map(shared::color_to_hex),
                "position": world.position.to_array(),
                "rotation": world.rotation.to_array(),
                "scale": world.scale.to_array(),
            }))
        })
        .collect();
    serde_json::json!({
        "object_count": objects.len(),
        "objects": objects,
        "selected": editor.selection.all(),
        "grouped": editor.selection.group().is_some(),
        "gizmo": {
            "attached": editor.gizmo.attached,
            "mode": editor.gizmo.mode,
            "space": editor.gizmo.space,
        },
        "history": {
            "length": editor.history.len(),
            "index": editor.history.index(),
            "can_undo": editor.history.can_undo(),
            "can_redo": editor.history.can_redo(),
        },
        "camera": {
            "projection": editor.camera.projection,
            "position": editor.camera.position.to_array(),
            "target": editor.camera.target.to_array(),
            "up": editor.camera.up.to_array(),
        },
    })
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut EditorState, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::Add {
            primitive,
            position,
        } => {
            let id = match position {
                Some(p) => editor.add_primitive_at(primitive, DVec3::from_array(p)),
                None => editor.add_primitive(primitive),
            };
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::Select { ids, append } => {
            editor.set_selection(&ids, append);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": editor.selection.all() }))
        }

        EditorCommand::ClearSelection => {
            editor.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::SelectAll => {
            editor.select_all();
            CommandResponse::ok_with_data(serde_json::json!({ "selected": editor.selection.all() }))
        }

        EditorCommand::Remove => {
            let removed = editor.remove_selection();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Duplicate => {
            let created = editor.duplicate_selection();
            CommandResponse::ok_with_data(serde_json::json!({ "created": created }))
        }

        EditorCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = editor.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::BeginDrag => {
            editor.begin_transform_capture();
            CommandResponse::ok_with_data(serde_json::json!({ "capturing": editor.is_capturing() }))
        }

        EditorCommand::Drag { delta } => {
            editor.drag_gizmo(DVec3::from_array(delta));
            CommandResponse::ok()
        }

        EditorCommand::EndDrag => {
            let before = editor.history.len();
            editor.commit_transform_capture();
            CommandResponse::ok_with_data(
                serde_json::json!({ "committed": editor.history.len() > before }),
            )
        }

        EditorCommand::SetColor { color } => {
            let Some(color) = color.resolve() else {
                return CommandResponse::err(format!("Invalid color: {color:?}"));
            };
            let changed = editor.set_selection_color(color);
            CommandResponse::ok_with_data(serde_json::json!({ "changed": changed }))
        }

        EditorCommand::Click {
            origin,
            direction,
            append,
            moved_px,
        } => {
            let ray = Ray::new(DVec3::from_array(origin), DVec3::from_array(direction));
            let handled = editor.pointer_click(&ray, append, moved_px);
            CommandResponse::ok_with_data(serde_json::json!({
                "handled": handled,
                "selected": editor.selection.all(),
            }))
        }

        EditorCommand::Key { key, modifiers } => {
            let handled = editor.handle_shortcut(key, modifiers);
            CommandResponse::ok_with_data(serde_json::json!({ "handled": handled }))
        }

        EditorCommand::SetMode { mode } => {
            editor.set_gizmo_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::ToggleColors { active } => {
            editor.toggle_colors(active);
            CommandResponse::ok()
        }

        EditorCommand::ToggleWireframes { active } => {
            editor.toggle_wireframes(active);
            CommandResponse::ok()
        }

        EditorCommand::ToggleSpace { local } => {
            editor.toggle_space(local);
            CommandResponse::ok()
        }

        EditorCommand::ToggleSnap { active } => {
            editor.toggle_snap(active);
            CommandResponse::ok()
        }

        EditorCommand::ToggleProjection => {
            let projection = editor.toggle_projection();
            CommandResponse::ok_with_data(serde_json::json!({ "projection": projection }))
        }

        EditorCommand::ViewFrom { direction, up } => {
            editor.view_from(DVec3::from_array(direction), up.map(DVec3::from_array));
            CommandResponse::ok()
        }

        EditorCommand::StepView { step } => {
            editor.step_view(step);
            CommandResponse::ok()
        }

        EditorCommand::Reorder { id, index } => {
            if editor.move_in_list(&id, index) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Object '{id}' not found"))
            }
        }

        EditorCommand::Rename { id, name } => {
            if editor.rename(&id, name) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Object '{id}' not found"))
            }
        }

        EditorCommand::Focus => {
            let framed = editor.focus_selection();
            CommandResponse::ok_with_data(serde_json::json!({ "framed": framed }))
        }

        EditorCommand::Inspect => CommandResponse::ok_with_data(inspect(editor)),

        EditorCommand::ExportScene => {
            let json = editor.export_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }

        EditorCommand::ImportScene { scene } => match editor.import_snapshot(&scene) {
            Ok(created) => CommandResponse::ok_with_data(serde_json::json!({ "created": created })),
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut EditorState, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    editor: &mut EditorState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
