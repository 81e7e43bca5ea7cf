use wasm_bindgen::prelude::*;

use scene_editor_lib::command::{execute_json, execute_json_batch};
use scene_editor_lib::state::{EditorState, UiRefresh};
use shared::ObjectId;

/// Forwards refresh notifications to a JS callback as `(kind, payload_json)`
struct JsRefresh {
    callback: js_sys::Function,
}

impl JsRefresh {
    fn emit(&self, kind: &str, payload: serde_json::Value) {
        let result = self.callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(kind),
            &JsValue::from_str(&payload.to_string()),
        );
        if let Err(e) = result {
            web_sys::console::error_2(&JsValue::from_str("refresh callback failed:"), &e);
        }
    }
}

impl UiRefresh for JsRefresh {
    fn refresh_tree(&mut self, objects: &[ObjectId], selected: &[ObjectId]) {
        self.emit(
            "tree",
            serde_json::json!({ "objects": objects, "selected": selected }),
        );
    }

    fn refresh_properties(&mut self, selected: &[ObjectId]) {
        self.emit("properties", serde_json::json!({ "selected": selected }));
    }
}

/// Editor instance owned by the page
#[wasm_bindgen]
pub struct WasmEditor {
    editor: EditorState,
}

#[wasm_bindgen]
impl WasmEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmEditor {
        WasmEditor {
            editor: EditorState::default(),
        }
    }

    /// Register `callback(kind, payloadJson)` called after every state change
    #[wasm_bindgen(js_name = onRefresh)]
    pub fn on_refresh(&mut self, callback: js_sys::Function) {
        self.editor.set_refresh(Box::new(JsRefresh { callback }));
    }

    /// Execute one JSON command and return the JSON response
    pub fn execute(&mut self, command_json: &str) -> Result<String, JsError> {
        let response = execute_json(&mut self.editor, command_json).map_err(|e| JsError::new(&e))?;
        if let Some(error) = &response.error {
            web_sys::console::warn_1(&JsValue::from_str(error));
        }
        serde_json::to_string(&response).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Execute a JSON array of commands and return the JSON array of responses
    #[wasm_bindgen(js_name = executeBatch)]
    pub fn execute_batch(&mut self, commands_json: &str) -> Result<String, JsError> {
        let responses =
            execute_json_batch(&mut self.editor, commands_json).map_err(|e| JsError::new(&e))?;
        serde_json::to_string(&responses).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Current state version, bumped on every UI notification
    pub fn version(&self) -> f64 {
        self.editor.version() as f64
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}
