// Library crate: the editing core plus the JSON command protocol used by the
// CLI, the integration tests and the browser bindings.

pub mod command;
pub mod state;

pub use state::EditorState;
