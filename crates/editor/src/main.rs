use std::io::Read;

use scene_editor_lib::command::execute_json_batch;
use scene_editor_lib::state::{EditorSettings, EditorState};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(script) = read_script(&args) else {
        std::process::exit(1);
    };

    let settings = EditorSettings::load();
    if args.iter().any(|a| a == "--save-settings") {
        settings.save();
    }
    let mut editor = EditorState::new(settings);
    if args.iter().any(|a| a == "--restore") {
        match EditorState::load_autosave() {
            Some(snapshot) => match editor.import_snapshot(&snapshot) {
                Ok(created) => tracing::info!("Restored {} object(s) from autosave", created.len()),
                Err(e) => tracing::warn!("Autosave ignored: {e}"),
            },
            None => tracing::info!("No autosave to restore"),
        }
    }

    match execute_json_batch(&mut editor, &script) {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            tracing::info!("Executed {} command(s), {failed} failed", responses.len());
            match serde_json::to_string_pretty(&responses) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("Failed to serialize responses: {e}"),
            }
            if args.iter().any(|a| a == "--autosave") {
                editor.autosave();
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

/// Read the command batch from `--script <path>`, or stdin when absent
fn read_script(args: &[String]) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--script" && i + 1 < args.len() {
            let path = &args[i + 1];
            return match std::fs::read_to_string(path) {
                Ok(json) => {
                    tracing::info!("Loaded script from {path}");
                    Some(json)
                }
                Err(e) => {
                    tracing::error!("Failed to read script file {path}: {e}");
                    None
                }
            };
        }
        i += 1;
    }

    let mut json = String::new();
    match std::io::stdin().read_to_string(&mut json) {
        Ok(_) => Some(json),
        Err(e) => {
            tracing::error!("Failed to read stdin: {e}");
            None
        }
    }
}
