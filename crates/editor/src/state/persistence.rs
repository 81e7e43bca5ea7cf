//! Scene import/export and autosave
//!
//! Import is all-or-nothing: every descriptor is validated before the scene
//! is touched.

use shared::{ObjectDescriptor, ObjectId, SceneSnapshot, Transform, MAX_COLOR};

use super::graph::NodeTransform;
use super::history::HistoryAction;
use super::EditorState;

/// Reasons an import is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Input is not a valid scene document
    Parse(String),
    /// Transform contains NaN or infinity
    NonFiniteTransform { index: usize },
    /// A scale component is zero, which cannot be inverted
    DegenerateScale { index: usize },
    /// Rotation quaternion has zero length
    InvalidRotation { index: usize },
    /// Color does not fit in 0xRRGGBB
    InvalidColor { index: usize, color: u32 },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ImportError::NonFiniteTransform { index } => {
                write!(f, "Object #{}: transform is not finite", index)
            }
            ImportError::DegenerateScale { index } => {
                write!(f, "Object #{}: scale has a zero component", index)
            }
            ImportError::InvalidRotation { index } => {
                write!(f, "Object #{}: rotation quaternion has zero length", index)
            }
            ImportError::InvalidColor { index, color } => {
                write!(f, "Object #{}: color {:#x} out of range", index, color)
            }
        }
    }
}

impl std::error::Error for ImportError {}

fn validate(index: usize, d: &ObjectDescriptor) -> Result<(), ImportError> {
    let t = &d.transform;
    if !t.is_finite() {
        return Err(ImportError::NonFiniteTransform { index });
    }
    if t.scale.iter().any(|s| *s == 0.0) {
        return Err(ImportError::DegenerateScale { index });
    }
    if t.rotation.iter().map(|c| c * c).sum::<f64>() < 1e-12 {
        return Err(ImportError::InvalidRotation { index });
    }
    if d.color > MAX_COLOR {
        return Err(ImportError::InvalidColor {
            index,
            color: d.color,
        });
    }
    Ok(())
}

impl EditorState {
    /// Describe every editable object in list order, in world space
    pub fn export_snapshot(&self) -> SceneSnapshot {
        let objects = self
            .objects
            .iter()
            .filter_map(|id| {
                let node = self.graph.get(id)?;
                let world = self.graph.world_transform(id)?;
                Some(ObjectDescriptor {
                    name: node.name.clone(),
                    primitive: node.primitive()?,
                    color: node.color()?,
                    transform: Transform::from(&world),
                })
            })
            .collect();
        SceneSnapshot {
            objects,
            ..SceneSnapshot::default()
        }
    }

    /// Export the current scene as JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.export_snapshot()).unwrap_or_default()
    }

    /// Add every object of the snapshot as one undoable step and frame them.
    ///
    /// Nothing is added if any descriptor is invalid.
    pub fn import_snapshot(&mut self, snapshot: &SceneSnapshot) -> Result<Vec<ObjectId>, ImportError> {
        if let Err(e) = snapshot
            .objects
            .iter()
            .enumerate()
            .try_for_each(|(i, d)| validate(i, d))
        {
            tracing::warn!("Import rejected: {e}");
            return Err(e);
        }

        self.dissolve_group();
        let created: Vec<ObjectId> = snapshot
            .objects
            .iter()
            .map(|d| {
                self.spawn_object(
                    d.name.clone(),
                    d.primitive,
                    d.color,
                    NodeTransform::from(&d.transform),
                )
            })
            .collect();
        tracing::info!("Imported {} object(s)", created.len());

        if !created.is_empty() {
            self.push_action(HistoryAction::AddBatch {
                objects: created.clone(),
            });
            self.focus_on(&created);
        }
        self.clear_selection();
        Ok(created)
    }

    /// Parse a JSON scene document and import it
    pub fn import_json(&mut self, json: &str) -> Result<Vec<ObjectId>, ImportError> {
        let snapshot: SceneSnapshot = serde_json::from_str(json).map_err(|e| {
            tracing::warn!("Import rejected: {e}");
            ImportError::Parse(e.to_string())
        })?;
        self.import_snapshot(&snapshot)
    }

    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save scene to autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, self.export_json()) {
            tracing::warn!("Autosave to {} failed: {e}", path.display());
        }
    }

    /// Load scene from autosave file
    pub fn load_autosave() -> Option<SceneSnapshot> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }
}
