use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Packed 0xRRGGBB color
pub type Color = u32;

/// Largest valid packed color
pub const MAX_COLOR: Color = 0xFF_FF_FF;

/// Primitive shape of an editable object.
///
/// Every kind is modelled as a unit shape (1x1x1 bounding box); size comes
/// from the object's scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Cube,
    Triangle,
    Cylinder,
    Sphere,
    Cone,
    Plane,
    Ring,
}

impl PrimitiveKind {
    /// Default object name for a freshly spawned primitive
    pub fn base_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "cube",
            PrimitiveKind::Triangle => "triangle",
            PrimitiveKind::Cylinder => "cylindre",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cone => "cone",
            PrimitiveKind::Plane => "plane",
            PrimitiveKind::Ring => "ring",
        }
    }

    /// Flat kinds have no thickness along their local Z axis
    pub fn is_planar(&self) -> bool {
        matches!(self, PrimitiveKind::Plane | PrimitiveKind::Ring)
    }
}

/// World transform of an object: position, rotation quaternion (x, y, z, w), scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 4],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Identity rotation and unit scale at the given position
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// True if every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.rotation.iter().all(|v| v.is_finite())
            && self.scale.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable description of one editable object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub name: String,
    pub primitive: PrimitiveKind,
    pub color: Color,
    #[serde(default)]
    pub transform: Transform,
}

fn default_version() -> u32 {
    1
}

/// Whole editable scene, in object-list order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub objects: Vec<ObjectDescriptor>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            version: default_version(),
            objects: Vec::new(),
        }
    }
}

/// Format a packed color as `#rrggbb`
pub fn color_to_hex(color: Color) -> String {
    format!("#{:06x}", color & MAX_COLOR)
}

/// Parse `#rrggbb`, `0xrrggbb` or `rrggbb`
pub fn color_from_hex(text: &str) -> Option<Color> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if digits.len() != 6 {
        return None;
    }
    Color::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(t.scale, [1.0, 1.0, 1.0]);
        assert!(t.is_finite());
    }

    #[test]
    fn test_transform_not_finite() {
        let mut t = Transform::at([1.0, 2.0, 3.0]);
        t.scale[1] = f64::NAN;
        assert!(!t.is_finite());
    }

    #[test]
    fn test_primitive_serde_snake_case() {
        let json = serde_json::to_string(&PrimitiveKind::Cylinder).unwrap();
        assert_eq!(json, "\"cylinder\"");
        let kind: PrimitiveKind = serde_json::from_str("\"ring\"").unwrap();
        assert_eq!(kind, PrimitiveKind::Ring);
    }

    #[test]
    fn test_snapshot_version_defaults() {
        let snap: SceneSnapshot = serde_json::from_str(r#"{"objects": []}"#).unwrap();
        assert_eq!(snap.version, 1);
        assert!(snap.objects.is_empty());
    }

    #[test]
    fn test_descriptor_transform_defaults() {
        let json = r#"{"name": "c", "primitive": "cube", "color": 255}"#;
        let d: ObjectDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.transform, Transform::new());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(color_to_hex(0xff8000), "#ff8000");
        assert_eq!(color_from_hex("#ff8000"), Some(0xff8000));
        assert_eq!(color_from_hex("0x00ff00"), Some(0x00ff00));
        assert_eq!(color_from_hex("abc"), None);
        assert_eq!(color_from_hex("#zzzzzz"), None);
    }
}
