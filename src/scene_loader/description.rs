use serde::Deserialize;
use serde_json::Value;

/// On-disk scene description. Keys are matched case-insensitively by the
/// loader before this is deserialized.
#[derive(Debug, Default, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectDescription {
    #[serde(default)]
    pub name: String,
    /// Kept untyped so a malformed position falls back to the origin instead
    /// of rejecting the whole document.
    #[serde(default)]
    pub position: Option<Value>,
    #[serde(default)]
    pub parts: Vec<PartDescription>,
}

#[derive(Debug, Deserialize)]
pub struct PartDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Vec<f32>,
    #[serde(default)]
    pub vertices: Vec<VertexDescription>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

/// Missing coordinates are zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VertexDescription {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// Lowercases every object key, recursively.
pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
