use std::path::Path;

use glam::Vec3;
use serde_json::Value;

use crate::scene_graph::{Face, Scene};
use crate::scene_loader::description::{lowercase_keys, ObjectDescription, SceneDescription};

#[derive(Debug, thiserror::Error)]
pub enum SceneLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a scene, logging and returning an empty scene on any failure.
pub fn load_scene_or_empty(path: impl AsRef<Path>) -> Scene {
    let path = path.as_ref();

    match load_scene(path) {
        Ok(scene) => {
            log::info!(
                "Loaded scene {} with {} objects and {} faces",
                path.display(),
                scene.object_count(),
                scene.face_count()
            );
            scene
        }
        Err(error) => {
            log::error!("Failed to load scene, continuing with an empty one: {error}");
            Scene::new()
        }
    }
}

pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, SceneLoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SceneLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_scene(&source)
}

pub fn parse_scene(source: &str) -> Result<Scene, SceneLoadError> {
    let value: Value = serde_json::from_str(source)?;
    let description: SceneDescription = serde_json::from_value(lowercase_keys(value))?;

    Ok(build_scene(description))
}

fn build_scene(description: SceneDescription) -> Scene {
    let mut scene = Scene::new();

    for object in description.objects {
        add_object(&mut scene, object);
    }

    scene
}

/// Parts with invalid geometry are skipped, the rest of the object is kept.
fn add_object(scene: &mut Scene, object: ObjectDescription) {
    let position = object
        .position
        .as_ref()
        .and_then(parse_position)
        .unwrap_or_else(|| {
            if object.position.is_some() {
                log::debug!("Ignoring malformed position of object '{}'", object.name);
            }
            Vec3::ZERO
        });

    let object_id = scene.add_object(object.name.clone(), position);

    for part in object.parts {
        let color = parse_color(&part.color, &part.name);
        let vertices = part
            .vertices
            .iter()
            .map(|vertex| Vec3::new(vertex.x, vertex.y, vertex.z))
            .collect();

        let face = match Face::new(vertices, part.indices, color) {
            Ok(face) => face,
            Err(error) => {
                log::warn!(
                    "Skipping part '{}' of object '{}': {error}",
                    part.name,
                    object.name
                );
                continue;
            }
        };

        let part_id = scene.add_part(object_id, part.name, color);
        scene.add_face(part_id, face);
    }
}

/// Exactly three numbers, otherwise `None`.
fn parse_position(value: &Value) -> Option<Vec3> {
    let components = value.as_array()?;
    if components.len() != 3 {
        return None;
    }

    let mut position = [0.0; 3];
    for (slot, component) in position.iter_mut().zip(components) {
        *slot = component.as_f64()? as f32;
    }

    Some(Vec3::from_array(position))
}

fn parse_color(components: &[f32], part_name: &str) -> Vec3 {
    if components.len() < 3 {
        log::warn!(
            "Part '{part_name}' declares {} colour components, padding with zero",
            components.len()
        );
    }

    let component = |index: usize| components.get(index).copied().unwrap_or(0.0);
    Vec3::new(component(0), component(1), component(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = r#"{
        "objects": [
            {
                "name": "Letter",
                "position": [1.0, 2.0, 3.0],
                "parts": [
                    {
                        "name": "stem",
                        "color": [1.0, 0.5, 0.25, 1.0],
                        "vertices": [
                            { "x": 0.0, "y": 0.0, "z": 0.0 },
                            { "x": 1.0, "y": 0.0, "z": 0.0 },
                            { "x": 0.0, "y": 1.0, "z": 0.0 }
                        ],
                        "indices": [0, 1, 2]
                    }
                ]
            },
            {
                "Name": "Shouty",
                "POSITION": [0, 0],
                "Parts": [
                    {
                        "NAME": "base",
                        "Color": [0.0, 1.0, 0.0],
                        "Vertices": [
                            { "X": 0.0, "Y": 0.0, "Z": 0.0 },
                            { "X": 1.0, "Y": 0.0, "Z": 0.0 },
                            { "X": 1.0, "Y": 1.0, "Z": 0.0 },
                            { "X": 0.0, "Y": 1.0, "Z": 0.0 }
                        ],
                        "Indices": [0, 1, 2, 0, 2, 3]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn builds_objects_parts_and_faces_in_order() {
        let scene = parse_scene(TWO_OBJECTS).unwrap();

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.face_count(), 2);

        let letter = scene.object(0).unwrap();
        assert_eq!(scene.node(letter).unwrap().name, "Letter");
        assert_eq!(
            scene.transform(letter).unwrap().translation(),
            Vec3::new(1.0, 2.0, 3.0)
        );

        let stem = scene.part(letter, 0).unwrap();
        assert_eq!(scene.node(stem).unwrap().name, "stem");
        let face_id = scene.faces(stem)[0];
        let face = scene.node(face_id).unwrap().face().unwrap();
        assert_eq!(face.color(), Vec3::new(1.0, 0.5, 0.25));
        assert_eq!(face.indices(), &[0, 1, 2]);
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let scene = parse_scene(TWO_OBJECTS).unwrap();
        let shouty = scene.object(1).unwrap();
        assert_eq!(scene.node(shouty).unwrap().name, "Shouty");
        let base = scene.part(shouty, 0).unwrap();
        let face = scene.node(scene.faces(base)[0]).unwrap().face().unwrap();

        assert_eq!(face.vertices().len(), 4);
        assert_eq!(face.triangle_count(), 2);
    }

    #[test]
    fn short_position_defaults_to_origin() {
        let scene = parse_scene(TWO_OBJECTS).unwrap();
        let shouty = scene.object(1).unwrap();

        assert_eq!(scene.transform(shouty).unwrap().translation(), Vec3::ZERO);
    }

    #[test]
    fn non_numeric_position_defaults_to_origin() {
        let scene =
            parse_scene(r#"{ "objects": [ { "name": "a", "position": ["x", 1, 2], "parts": [] } ] }"#)
                .unwrap();

        assert_eq!(
            scene.transform(scene.object(0).unwrap()).unwrap().translation(),
            Vec3::ZERO
        );
    }

    #[test]
    fn zero_objects_is_an_empty_scene() {
        let scene = parse_scene(r#"{ "objects": [] }"#).unwrap();
        assert_eq!(scene.object_count(), 0);

        let scene = parse_scene("{}").unwrap();
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn short_color_is_padded() {
        let scene = parse_scene(
            r#"{ "objects": [ { "name": "a", "parts": [ { "name": "p", "color": [0.5] } ] } ] }"#,
        )
        .unwrap();
        let object = scene.object(0).unwrap();
        let part = scene.part(object, 0).unwrap();
        let face = scene.node(scene.faces(part)[0]).unwrap().face().unwrap();

        assert_eq!(face.color(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn invalid_part_is_skipped() {
        let scene = parse_scene(
            r#"{ "objects": [
                { "name": "good", "parts": [
                    { "name": "tri", "color": [1, 1, 1],
                      "vertices": [ { "x": 0, "y": 0, "z": 0 }, { "x": 1, "y": 0, "z": 0 },
                                    { "x": 0, "y": 1, "z": 0 } ],
                      "indices": [0, 1, 2] } ] },
                { "name": "broken", "parts": [
                    { "name": "bad", "color": [1, 1, 1],
                      "vertices": [ { "x": 0, "y": 0, "z": 0 } ],
                      "indices": [0, 0, 5] },
                    { "name": "short", "color": [1, 1, 1],
                      "vertices": [ { "x": 0, "y": 0, "z": 0 } ],
                      "indices": [0, 0] },
                    { "name": "empty", "color": [0, 0, 1] } ] } ] }"#,
        )
        .unwrap();

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.face_count(), 2);

        let good = scene.object(0).unwrap();
        assert_eq!(scene.parts(good).len(), 1);

        let broken = scene.object(1).unwrap();
        let parts = scene.parts(broken);
        assert_eq!(parts.len(), 1);
        assert_eq!(scene.node(parts[0]).unwrap().name, "empty");
    }

    #[test]
    fn missing_vertex_coordinates_default_to_zero() {
        let scene = parse_scene(
            r#"{ "objects": [ { "name": "a", "parts": [
                { "name": "p", "color": [1, 1, 1],
                  "vertices": [ { "x": 1 }, { "y": 2 }, { "x": 3, "z": 4 } ],
                  "indices": [0, 1, 2] } ] } ] }"#,
        )
        .unwrap();
        let object = scene.object(0).unwrap();
        let part = scene.part(object, 0).unwrap();
        let face = scene.node(scene.faces(part)[0]).unwrap().face().unwrap();

        assert_eq!(
            face.vertices(),
            &[
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(3.0, 0.0, 4.0)
            ]
        );
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            parse_scene("{ \"objects\": [ "),
            Err(SceneLoadError::Json(_))
        ));
        assert!(matches!(
            parse_scene(r#"{ "objects": [ { "parts": [ { "indices": [-1] } ] } ] }"#),
            Err(SceneLoadError::Json(_))
        ));
    }

    #[test]
    fn unreadable_file_yields_empty_scene() {
        let path = std::env::temp_dir().join("sceneview-missing-scene.json");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(load_scene(&path), Err(SceneLoadError::Io { .. })));
        assert_eq!(load_scene_or_empty(&path).object_count(), 0);
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("sceneview-scene-{}.json", std::process::id()));
        std::fs::write(&path, TWO_OBJECTS).unwrap();

        let scene = load_scene_or_empty(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(scene.object_count(), 2);
    }

    #[test]
    fn malformed_file_yields_empty_scene() {
        let path = std::env::temp_dir().join(format!("sceneview-bad-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();

        let scene = load_scene_or_empty(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(scene.object_count(), 0);
    }
}
