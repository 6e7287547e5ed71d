use glam::Vec3;

use crate::input::Controls;
use crate::scene_graph::{NodeId, NodeKind, Scene};
use crate::viewer::ViewerState;

fn format_vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

fn transform_lines(scene: &Scene, id: NodeId) -> Vec<String> {
    let Some(transform) = scene.transform(id) else {
        return Vec::new();
    };

    if transform.is_identity() {
        return vec!["Transform: identity".to_string()];
    }

    vec![
        format!("Scale: {}", format_vec3(transform.scale())),
        format!("Rotation: {}", format_vec3(transform.rotation())),
        format!("Translation: {}", format_vec3(transform.translation())),
    ]
}

/// Debug window with the current selection, camera and key bindings.
pub fn draw(ui: &imgui::Ui, state: &ViewerState, controls: &Controls) {
    if !state.show_overlay {
        return;
    }

    let scene = &state.scene;
    let target = state.selection.target(scene);

    ui.window("Scene")
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .size([320.0, 460.0], imgui::Condition::FirstUseEver)
        .build(|| {
            ui.text(format!("Selected: {}", state.selection.describe(scene)));
            for line in transform_lines(scene, target) {
                ui.text(line);
            }
            ui.separator();

            ui.text(format!("Camera: {}", format_vec3(state.camera.position())));
            ui.text(format!("Looking: {}", format_vec3(state.camera.front())));
            ui.text(format!(
                "Yaw {:.1}  Pitch {:.1}",
                state.camera.yaw(),
                state.camera.pitch()
            ));
            ui.text(format!("Frame time: {:.2} ms", 1000.0 / ui.io().framerate));
            ui.separator();

            ui.text(format!(
                "{} objects, {} faces",
                scene.object_count(),
                scene.face_count()
            ));
            for (object_index, &object_id) in scene.objects().iter().enumerate() {
                let Some(object) = scene.node(object_id) else {
                    continue;
                };
                let color = if object_id == target {
                    [1.0, 1.0, 0.0, 1.0]
                } else {
                    [1.0, 1.0, 1.0, 1.0]
                };
                ui.text_colored(color, format!("[{object_index}] {}", object.name));

                for (part_index, &part_id) in scene.parts(object_id).iter().enumerate() {
                    let Some(part) = scene.node(part_id) else {
                        continue;
                    };
                    let color = if part_id == target {
                        [1.0, 1.0, 0.0, 1.0]
                    } else {
                        [0.7, 0.7, 0.7, 1.0]
                    };
                    ui.text_colored(
                        color,
                        format!(
                            "    [{part_index}] {} ({} faces)",
                            part.name,
                            scene.faces(part_id).len()
                        ),
                    );
                    if let NodeKind::Part { color: part_color } = part.kind() {
                        ui.same_line();
                        ui.color_button(
                            format!("##color{object_index}_{part_index}"),
                            part_color.extend(1.0).to_array(),
                        );
                    }
                }
            }

            if ui.collapsing_header("Controls", imgui::TreeNodeFlags::empty()) {
                for binding in controls.bindings() {
                    ui.text(format!("{:>10}  {}", binding.key_name(), binding.action.label()));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::scene::tests::two_object_scene;

    #[test]
    fn transform_lines_describe_node() {
        let mut scene = two_object_scene();
        let object = scene.object(1).unwrap();

        let lines = transform_lines(&scene, object);
        assert_eq!(lines[2], "Translation: (2.00, 1.00, 0.00)");

        scene.reset(object);
        assert_eq!(transform_lines(&scene, object), vec!["Transform: identity"]);

        scene.scale_by(object, Vec3::splat(2.0));
        assert_eq!(transform_lines(&scene, object)[0], "Scale: (2.00, 2.00, 2.00)");
    }
}
