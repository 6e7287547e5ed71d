use glam::Vec3;

use crate::camera::Camera;
use crate::config::StepSettings;
use crate::input::Action;
use crate::scene_graph::{Scene, Selection, TransformCommand};

const CAMERA_START: Vec3 = Vec3::new(-0.4, 0.2, 5.0);

pub struct ViewerState {
    pub camera: Camera,
    pub scene: Scene,
    pub selection: Selection,
    pub steps: StepSettings,
    pub show_axes: bool,
    pub show_overlay: bool,
    exit_requested: bool,
}

impl ViewerState {
    pub fn new(scene: Scene, steps: StepSettings, aspect_ratio: f32) -> Self {
        let mut camera = Camera::new(CAMERA_START, aspect_ratio);
        camera.speed = steps.camera_speed;
        camera.sensitivity = steps.mouse_sensitivity;

        let selection = Selection::initial(&scene);

        Self {
            camera,
            scene,
            selection,
            steps,
            show_axes: true,
            show_overlay: true,
            exit_requested: false,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn apply(&mut self, action: Action, delta_time: f32) {
        match action {
            Action::Exit => self.exit_requested = true,
            Action::ToggleAxes => self.show_axes = !self.show_axes,
            Action::ToggleOverlay => self.show_overlay = !self.show_overlay,
            Action::Select(command) => {
                if self.selection.apply(command, &mut self.scene) {
                    log::info!("Selected {}", self.selection.describe(&self.scene));
                } else {
                    log::debug!("Ignoring {command:?}, nothing to select");
                }
            }
            Action::Rotate(axis) => self.transform_selection(TransformCommand::Rotate(
                axis * self.steps.rotation_speed * delta_time,
            )),
            Action::Translate(axis) => self.transform_selection(TransformCommand::Translate(
                axis * self.steps.translation_speed * delta_time,
            )),
            Action::ScaleUp => {
                self.transform_selection(TransformCommand::Scale(Vec3::splat(self.steps.scale_step)))
            }
            Action::ScaleDown => self.transform_selection(TransformCommand::Scale(Vec3::splat(
                1.0 / self.steps.scale_step,
            ))),
            Action::ResetSelection => {
                log::info!("Reset {}", self.selection.describe(&self.scene));
                self.transform_selection(TransformCommand::Reset);
            }
            Action::Move(direction) => self.camera.process_move(direction, delta_time),
        }
    }

    fn transform_selection(&mut self, command: TransformCommand) {
        self.selection.transform(command, &mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::camera::CameraMovement;
    use crate::scene_graph::scene::tests::two_object_scene;
    use crate::scene_graph::SelectCommand;

    fn viewer() -> ViewerState {
        ViewerState::new(two_object_scene(), StepSettings::default(), 4.0 / 3.0)
    }

    #[test]
    fn starts_with_first_part_selected() {
        let viewer = viewer();
        let object = viewer.scene.object(0).unwrap();

        assert_eq!(viewer.selection.target(&viewer.scene), viewer.scene.part(object, 0).unwrap());
        assert_eq!(viewer.camera.position(), CAMERA_START);
        assert!(viewer.show_axes);
    }

    #[test]
    fn rotation_is_scaled_by_time() {
        let mut viewer = viewer();
        viewer.apply(Action::Select(SelectCommand::Scene), 0.0);
        viewer.apply(Action::Rotate(Vec3::NEG_Y), 0.5);

        let root = viewer.scene.root_id();
        assert_abs_diff_eq!(
            viewer.scene.transform(root).unwrap().rotation(),
            Vec3::new(0.0, -0.75, 0.0)
        );
    }

    #[test]
    fn scale_up_then_down_round_trips() {
        let mut viewer = viewer();
        viewer.apply(Action::Select(SelectCommand::Object(1)), 0.0);
        viewer.apply(Action::ScaleUp, 0.016);
        viewer.apply(Action::ScaleDown, 0.016);

        let object = viewer.scene.object(1).unwrap();
        assert_abs_diff_eq!(
            viewer.scene.transform(object).unwrap().scale(),
            Vec3::ONE,
            epsilon = 1e-6
        );
    }

    #[test]
    fn reset_selection_only_touches_target() {
        let mut viewer = viewer();
        viewer.apply(Action::Select(SelectCommand::Scene), 0.0);
        viewer.apply(Action::Translate(Vec3::X), 1.0);
        viewer.apply(Action::Select(SelectCommand::Object(0)), 0.0);
        viewer.apply(Action::Translate(Vec3::Y), 1.0);
        viewer.apply(Action::ResetSelection, 0.0);

        let root = viewer.scene.root_id();
        let object = viewer.scene.object(0).unwrap();
        assert_eq!(viewer.scene.transform(root).unwrap().translation(), Vec3::new(2.0, 0.0, 0.0));
        assert!(viewer.scene.transform(object).unwrap().is_identity());
    }

    #[test]
    fn toggles_and_exit() {
        let mut viewer = viewer();
        viewer.apply(Action::ToggleAxes, 0.0);
        viewer.apply(Action::ToggleOverlay, 0.0);
        assert!(!viewer.show_axes);
        assert!(!viewer.show_overlay);

        assert!(!viewer.exit_requested());
        viewer.apply(Action::Exit, 0.0);
        assert!(viewer.exit_requested());
    }

    #[test]
    fn camera_moves_with_configured_speed() {
        let mut viewer = viewer();
        viewer.apply(Action::Move(CameraMovement::Forward), 1.0);

        assert_abs_diff_eq!(
            viewer.camera.position(),
            CAMERA_START + Vec3::NEG_Z * 2.5,
            epsilon = 1e-5
        );
    }
}
