use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::camera::CameraMovement;
use crate::input::edge::EdgeTrigger;
use crate::input::keyboard::KeyboardState;
use crate::scene_graph::SelectCommand;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Exit,
    ToggleAxes,
    ToggleOverlay,
    Select(SelectCommand),
    /// Rotate the selection around a unit axis, scaled by time and speed.
    Rotate(Vec3),
    /// Translate the selection along a unit axis, scaled by time and speed.
    Translate(Vec3),
    ScaleUp,
    ScaleDown,
    ResetSelection,
    Move(CameraMovement),
}

impl Action {
    pub fn label(&self) -> String {
        match self {
            Action::Exit => "quit".to_string(),
            Action::ToggleAxes => "toggle axes".to_string(),
            Action::ToggleOverlay => "toggle overlay".to_string(),
            Action::Select(SelectCommand::Scene) => "select scene".to_string(),
            Action::Select(SelectCommand::Object(index)) => format!("select object {index}"),
            Action::Select(SelectCommand::Part(index)) => format!("select part {index}"),
            Action::Select(SelectCommand::ResetAll) => "reset everything".to_string(),
            Action::Rotate(axis) => format!("rotate {}", axis_name(*axis)),
            Action::Translate(axis) => format!("move {}", axis_name(*axis)),
            Action::ScaleUp => "scale up".to_string(),
            Action::ScaleDown => "scale down".to_string(),
            Action::ResetSelection => "reset selection".to_string(),
            Action::Move(movement) => format!("camera {movement:?}").to_lowercase(),
        }
    }
}

fn axis_name(axis: Vec3) -> &'static str {
    match axis.to_array() {
        [x, _, _] if x > 0.0 => "+X",
        [x, _, _] if x < 0.0 => "-X",
        [_, y, _] if y > 0.0 => "+Y",
        [_, y, _] if y < 0.0 => "-Y",
        [_, _, z] if z > 0.0 => "+Z",
        _ => "-Z",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires once on the frame the key goes down.
    Pressed,
    /// Fires on every frame the key is down.
    Held,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub key: KeyCode,
    pub action: Action,
    pub trigger: Trigger,
    edge: EdgeTrigger,
}

impl Binding {
    pub fn new(key: KeyCode, action: Action, trigger: Trigger) -> Self {
        Self {
            key,
            action,
            trigger,
            edge: EdgeTrigger::default(),
        }
    }

    fn poll(&mut self, keyboard: &KeyboardState) -> bool {
        let is_down = keyboard.is_down(self.key);
        let pressed = self.edge.update(is_down);

        match self.trigger {
            Trigger::Pressed => pressed,
            Trigger::Held => is_down,
        }
    }

    pub fn key_name(&self) -> String {
        let name = format!("{:?}", self.key);
        name.strip_prefix("Key").unwrap_or(&name).to_string()
    }
}

pub struct Controls {
    bindings: Vec<Binding>,
}

impl Controls {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Actions firing this frame, in binding order.
    pub fn poll(&mut self, keyboard: &KeyboardState) -> Vec<Action> {
        self.bindings
            .iter_mut()
            .filter_map(|binding| binding.poll(keyboard).then_some(binding.action))
            .collect()
    }
}

impl Default for Controls {
    fn default() -> Self {
        use Action as A;
        use KeyCode as K;
        use Trigger::{Held, Pressed};

        let bindings = [
            (K::Escape, A::Exit, Pressed),
            (K::KeyC, A::ToggleAxes, Pressed),
            (K::Tab, A::ToggleOverlay, Pressed),
            (K::F1, A::Select(SelectCommand::Scene), Pressed),
            (K::F2, A::Select(SelectCommand::Object(0)), Pressed),
            (K::F3, A::Select(SelectCommand::Object(1)), Pressed),
            (K::F5, A::Select(SelectCommand::Part(0)), Pressed),
            (K::F6, A::Select(SelectCommand::Part(1)), Pressed),
            (K::F12, A::Select(SelectCommand::ResetAll), Pressed),
            (K::KeyR, A::Rotate(Vec3::X), Held),
            (K::KeyT, A::Rotate(Vec3::Y), Held),
            (K::KeyY, A::Rotate(Vec3::Z), Held),
            (K::KeyF, A::Rotate(Vec3::NEG_X), Held),
            (K::KeyG, A::Rotate(Vec3::NEG_Y), Held),
            (K::KeyH, A::Rotate(Vec3::NEG_Z), Held),
            (K::ArrowUp, A::Translate(Vec3::Y), Held),
            (K::ArrowDown, A::Translate(Vec3::NEG_Y), Held),
            (K::ArrowLeft, A::Translate(Vec3::NEG_X), Held),
            (K::ArrowRight, A::Translate(Vec3::X), Held),
            (K::KeyI, A::Translate(Vec3::Z), Held),
            (K::KeyK, A::Translate(Vec3::NEG_Z), Held),
            (K::KeyZ, A::ScaleUp, Pressed),
            (K::KeyX, A::ScaleDown, Pressed),
            (K::Backspace, A::ResetSelection, Pressed),
            (K::KeyW, A::Move(CameraMovement::Forward), Held),
            (K::KeyS, A::Move(CameraMovement::Backward), Held),
            (K::KeyA, A::Move(CameraMovement::Left), Held),
            (K::KeyD, A::Move(CameraMovement::Right), Held),
        ];

        Self::new(
            bindings
                .into_iter()
                .map(|(key, action, trigger)| Binding::new(key, action, trigger))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;

    use super::*;

    #[test]
    fn pressed_bindings_fire_once() {
        let mut controls = Controls::default();
        let mut keyboard = KeyboardState::default();

        keyboard.handle_key(KeyCode::KeyZ, ElementState::Pressed);
        assert_eq!(controls.poll(&keyboard), vec![Action::ScaleUp]);
        assert!(controls.poll(&keyboard).is_empty());

        keyboard.handle_key(KeyCode::KeyZ, ElementState::Released);
        assert!(controls.poll(&keyboard).is_empty());
        keyboard.handle_key(KeyCode::KeyZ, ElementState::Pressed);
        assert_eq!(controls.poll(&keyboard), vec![Action::ScaleUp]);
    }

    #[test]
    fn held_bindings_fire_every_frame() {
        let mut controls = Controls::default();
        let mut keyboard = KeyboardState::default();

        keyboard.handle_key(KeyCode::KeyW, ElementState::Pressed);
        keyboard.handle_key(KeyCode::KeyR, ElementState::Pressed);

        for _ in 0..3 {
            assert_eq!(
                controls.poll(&keyboard),
                vec![Action::Rotate(Vec3::X), Action::Move(CameraMovement::Forward)]
            );
        }
    }

    #[test]
    fn labels_are_readable() {
        assert_eq!(Action::Rotate(Vec3::NEG_Y).label(), "rotate -Y");
        assert_eq!(Action::Select(SelectCommand::Object(1)).label(), "select object 1");
        assert_eq!(Action::Move(CameraMovement::Left).label(), "camera left");

        let binding = Binding::new(KeyCode::KeyW, Action::Exit, Trigger::Pressed);
        assert_eq!(binding.key_name(), "W");
    }
}
