use crate::input::{Controls, KeyboardState, PointerState};
use crate::viewer::ViewerState;

/// Advances the viewer by one frame of input.
pub fn update(
    state: &mut ViewerState,
    controls: &mut Controls,
    keyboard: &KeyboardState,
    pointer: &mut PointerState,
    delta_time: f32,
) {
    for action in controls.poll(keyboard) {
        state.apply(action, delta_time);
    }

    if let Some(position) = pointer.take_motion() {
        state.camera.process_look(position);
    }

    let scroll = pointer.take_scroll();
    if scroll != 0.0 {
        state.camera.process_zoom(scroll);
    }
}
