pub mod bindings;
pub mod edge;
pub mod keyboard;

pub use bindings::{Action, Controls};
pub use keyboard::{KeyboardState, PointerState};
