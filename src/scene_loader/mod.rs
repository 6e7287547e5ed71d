pub mod description;
pub mod loader;

pub use loader::load_scene_or_empty;
