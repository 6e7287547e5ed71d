pub mod camera_uniform;
pub mod face_buffers;
pub mod imgui_renderer;
pub mod passes;
pub mod render_common;
pub mod renderer;
pub mod shader_loader;
pub mod texture;
