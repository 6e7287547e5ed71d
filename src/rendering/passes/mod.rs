pub mod axes_pass;
pub mod face_pass;
pub mod pass;
