pub mod face;
pub mod node;
pub mod scene;
pub mod selection;
pub mod transform;

pub use face::Face;
pub use node::{NodeId, NodeKind};
pub use scene::{FaceDrawer, Scene};
pub use selection::{SelectCommand, Selection, TransformCommand};
