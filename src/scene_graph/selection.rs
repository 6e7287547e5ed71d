use glam::Vec3;

use crate::scene_graph::node::NodeId;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::clamp_scale;

/// The node transform commands are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Scene,
    Object(NodeId),
    Part { object: NodeId, part: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectCommand {
    Scene,
    Object(usize),
    Part(usize),
    ResetAll,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformCommand {
    Rotate(Vec3),
    Translate(Vec3),
    Scale(Vec3),
    Reset,
}

impl Selection {
    /// First part of the first object, falling back to the first object and
    /// then the scene.
    pub fn initial(scene: &Scene) -> Self {
        match scene.object(0) {
            Some(object) => match scene.part(object, 0) {
                Some(part) => Selection::Part { object, part },
                None => Selection::Object(object),
            },
            None => Selection::Scene,
        }
    }

    pub fn target(&self, scene: &Scene) -> NodeId {
        match *self {
            Selection::Scene => scene.root_id(),
            Selection::Object(object) => object,
            Selection::Part { part, .. } => part,
        }
    }

    pub fn object(&self) -> Option<NodeId> {
        match *self {
            Selection::Scene => None,
            Selection::Object(object) | Selection::Part { object, .. } => Some(object),
        }
    }

    /// Applies a selection command. Returns false when the command referred to
    /// something that does not exist and was ignored.
    pub fn apply(&mut self, command: SelectCommand, scene: &mut Scene) -> bool {
        match command {
            SelectCommand::Scene => {
                *self = Selection::Scene;
            }
            SelectCommand::Object(index) => {
                let Some(object) = scene.object(index) else {
                    return false;
                };
                *self = Selection::Object(object);
            }
            SelectCommand::Part(index) => {
                let Some(object) = self.object() else {
                    return false;
                };
                let Some(part) = scene.part(object, index) else {
                    return false;
                };
                *self = Selection::Part { object, part };
            }
            SelectCommand::ResetAll => {
                scene.reset_all();
                *self = Selection::Scene;
            }
        }

        true
    }

    /// Routes a transform command to the selected node's subtree.
    pub fn transform(&self, command: TransformCommand, scene: &mut Scene) {
        let target = self.target(scene);

        match command {
            TransformCommand::Rotate(rotation) => scene.rotate_by(target, rotation),
            TransformCommand::Translate(delta) => scene.translate_by(target, delta),
            TransformCommand::Scale(factor) => scene.scale_by(target, clamp_scale(factor)),
            TransformCommand::Reset => scene.reset(target),
        }
    }

    pub fn describe(&self, scene: &Scene) -> String {
        let name = |id: NodeId| scene.node(id).map(|node| node.name.as_str()).unwrap_or("?");

        match *self {
            Selection::Scene => "Scene".to_string(),
            Selection::Object(object) => format!("Object '{}'", name(object)),
            Selection::Part { object, part } => {
                format!("Part '{}' of '{}'", name(part), name(object))
            }
        }
    }
}
