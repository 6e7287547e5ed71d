use glam::Vec3;
use id_arena::Id;

use crate::scene_graph::face::Face;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<Node>;

#[derive(Debug, Clone)]
pub enum NodeKind {
    Scene,
    Object,
    Part { color: Vec3 },
    Face(Face),
}

/// A node of the scene tree. Scene, objects and parts are composites; faces
/// are leaves and never have children.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub(crate) kind: NodeKind,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn face(&self) -> Option<&Face> {
        match &self.kind {
            NodeKind::Face(face) => Some(face),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Face(_))
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Node> {
        self.parent_id.and_then(|id| scene.node(id))
    }
}
