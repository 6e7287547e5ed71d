use glam::{Mat4, Vec3};
use id_arena::Arena;

use crate::scene_graph::face::Face;
use crate::scene_graph::node::{Node, NodeId, NodeKind};
use crate::scene_graph::transform::Transform;

/// Receives one call per face while the scene tree is rendered.
pub trait FaceDrawer {
    fn draw_face(&mut self, face_id: NodeId, face: &Face, model: Mat4, view: Mat4, projection: Mat4);
}

#[derive(Debug)]
pub struct Scene {
    nodes: Arena<Node>,
    root_id: NodeId,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root_id = nodes.alloc(Node::new("Scene", NodeKind::Scene));

        Self { nodes, root_id }
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root_id]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn add_object(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        let mut object = Node::new(name, NodeKind::Object);
        object.transform.set_translation(position);
        self.attach(self.root_id, object)
    }

    pub fn add_part(&mut self, object_id: NodeId, name: impl Into<String>, color: Vec3) -> NodeId {
        self.attach(object_id, Node::new(name, NodeKind::Part { color }))
    }

    pub fn add_face(&mut self, part_id: NodeId, face: Face) -> NodeId {
        self.attach(part_id, Node::new("", NodeKind::Face(face)))
    }

    fn attach(&mut self, parent_id: NodeId, mut node: Node) -> NodeId {
        debug_assert!(
            self.nodes.get(parent_id).is_some_and(|parent| !parent.is_leaf()),
            "faces cannot have children"
        );

        node.parent_id = Some(parent_id);
        let node_id = self.nodes.alloc(node);

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.child_ids.push(node_id);
        }

        node_id
    }

    pub fn objects(&self) -> &[NodeId] {
        self.root().child_ids()
    }

    pub fn object(&self, index: usize) -> Option<NodeId> {
        self.objects().get(index).copied()
    }

    pub fn object_count(&self) -> usize {
        self.objects().len()
    }

    pub fn parts(&self, object_id: NodeId) -> &[NodeId] {
        self.child_ids(object_id)
    }

    pub fn part(&self, object_id: NodeId, index: usize) -> Option<NodeId> {
        self.parts(object_id).get(index).copied()
    }

    pub fn faces(&self, part_id: NodeId) -> &[NodeId] {
        self.child_ids(part_id)
    }

    fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.child_ids())
            .unwrap_or(&[])
    }

    pub fn face_count(&self) -> usize {
        self.nodes.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    pub fn iter_faces(&self) -> impl Iterator<Item = (NodeId, &Face)> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| node.face().map(|face| (id, face)))
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(id).map(|node| &node.transform)
    }

    /// Every node of the subtree rooted at `id`, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            visited.push(current);
            stack.extend(node.child_ids.iter().rev());
        }

        visited
    }

    fn update_subtree(&mut self, id: NodeId, mut update: impl FnMut(&mut Transform)) {
        for node_id in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(node_id) {
                update(&mut node.transform);
            }
        }
    }

    // Transform commands hit the node itself and, separately, every descendant's
    // own transform. The matrix chain then compounds them again at render time.

    pub fn scale_by(&mut self, id: NodeId, factor: Vec3) {
        self.update_subtree(id, |transform| transform.scale_by(factor));
    }

    pub fn rotate_by(&mut self, id: NodeId, rotation: Vec3) {
        self.update_subtree(id, |transform| transform.rotate_by(rotation));
    }

    pub fn translate_by(&mut self, id: NodeId, delta: Vec3) {
        self.update_subtree(id, |transform| transform.translate_by(delta));
    }

    pub fn reset(&mut self, id: NodeId) {
        self.update_subtree(id, Transform::reset);
    }

    pub fn reset_all(&mut self) {
        self.reset(self.root_id);
    }

    pub fn render<D: FaceDrawer>(&self, view: Mat4, projection: Mat4, drawer: &mut D) {
        self.render_node(self.root_id, Mat4::IDENTITY, view, projection, drawer);
    }

    /// Composes the node's local transform under `parent_matrix` and hands the
    /// result to every child in order. Faces issue the draw.
    pub fn render_node<D: FaceDrawer>(
        &self,
        id: NodeId,
        parent_matrix: Mat4,
        view: Mat4,
        projection: Mat4,
        drawer: &mut D,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        let local_matrix = node.transform.compose(parent_matrix);

        match &node.kind {
            NodeKind::Face(face) => drawer.draw_face(id, face, local_matrix, view, projection),
            _ => {
                for &child_id in &node.child_ids {
                    self.render_node(child_id, local_matrix, view, projection, drawer);
                }
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[derive(Default)]
    pub(crate) struct RecordingDrawer {
        pub draws: Vec<(NodeId, Mat4, Vec3)>,
    }

    impl FaceDrawer for RecordingDrawer {
        fn draw_face(&mut self, face_id: NodeId, face: &Face, model: Mat4, _view: Mat4, _projection: Mat4) {
            self.draws.push((face_id, model, face.color()));
        }
    }

    pub(crate) fn triangle(color: Vec3) -> Face {
        Face::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
            color,
        )
        .unwrap()
    }

    /// Two objects, each with two single-face parts.
    pub(crate) fn two_object_scene() -> Scene {
        let mut scene = Scene::new();

        for (object_index, position) in [Vec3::ZERO, Vec3::new(2.0, 1.0, 0.0)].into_iter().enumerate() {
            let object = scene.add_object(format!("object{object_index}"), position);
            for part_index in 0..2 {
                let color = Vec3::new(object_index as f32, part_index as f32, 1.0);
                let part = scene.add_part(object, format!("part{part_index}"), color);
                scene.add_face(part, triangle(color));
            }
        }

        scene
    }

    fn x_scale(matrix: Mat4) -> f32 {
        matrix.transform_vector3(Vec3::X).length()
    }

    #[test]
    fn builds_tree_in_order() {
        let scene = two_object_scene();

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.face_count(), 4);
        let second = scene.object(1).unwrap();
        assert_eq!(scene.node(second).unwrap().name, "object1");
        assert_eq!(scene.parts(second).len(), 2);

        let part = scene.part(second, 1).unwrap();
        let part_node = scene.node(part).unwrap();
        assert_eq!(part_node.parent(&scene).unwrap().name, "object1");
        assert_eq!(part_node.child_ids().len(), 1);
        assert!(matches!(part_node.kind(), NodeKind::Part { color } if *color == Vec3::new(1.0, 1.0, 1.0)));
        assert!(scene.node(scene.faces(part)[0]).unwrap().is_leaf());
    }

    #[test]
    fn render_visits_faces_in_order_with_colors() {
        let scene = two_object_scene();
        let mut drawer = RecordingDrawer::default();

        scene.render(Mat4::IDENTITY, Mat4::IDENTITY, &mut drawer);

        let colors: Vec<Vec3> = drawer.draws.iter().map(|(_, _, color)| *color).collect();
        assert_eq!(
            colors,
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
            ]
        );

        let (_, model, _) = drawer.draws[2];
        assert_abs_diff_eq!(model.transform_point3(Vec3::ZERO), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn scale_propagates_into_descendant_fields() {
        let mut scene = Scene::new();
        let object = scene.add_object("object", Vec3::ZERO);
        let part = scene.add_part(object, "part", Vec3::ONE);
        let face = scene.add_face(part, triangle(Vec3::ONE));

        scene.scale_by(face, Vec3::splat(3.0));
        scene.scale_by(part, Vec3::splat(2.0));

        assert_eq!(scene.transform(part).unwrap().scale(), Vec3::splat(2.0));
        assert_eq!(scene.transform(face).unwrap().scale(), Vec3::splat(6.0));
        assert_eq!(scene.transform(object).unwrap().scale(), Vec3::ONE);

        let mut drawer = RecordingDrawer::default();
        scene.render(Mat4::IDENTITY, Mat4::IDENTITY, &mut drawer);

        // part's own 2x times the face's stored 6x
        let (_, model, _) = drawer.draws[0];
        assert_abs_diff_eq!(x_scale(model), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn scene_scale_reaches_every_level() {
        let mut scene = two_object_scene();
        let root = scene.root_id();

        scene.scale_by(root, Vec3::splat(2.0));

        for id in scene.subtree(root) {
            assert_eq!(scene.transform(id).unwrap().scale(), Vec3::splat(2.0));
        }

        let mut drawer = RecordingDrawer::default();
        scene.render(Mat4::IDENTITY, Mat4::IDENTITY, &mut drawer);
        for (_, model, _) in drawer.draws {
            assert_abs_diff_eq!(x_scale(model), 16.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn translate_and_rotate_propagate() {
        let mut scene = two_object_scene();
        let object = scene.object(0).unwrap();

        scene.translate_by(object, Vec3::Z);
        scene.rotate_by(object, Vec3::new(0.0, 0.5, 0.0));

        for id in scene.subtree(object) {
            let transform = scene.transform(id).unwrap();
            assert_eq!(transform.translation().z, 1.0);
            assert_eq!(transform.rotation(), Vec3::new(0.0, 0.5, 0.0));
        }
    }

    #[test]
    fn reset_clears_subtree_only() {
        let mut scene = two_object_scene();
        let first = scene.object(0).unwrap();
        let second = scene.object(1).unwrap();

        scene.scale_by(first, Vec3::splat(1.5));
        scene.rotate_by(second, Vec3::X);
        scene.reset(first);

        for id in scene.subtree(first) {
            assert!(scene.transform(id).unwrap().is_identity());
        }
        assert_eq!(scene.transform(second).unwrap().rotation(), Vec3::X);

        scene.reset_all();
        for id in scene.subtree(scene.root_id()) {
            assert!(scene.transform(id).unwrap().is_identity());
        }
    }

    #[test]
    fn empty_scene_renders_nothing() {
        let scene = Scene::new();
        let mut drawer = RecordingDrawer::default();

        scene.render(Mat4::IDENTITY, Mat4::IDENTITY, &mut drawer);

        assert_eq!(scene.object_count(), 0);
        assert!(drawer.draws.is_empty());
    }
}
