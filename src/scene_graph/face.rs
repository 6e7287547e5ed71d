use glam::Vec3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FaceError {
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Drawable triangle-list geometry with a flat colour. Faces are the leaves of
/// the scene tree.
#[derive(Debug, Clone)]
pub struct Face {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    color: Vec3,
}

impl Face {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>, color: Vec3) -> Result<Self, FaceError> {
        if indices.len() % 3 != 0 {
            return Err(FaceError::IncompleteTriangle(indices.len()));
        }

        if let Some(&index) = indices
            .iter()
            .find(|&&index| index as usize >= vertices.len())
        {
            return Err(FaceError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            indices,
            color,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
