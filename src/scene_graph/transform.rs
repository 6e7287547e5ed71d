use glam::{Mat4, Vec3};
use std::cell::Cell;

pub const MIN_SCALE: f32 = 0.01;
pub const MAX_SCALE: f32 = 100.0;

/// Clamps every component of a scale factor to `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: Vec3) -> Vec3 {
    scale.clamp(Vec3::splat(MIN_SCALE), Vec3::splat(MAX_SCALE))
}

/// Local scale/rotation/translation of a scene node.
///
/// Rotation is stored as Euler angles in radians and applied X, then Y, then Z.
#[derive(Debug, Clone)]
pub struct Transform {
    scale: Vec3,
    rotation: Vec3,
    translation: Vec3,

    local_matrix: Cell<Mat4>,
    local_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation,
            local_matrix: Cell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
        }
    }

    /// `Scale × RotationX × RotationY × RotationZ × Translation`, cached until
    /// one of the fields changes.
    pub fn local_matrix(&self) -> Mat4 {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale(self.scale)
                * Mat4::from_rotation_x(self.rotation.x)
                * Mat4::from_rotation_y(self.rotation.y)
                * Mat4::from_rotation_z(self.rotation.z)
                * Mat4::from_translation(self.translation);

            self.local_matrix.set(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.get()
    }

    /// Composes this transform under `parent`, producing the child's matrix.
    pub fn compose(&self, parent: Mat4) -> Mat4 {
        parent * self.local_matrix()
    }

    fn invalidate_local(&self) {
        self.local_dirty.set(true);
    }

    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.invalidate_local();
    }

    pub fn rotate_by(&mut self, rotation: Vec3) {
        self.rotation += rotation;
        self.invalidate_local();
    }

    pub fn translate_by(&mut self, delta: Vec3) {
        self.translation += delta;
        self.invalidate_local();
    }

    pub fn reset(&mut self) {
        self.scale = Vec3::ONE;
        self.rotation = Vec3::ZERO;
        self.translation = Vec3::ZERO;
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn is_identity(&self) -> bool {
        self.scale == Vec3::ONE && self.rotation == Vec3::ZERO && self.translation == Vec3::ZERO
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}
