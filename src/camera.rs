use glam::{Mat4, Vec2, Vec3};

pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
pub const PITCH_LIMIT: f32 = 89.0;
const ZOOM_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-flying camera driven by yaw and pitch in degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    aspect_ratio: f32,
    pub speed: f32,
    pub sensitivity: f32,
    last_pointer: Option<Vec2>,
}

impl Camera {
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            aspect_ratio,
            speed: 2.5,
            sensitivity: 0.1,
            last_pointer: None,
        };
        camera.update_front();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    /// Feeds the current pointer position. The first call only records it.
    pub fn process_look(&mut self, pointer: Vec2) {
        let Some(last_pointer) = self.last_pointer.replace(pointer) else {
            return;
        };

        let delta = pointer - last_pointer;
        self.yaw += delta.x * self.sensitivity;
        // Screen y grows downwards.
        self.pitch -= delta.y * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_front();
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
            .normalize();
    }

    pub fn process_move(&mut self, direction: CameraMovement, delta_time: f32) {
        let step = self.speed * delta_time;
        let right = self.front.cross(self.up).normalize();

        match direction {
            CameraMovement::Forward => self.position += self.front * step,
            CameraMovement::Backward => self.position -= self.front * step,
            CameraMovement::Left => self.position -= right * step,
            CameraMovement::Right => self.position += right * step,
        }
    }

    pub fn process_zoom(&mut self, scroll_delta: f32) {
        self.position += self.front * scroll_delta * ZOOM_FACTOR;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            FIELD_OF_VIEW_DEGREES.to_radians(),
            self.aspect_ratio,
            Z_NEAR,
            Z_FAR,
        )
    }
}
