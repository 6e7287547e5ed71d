use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::scene_graph::Face;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FaceVertex {
    position: Vec3,
}

pub const FACE_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<FaceVertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: offset_of!(FaceVertex, position) as wgpu::BufferAddress,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

/// Per-face model matrix and colour, bound at group 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FaceUniformState {
    model: Mat4,
    color: [f32; 4],
}

impl FaceUniformState {
    pub fn new(model: Mat4, color: Vec3) -> Self {
        Self {
            model,
            color: color.extend(1.0).to_array(),
        }
    }
}

pub fn face_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Face uniform bind group layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// GPU resources owned by a single face. Dropping it releases them.
pub struct RenderFace {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl RenderFace {
    pub fn from_face(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        face: &Face,
    ) -> Self {
        let vertices: Vec<FaceVertex> = face
            .vertices()
            .iter()
            .map(|&position| FaceVertex { position })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex buffer ({name})")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index buffer ({name})")),
            contents: bytemuck::cast_slice(face.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Face uniform buffer ({name})")),
            contents: bytemuck::cast_slice(&[FaceUniformState::new(Mat4::IDENTITY, face.color())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Face bind group ({name})")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: face.indices().len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update_uniform(&self, queue: &wgpu::Queue, model: Mat4, color: Vec3) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[FaceUniformState::new(model, color)]),
        );
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_shader() {
        // mat4x4<f32> followed by vec4<f32>
        assert_eq!(std::mem::size_of::<FaceUniformState>(), 80);
        assert_eq!(std::mem::size_of::<FaceVertex>(), 12);

        let state = FaceUniformState::new(Mat4::IDENTITY, Vec3::new(0.1, 0.2, 0.3));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&state));
        assert_eq!(&floats[16..], &[0.1, 0.2, 0.3, 1.0]);
    }
}
