use std::{mem::offset_of, sync::Arc};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::{
    util::DeviceExt, DepthBiasState, Device, MultisampleState, PipelineCompilationOptions,
    RenderPass, RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::rendering::{
    passes::pass::{FrameTextureViews, Pass},
    render_common::RenderCommon,
    shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
    texture::DepthTexture,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct AxisVertex {
    position: Vec3,
    color: Vec3,
}

const fn axis_line(direction: Vec3) -> [AxisVertex; 2] {
    [
        AxisVertex {
            position: Vec3::ZERO,
            color: direction,
        },
        AxisVertex {
            position: direction,
            color: direction,
        },
    ]
}

const AXIS_LINES: [[AxisVertex; 2]; 3] = [axis_line(Vec3::X), axis_line(Vec3::Y), axis_line(Vec3::Z)];

const AXIS_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<AxisVertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(AxisVertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(AxisVertex, color) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

const AXES_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Axes Shader",
    path: "axes.wgsl",
    fallback_source: include_str!("../../../assets/shaders/axes.wgsl"),
};

/// World X/Y/Z unit axes, drawn over the scene with depth testing.
pub struct AxesPass {
    pipeline_id: PipelineId,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
}

impl Pass for AxesPass {
    type TextureViews = FrameTextureViews;

    fn create(
        device: &Device,
        common: Arc<RenderCommon>,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self> {
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Axes Pipeline Layout"),
                bind_group_layouts: &[&common.camera_uniform.bind_group_layout],
                push_constant_ranges: &[],
            });

        let surface_format = common.surface_format();

        let pipeline_id = cache_builder.add_shader(
            AXES_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Axes render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[AXIS_VBL],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: surface_format,
                                blend: Some(wgpu::BlendState::REPLACE),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::LineList,
                            strip_index_format: None,
                            front_face: wgpu::FrontFace::Ccw,
                            cull_mode: None,
                            polygon_mode: wgpu::PolygonMode::Fill,
                            unclipped_depth: false,
                            conservative: false,
                        },
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
                            stencil: StencilState::default(),
                            bias: DepthBiasState::default(),
                        }),
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axes vertex buffer"),
            contents: bytemuck::cast_slice(&AXIS_LINES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(AxesPass {
            pipeline_id,
            camera_bind_group: common.camera_uniform.bind_group.clone(),
            vertex_buffer,
        })
    }

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a,
    {
        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Axes Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..(AXIS_LINES.len() * 2) as u32, 0..1);

        render_callback(&mut render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_colored_by_direction() {
        let vertices: &[AxisVertex] = bytemuck::cast_slice(&AXIS_LINES);

        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, Vec3::X);
        assert_eq!(vertices[3].color, Vec3::Y);
        assert_eq!(vertices[4].position, Vec3::ZERO);
        assert_eq!(vertices[5].color, Vec3::Z);
    }
}
