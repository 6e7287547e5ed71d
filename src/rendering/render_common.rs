use winit::dpi::PhysicalSize;

use crate::camera::Camera;
use crate::rendering::camera_uniform::{CameraUniform, CameraUniformState};
use crate::rendering::face_buffers::face_bind_group_layout;

/// GPU state shared by every pass.
pub struct RenderCommon {
    pub output_surface_config: wgpu::SurfaceConfiguration,
    pub camera_uniform: CameraUniform,
    pub face_bind_group_layout: wgpu::BindGroupLayout,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
        camera: &Camera,
    ) -> anyhow::Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface is not supported by the adapter"))?;

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: first_or(&surface_caps.present_modes, wgpu::PresentMode::Fifo),
            alpha_mode: first_or(&surface_caps.alpha_modes, wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        Ok(Self {
            output_surface_config,
            camera_uniform: CameraUniform::new(device, CameraUniformState::new(camera)),
            face_bind_group_layout: face_bind_group_layout(device),
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.output_surface_config.format
    }
}

/// The surface's preferred mode, or `fallback` when it reports none.
fn first_or<T: Copy>(modes: &[T], fallback: T) -> T {
    modes.first().copied().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capabilities_use_fallback_modes() {
        assert_eq!(first_or(&[], wgpu::PresentMode::Fifo), wgpu::PresentMode::Fifo);
        assert_eq!(
            first_or(&[], wgpu::CompositeAlphaMode::Auto),
            wgpu::CompositeAlphaMode::Auto
        );
        assert_eq!(
            first_or(
                &[wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo],
                wgpu::PresentMode::Fifo
            ),
            wgpu::PresentMode::Mailbox
        );
    }
}
