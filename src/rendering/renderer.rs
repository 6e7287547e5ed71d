use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use glam::Mat4;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::Camera,
    config::RenderConfig,
    rendering::{
        face_buffers::RenderFace,
        imgui_renderer::ImguiRendererState,
        passes::{
            axes_pass::AxesPass,
            face_pass::FacePass,
            pass::{FrameTextureViews, Pass},
        },
        render_common::RenderCommon,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    scene_graph::{Face, FaceDrawer, NodeId, Scene},
    viewer::ViewerState,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    render_faces: HashMap<NodeId, RenderFace>,

    shader_loader: ShaderLoader,

    face_pass: FacePass,
    axes_pass: AxesPass,
    imgui_renderer: ImguiRendererState,
}

/// Writes each visited face's world matrix into its uniform buffer and
/// remembers the draw order.
struct FaceUniformWriter<'a> {
    queue: &'a wgpu::Queue,
    render_faces: &'a HashMap<NodeId, RenderFace>,
    visible: Vec<NodeId>,
}

impl FaceDrawer for FaceUniformWriter<'_> {
    fn draw_face(&mut self, face_id: NodeId, face: &Face, model: Mat4, _view: Mat4, _projection: Mat4) {
        let Some(render_face) = self.render_faces.get(&face_id) else {
            return;
        };

        render_face.update_uniform(self.queue, model, face.color());
        self.visible.push(face_id);
    }
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: &RenderConfig,
        camera: &Camera,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let common = RenderCommon::new(&device, &adapter, &surface, size, camera)?;
        let surface_config = common.output_surface_config.clone();
        let common = Arc::new(common);

        let depth_texture = DepthTexture::new(&device, &surface_config, "Depth Texture");

        let mut cache_builder = PipelineCacheBuilder::new();

        let face_pass = FacePass::create(&device, common.clone(), &mut cache_builder)?;
        let axes_pass = AxesPass::create(&device, common.clone(), &mut cache_builder)?;

        let shader_loader = ShaderLoader::new(device.clone(), cache_builder, config);

        let imgui_renderer =
            ImguiRendererState::new(&device, &queue, common.surface_format(), imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            common,
            depth_texture,
            render_faces: HashMap::new(),
            shader_loader,
            face_pass,
            axes_pass,
            imgui_renderer,
        })
    }

    /// Replaces the GPU buffers with ones for the faces of `scene`.
    pub fn load_scene(&mut self, scene: &Scene) {
        self.render_faces.clear();
        let mut triangle_count = 0;

        for (face_id, face) in scene.iter_faces() {
            if face.indices().is_empty() {
                continue;
            }

            let part_name = scene
                .node(face_id)
                .and_then(|node| node.parent(scene))
                .map(|part| part.name.as_str())
                .unwrap_or("face");

            let render_face = RenderFace::from_face(
                &self.device,
                &self.common.face_bind_group_layout,
                part_name,
                face,
            );
            self.render_faces.insert(face_id, render_face);
            triangle_count += face.triangle_count();
        }

        log::info!(
            "Uploaded {} faces ({} triangles)",
            self.render_faces.len(),
            triangle_count
        );
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture.resize(&self.device, &self.surface_config);
    }

    pub fn render(
        &mut self,
        state: &ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.common.camera_uniform.update(&self.queue, &state.camera);

        let mut writer = FaceUniformWriter {
            queue: &self.queue,
            render_faces: &self.render_faces,
            visible: Vec::with_capacity(self.render_faces.len()),
        };
        state.scene.render(
            state.camera.view_matrix(),
            state.camera.projection_matrix(),
            &mut writer,
        );
        let visible = writer.visible;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;
        let texture_views = FrameTextureViews {
            color: view.clone(),
            depth: self.depth_texture.view().clone(),
        };

        self.face_pass
            .render(&texture_views, &mut encoder, pipeline_cache, |render_pass| {
                for face_id in &visible {
                    if let Some(render_face) = self.render_faces.get(face_id) {
                        render_face.draw(render_pass);
                    }
                }
            });

        if state.show_axes {
            self.axes_pass
                .render(&texture_views, &mut encoder, pipeline_cache, |_| {});
        }

        self.imgui_renderer.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        );

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
