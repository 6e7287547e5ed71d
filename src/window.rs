use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, Event, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::ViewerArgs,
    engine,
    input::{Controls, KeyboardState, PointerState},
    overlay,
    rendering::renderer::Renderer,
    scene_loader::load_scene_or_empty,
    viewer::ViewerState,
};

// Touchpads report pixels, wheels report lines.
const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    args: ViewerArgs,
    renderer: Option<Renderer>,
    state: ViewerState,
    controls: Controls,
    keyboard: KeyboardState,
    pointer: PointerState,
    imgui: Option<ImguiState>,
    last_frame: Instant,
}

impl App {
    fn new(args: ViewerArgs, state: ViewerState) -> Self {
        Self {
            args,
            renderer: None,
            state,
            controls: Controls::default(),
            keyboard: KeyboardState::default(),
            pointer: PointerState::default(),
            imgui: None,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.args.title.clone())
            .with_inner_size(PhysicalSize::new(self.args.width, self.args.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        grab_cursor(&window);

        let size = window.inner_size();
        if size.height > 0 {
            self.state
                .camera
                .set_aspect_ratio(size.width as f32 / size.height as f32);
        }

        let mut imgui = Self::setup_imgui(&window);
        let mut renderer = pollster::block_on(Renderer::new(
            window,
            &self.args.render_config(),
            &self.state.camera,
            &mut imgui.context,
        ))?;
        renderer.load_scene(&self.state.scene);

        self.imgui = Some(imgui);
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();

        Ok(())
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

    if let Err(e) = grabbed {
        log::warn!("Could not grab the cursor: {e}");
    }

    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let PhysicalKey::Code(code) = key_event.physical_key {
                    self.keyboard.handle_key(code, key_event.state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => {
                        position.y as f32 / PIXELS_PER_SCROLL_LINE
                    }
                };
                self.pointer.add_scroll(lines);
            }
            WindowEvent::Focused(false) => {
                self.keyboard.clear();
            }
            WindowEvent::Focused(true) => {
                grab_cursor(&renderer.window);
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(*new_size);
                if new_size.height > 0 {
                    self.state
                        .camera
                        .set_aspect_ratio(new_size.width as f32 / new_size.height as f32);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now - self.last_frame;
                self.last_frame = now;
                imgui.context.io_mut().update_delta_time(delta_time);

                engine::update(
                    &mut self.state,
                    &mut self.controls,
                    &self.keyboard,
                    &mut self.pointer,
                    delta_time.as_secs_f32(),
                );

                if self.state.exit_requested() {
                    event_loop.exit();
                    return;
                }

                if let Err(e) = imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                {
                    log::warn!("Failed to prepare imgui frame: {e}");
                }

                let ui = imgui.context.new_frame();
                overlay::draw(ui, &self.state, &self.controls);
                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(&self.state, &mut imgui.context) {
                    Ok(()) => {}
                    Err(e) => {
                        // Close the imgui frame that was never drawn.
                        imgui.context.render();

                        match e {
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                renderer.resize(renderer.size);
                            }
                            wgpu::SurfaceError::OutOfMemory => {
                                log::error!("Out of memory");
                                event_loop.exit();
                            }
                            wgpu::SurfaceError::Timeout => {
                                log::warn!("Timeout");
                            }
                            other => {
                                log::error!("Unexpected error: {:?}", other);
                            }
                        }
                    }
                }

                renderer.window.request_redraw();
            }
            _ => (),
        }

        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent { window_id, event },
        );
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.pointer.add_motion(Vec2::new(dx as f32, dy as f32));
        }
    }
}

pub async fn run(args: ViewerArgs) -> anyhow::Result<()> {
    let scene = load_scene_or_empty(&args.scene);
    let aspect_ratio = args.width as f32 / args.height.max(1) as f32;
    let state = ViewerState::new(scene, args.step_settings(), aspect_ratio);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(args, state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
