use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, channel},
        Arc,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use notify_debouncer_mini::{
    new_debouncer_opt,
    notify::{RecommendedWatcher, RecursiveMode},
    DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{PollType, RenderPipeline};

use crate::config::RenderConfig;

pub(crate) type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    /// File name relative to the shader directory.
    pub path: &'static str,
    /// Source compiled into the binary, used when the file cannot be compiled.
    pub fallback_source: &'static str,
}

pub(crate) struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub(crate) type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub(crate) struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

impl PipelineCacheEntry {
    pub fn set_pipeline(&mut self, pipeline: wgpu::RenderPipeline) {
        self.0 = Some(pipeline);
    }
}

pub(crate) struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub fn add_shader(&mut self, def: ShaderDefinition, factory: PipelineFactory) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        self.shaders.alloc(ShaderEntry {
            pipeline_id,
            def,
            factory,
        });
        pipeline_id
    }

    pub fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub(crate) struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    /// `None` when neither the shader file nor its fallback compiled.
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline> {
        self.pipelines.get(id).and_then(|entry| entry.0.as_ref())
    }

    fn get_entry_mut(&mut self, id: PipelineId) -> Option<&mut PipelineCacheEntry> {
        self.pipelines.get_mut(id)
    }
}

// Compiles shaders to pipelines, and recompiles them in the watcher thread when
// their files change.
pub(crate) struct ShaderLoader {
    pub cache: PipelineCache,
    device: wgpu::Device,
    shader_dir: PathBuf,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    _debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl ShaderLoader {
    pub fn new(device: wgpu::Device, cache_builder: PipelineCacheBuilder, config: &RenderConfig) -> Self {
        let cache = cache_builder.build();
        let (send_new_pipelines, recv_new_pipelines) = channel();

        let debouncer = if config.watch_shaders {
            watch_shaders(
                device.clone(),
                config.shader_dir.clone(),
                cache.shaders.clone(),
                send_new_pipelines,
            )
            .map_err(|e| log::warn!("Shader hot reload disabled: {e:#}"))
            .ok()
        } else {
            None
        };

        let mut shader_loader = Self {
            cache,
            device,
            shader_dir: config.shader_dir.clone(),
            receiver: recv_new_pipelines,
            _debouncer: debouncer,
        };

        shader_loader.create_all_pipelines();
        shader_loader
    }

    fn create_all_pipelines(&mut self) {
        let shaders = self.cache.shaders.clone();

        for (_, shader) in shaders.iter() {
            let pipeline = compile_file(&self.device, &self.shader_dir, &shader.def, &shader.factory)
                .or_else(|e| {
                    log::error!("{e:#}; using the built-in {} source", shader.def.name);
                    compile_source(
                        &self.device,
                        &shader.def,
                        &shader.factory,
                        shader.def.fallback_source,
                    )
                });

            match pipeline {
                Ok(pipeline) => {
                    if let Some(entry) = self.cache.get_entry_mut(shader.pipeline_id) {
                        entry.set_pipeline(pipeline);
                    }
                }
                Err(e) => log::error!("{} is unavailable: {e:#}", shader.def.name),
            }
        }
    }

    pub(crate) fn load_pending_shaders(&mut self) {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            if let Some(entry) = self.cache.get_entry_mut(pipeline_id) {
                log::info!("Shader reloaded: {}", name);
                entry.set_pipeline(pipeline);
            }
        }
    }
}

fn watch_shaders(
    device: wgpu::Device,
    shader_dir: PathBuf,
    shaders: Arc<Arena<ShaderEntry>>,
    send_new_pipelines: mpsc::Sender<(&'static str, PipelineId, wgpu::RenderPipeline)>,
) -> anyhow::Result<Debouncer<RecommendedWatcher>> {
    let absolute_shader_dir = shader_dir
        .canonicalize()
        .with_context(|| format!("Shader directory {} not found", shader_dir.display()))?;

    let watched_dir = absolute_shader_dir.clone();
    let mut debouncer = new_debouncer_opt(
        notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    if event.kind != DebouncedEventKind::Any {
                        continue;
                    }

                    let Some((_, entry)) = shaders
                        .iter()
                        .find(|(_, entry)| event.path.ends_with(entry.def.path))
                    else {
                        continue;
                    };

                    match compile_file(&device, &watched_dir, &entry.def, &entry.factory) {
                        Ok(pipeline) => {
                            // The receiver is gone once the renderer shuts down.
                            let _ = send_new_pipelines.send((
                                entry.def.name,
                                entry.pipeline_id,
                                pipeline,
                            ));
                        }
                        Err(e) => log::error!("Failed to reload shader: {e:#}"),
                    }
                }
            }
            Err(e) => log::error!("Error debouncing shader changes: {}", e),
        },
    )
    .context("Failed to create shader watcher")?;

    debouncer
        .watcher()
        .watch(&absolute_shader_dir, RecursiveMode::Recursive)
        .context("Failed to watch shader directory")?;

    Ok(debouncer)
}

fn compile_file(
    device: &wgpu::Device,
    shader_dir: &Path,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = shader_dir.join(shader_def.path);
    let shader_code = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;

    compile_source(device, shader_def, factory, &shader_code)
}

fn compile_source(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    source: &str,
) -> anyhow::Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, source);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}
