use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "sceneview", about = "Interactive viewer for JSON scene descriptions")]
pub struct ViewerArgs {
    /// Scene description to load
    #[arg(long, default_value = "assets/scene.json")]
    pub scene: PathBuf,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,

    #[arg(long, default_value = "Scene Viewer")]
    pub title: String,

    /// Directory containing the WGSL shaders
    #[arg(long, default_value = "assets/shaders")]
    pub shader_dir: PathBuf,

    /// Disable recompiling shaders when their files change
    #[arg(long, default_value_t = false)]
    pub no_shader_reload: bool,

    /// Radians per second while a rotate key is held
    #[arg(long, default_value_t = 1.5)]
    pub rotation_speed: f32,

    /// Units per second while a translate key is held
    #[arg(long, default_value_t = 2.0)]
    pub translation_speed: f32,

    /// Factor applied per scale key press
    #[arg(long, default_value_t = 1.1)]
    pub scale_step: f32,

    #[arg(long, default_value_t = 2.5)]
    pub camera_speed: f32,

    #[arg(long, default_value_t = 0.1)]
    pub mouse_sensitivity: f32,
}

impl ViewerArgs {
    pub fn step_settings(&self) -> StepSettings {
        StepSettings {
            rotation_speed: self.rotation_speed,
            translation_speed: self.translation_speed,
            scale_step: self.scale_step,
            camera_speed: self.camera_speed,
            mouse_sensitivity: self.mouse_sensitivity,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            shader_dir: self.shader_dir.clone(),
            watch_shaders: !self.no_shader_reload,
        }
    }
}

/// How far one input step moves, turns or scales things.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSettings {
    pub rotation_speed: f32,
    pub translation_speed: f32,
    pub scale_step: f32,
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 1.5,
            translation_speed: 2.0,
            scale_step: 1.1,
            camera_speed: 2.5,
            mouse_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub shader_dir: PathBuf,
    pub watch_shaders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from("assets/shaders"),
            watch_shaders: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_step_settings_default() {
        let args = ViewerArgs::parse_from(["sceneview"]);

        assert_eq!(args.step_settings(), StepSettings::default());
        assert_eq!(args.scene, PathBuf::from("assets/scene.json"));
        assert_eq!((args.width, args.height), (800, 600));
        assert!(args.render_config().watch_shaders);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = ViewerArgs::parse_from([
            "sceneview",
            "--scene",
            "other.json",
            "--scale-step",
            "2",
            "--no-shader-reload",
        ]);

        assert_eq!(args.scene, PathBuf::from("other.json"));
        assert_eq!(args.step_settings().scale_step, 2.0);
        assert!(!args.render_config().watch_shaders);
    }
}
