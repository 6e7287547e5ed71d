use anyhow::Result;
use clap::Parser;

mod camera;
mod config;
mod engine;
mod input;
mod overlay;
mod rendering;
mod scene_graph;
mod scene_loader;
mod viewer;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = config::ViewerArgs::parse();
    pollster::block_on(window::run(args))?;

    Ok(())
}
