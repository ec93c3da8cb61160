// BoxPick-3D: color-buffer picking of a stack of boxes

// Module declarations
mod app;
mod config;
mod error;
mod math;
mod picking;
mod renderer;
mod scene;

use winit::event_loop::EventLoop;

use crate::app::App;
use crate::config::AppConfig;
use crate::scene::Scene;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::default();
    let scene = Scene::stacked_boxes(config.background)?;
    log::info!(
        "{} boxes, window {}x{} at ({}, {})",
        scene.objects().len(),
        config.window.width,
        config.window.height,
        config.window.x,
        config.window.y
    );

    let event_loop = EventLoop::new()?;
    let renderer = renderer::Renderer::new(&event_loop, &config.window, config.light_position).await?;

    renderer.run(event_loop, App::new(&config, scene))?;
    Ok(())
}
