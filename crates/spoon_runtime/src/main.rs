//! Spoon Engine Runtime
//!
//! Headless binary: builds the demo scene and runs the ECS frame loop.

mod app;
mod components;
mod config;
mod renderer;
mod systems;

use anyhow::Result;
use app::App;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Spoon Engine v{}", spoon_core::VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading config");
            AppConfig::load(&path)?
        }
        None => AppConfig::default(),
    };
    tracing::info!(
        capacity = config.world.capacity,
        frames = config.frames,
        entities = config.entities,
        "runtime configured"
    );

    let mut app = App::new(config)?;
    app.populate()?;
    app.run();

    tracing::info!("Runtime shut down cleanly");
    Ok(())
}
