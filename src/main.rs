//! Terramaze - a maze sunk into a heightmap terrain.
//!
//! This is the main entry point. Terramaze generates a random maze, places it inside a
//! slice of terrain built from a heightmap, and lets you fly through it in first person
//! with Phong lighting, blended glass and particle bursts.
//!
//! # Architecture
//! - `app/`: Window lifecycle, event handling and the frame loop
//! - `game/`: Player, collision, lighting, particles and key bindings
//! - `maze/`: Grid type and the depth-first generator
//! - `terrain/`: Heightmap sampling and mesh building
//! - `scene/`: Drawable arena and per-frame draw ordering
//! - `renderer/`: WGPU pipelines, meshes, textures and the render context
//! - `assets/`: Texture and OBJ loading
//! - `config`: `app_settings.toml`
//! - `math/`: Vectors, matrices and coordinate conversion
//!
//! # Usage
//! Run with `cargo run`. Set `RUST_LOG=debug` for per-asset logging and the generated
//! maze layout.

#![warn(missing_docs)]
pub mod app;
pub mod assets;
pub mod config;
pub mod game;
pub mod math;
pub mod maze;
pub mod renderer;
pub mod scene;
pub mod terrain;

use config::{AppSettings, SETTINGS_FILE};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Fatal errors surfaced from [`run`].
#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Startup(#[from] app::StartupError),
}

/// Main entry point.
///
/// Initializes logging, runs the application, and logs the total run time.
/// Exits with a failure code if startup fails.
fn main() -> ExitCode {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = Instant::now();
    let result = pollster::block_on(run());
    log::info!("Elapsed time: {:.3} s", start.elapsed().as_secs_f64());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Creates the event loop and runs the application until it exits.
async fn run() -> Result<(), RunError> {
    let settings = AppSettings::load_or_default(Path::new(SETTINGS_FILE));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(settings);
    event_loop.run_app(&mut app)?;

    match app.take_startup_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
