//! AppState module.
//!
//! This module defines the [`AppState`] struct, which holds everything a running session
//! needs once the window exists: the render context, the simulation, input state and the
//! settings it was started with. It also performs the one-time scene setup.

use crate::assets::AssetError;
use crate::assets::obj::load_obj;
use crate::config::AppSettings;
use crate::game::GameState;
use crate::game::keys::KeyState;
use crate::math::coordinates::constants::PROP_Y;
use crate::math::vec::Vec3;
use crate::maze::MazeError;
use crate::renderer::mesh::MeshData;
use crate::renderer::shader::load_shader_pair;
use crate::renderer::wgpu_lib::{RenderContext, RendererError, ShaderSet};
use crate::scene::Transform;
use crate::terrain::heightmap::{HEIGHT_SCALE, STEP};
use crate::terrain::{HeightMap, build_mesh, terrain_placement};
use winit::window::{CursorGrabMode, Window};

/// Heightmap image under the texture directory.
pub const HEIGHTMAP_FILE: &str = "heights.png";
/// Texture forced onto every maze floor tile and wall.
pub const MAZE_TEXTURE_FILE: &str = "box_rgb888.png";
/// Terrain atlas, also the floor tiles' own texture.
pub const TERRAIN_TEXTURE_FILE: &str = "TextureDouble_A.png";

/// Glass cube positions and their textures.
const GLASS_CUBES: [([f32; 2], &str); 3] = [
    ([5.0, 5.0], "wire2.png"),
    ([7.0, 5.0], "wg_lily_00.png"),
    ([6.0, 7.0], "wg_lily_01.png"),
];

/// Animated models: file, `(x, z)` position and uniform scale.
const MODELS: [(&str, [f32; 2], f32); 2] = [
    ("teapot_tri_vnt.obj", [3.0, 3.0], 0.5),
    ("bunny10k.obj", [3.0, 10.0], 50.0),
];

/// Anything that stops the application from starting.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    /// Window creation failed.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU setup failed.
    #[error(transparent)]
    Renderer(#[from] RendererError),

    /// A required shader or the heightmap could not be loaded.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Maze generation rejected its dimensions.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Holds all state required for a running session.
pub struct AppState {
    /// GPU resources and the frame renderer.
    pub renderer: RenderContext,
    /// The simulation.
    pub game: GameState,
    /// Keys currently held.
    pub key_state: KeyState,
    /// Settings the session was started with.
    pub settings: AppSettings,
}

impl AppState {
    /// Creates the renderer, generates the maze and builds the scene.
    ///
    /// # Arguments
    /// - `instance`: The WGPU instance.
    /// - `surface`: The WGPU surface for rendering.
    /// - `window`: The application window.
    /// - `settings`: Loaded application settings.
    ///
    /// # Errors
    /// [`StartupError`] if shaders, the heightmap or the GPU are unavailable. Missing
    /// textures and models are logged and skipped instead.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        settings: AppSettings,
    ) -> Result<Self, StartupError> {
        let shaders = ShaderSet {
            lit: load_shader_pair(
                &settings.shader_path("tex.vert.wgsl"),
                &settings.shader_path("tex.frag.wgsl"),
            )?,
            particle: load_shader_pair(
                &settings.shader_path("particle.vert.wgsl"),
                &settings.shader_path("particle.frag.wgsl"),
            )?,
        };

        let size = window.inner_size();
        let renderer = RenderContext::new(
            instance,
            surface,
            (size.width, size.height),
            settings.antialiasing_samples(),
            &shaders,
        )
        .await?;

        let heightmap = HeightMap::load(&settings.texture_path(HEIGHTMAP_FILE))?;
        let game = GameState::generate(&mut rand::thread_rng(), Some(heightmap))?;

        let mut state = Self {
            renderer,
            game,
            key_state: KeyState::new(),
            settings,
        };
        state.populate_scene();
        state.capture_mouse(window);

        log::info!("Scene ready with {} drawables", state.game.scene.len());
        Ok(state)
    }

    /// Uploads every mesh and texture and places the drawables.
    fn populate_scene(&mut self) {
        let renderer = &mut self.renderer;
        let scene = &mut self.game.scene;
        let settings = &self.settings;

        let maze_texture = renderer.load_texture(&settings.texture_path(MAZE_TEXTURE_FILE));
        let terrain_texture = renderer.load_texture(&settings.texture_path(TERRAIN_TEXTURE_FILE));
        let cube = renderer.upload_mesh(&MeshData::cube(), "Cube");

        scene.maze_texture = maze_texture;
        scene.populate_maze(&self.game.maze, cube, terrain_texture);

        for ([x, z], file) in GLASS_CUBES {
            let texture = renderer.load_texture(&settings.texture_path(file));
            scene.add_glass_cube(Vec3::new(x, PROP_Y, z), cube, texture);
        }

        for (file, [x, z], scale) in MODELS {
            let path = settings.object_path(file);
            match load_obj(&path) {
                Ok(data) => {
                    let mesh = renderer.upload_mesh(&data, file);
                    scene.add_animated(Vec3::new(x, PROP_Y, z), Vec3::splat(scale), mesh);
                }
                Err(e) => log::error!("Skipping model {}: {e}", path.display()),
            }
        }

        if let Some(map) = &self.game.heightmap {
            let mesh_data = build_mesh(map, STEP, HEIGHT_SCALE);
            let mesh = renderer.upload_mesh(&mesh_data, "Terrain");
            let (origin, scale) = terrain_placement(map);
            scene.add_terrain(Transform::at(origin, scale), mesh, terrain_texture);
        }
    }

    /// Resizes the WGPU surface and its render targets.
    ///
    /// # Arguments
    /// - `width`: New width of the surface.
    /// - `height`: New height of the surface.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Hides and locks the cursor for mouse look.
    ///
    /// Falls back to confining the cursor on platforms without pointer lock.
    pub fn capture_mouse(&self, window: &Window) {
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            log::warn!("Failed to grab cursor: {e}");
        }
        window.set_cursor_visible(false);
    }
}
