//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which tracks all simulation state for the
//! frame loop: the maze and terrain the player moves through, the player itself, lights,
//! particles, and the drawable scene. Nothing here touches the GPU, so a whole frame of
//! simulation can be run in tests.

pub mod collision;
pub mod keys;
pub mod lighting;
pub mod particles;
pub mod player;

use self::collision::CollisionResolver;
use self::lighting::{Lighting, SHININESS};
use self::particles::{BURST_SIZE, ParticleSystem};
use self::player::{MovementInput, Player};
use crate::math::coordinates::constants::SPAWN_Y;
use crate::math::vec::Vec3;
use crate::maze::generator;
use crate::maze::{Cell, MazeError, MazeGrid};
use crate::renderer::uniform::FrameUniforms;
use crate::scene::{DrawOrder, DrawableKey, Scene};
use crate::terrain::HeightMap;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Maze columns.
pub const MAZE_COLS: usize = 25;
/// Maze rows.
pub const MAZE_ROWS: usize = 10;

/// Near clipping plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clipping plane distance.
pub const FAR_PLANE: f32 = 1000.0;

/// Frame delta and once-per-second FPS bookkeeping.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    /// When the timer was created.
    pub start_time: Instant,
    /// Time of the last frame.
    pub last_frame_time: Instant,
    /// Frames counted since `last_fps_time`.
    pub frame_count: u32,
    /// Most recent frames-per-second figure.
    pub current_fps: u32,
    /// Start of the current FPS window.
    pub last_fps_time: Instant,
}

impl FrameTimer {
    /// Starts timing at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            start_time: now,
            last_frame_time: now,
            frame_count: 0,
            current_fps: 0,
            last_fps_time: now,
        }
    }

    /// Registers a frame at `now`.
    ///
    /// # Returns
    /// Seconds since the previous frame, and the new FPS figure when a full second has
    /// passed since the last one was reported.
    pub fn tick(&mut self, now: Instant) -> (f32, Option<u32>) {
        let delta = now.saturating_duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.frame_count += 1;

        if now.saturating_duration_since(self.last_fps_time) >= Duration::from_secs(1) {
            self.current_fps = self.frame_count;
            self.frame_count = 0;
            self.last_fps_time = now;
            return (delta, Some(self.current_fps));
        }
        (delta, None)
    }

    /// Seconds since the timer started.
    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start_time).as_secs_f32()
    }
}

/// Represents the entire mutable simulation state.
///
/// This struct is updated every frame and contains:
/// - The maze and optional terrain heightmap.
/// - The player and the collision resolver that constrains it.
/// - Lights, particles and the drawable scene.
/// - Timing information for frame updates and FPS calculation.
pub struct GameState {
    /// The maze.
    pub maze: MazeGrid,
    /// Start cell of the maze.
    pub start: Cell,
    /// Terrain heights used outside the maze.
    pub heightmap: Option<HeightMap>,
    /// The first-person camera.
    pub player: Player,
    /// Wall and floor constraints, including the noclip flag.
    pub collision: CollisionResolver,
    /// Live particles.
    pub particles: ParticleSystem,
    /// Sun, lamps and flashlight.
    pub lighting: Lighting,
    /// Every drawable instance.
    pub scene: Scene,
    /// Frame timing.
    pub timer: FrameTimer,
}

impl GameState {
    /// Creates the state for an existing maze.
    ///
    /// The player spawns at `(start.col + 0.5, SPAWN_Y, start.row + 0.5)` in world units,
    /// looking down -Z.
    pub fn new(maze: MazeGrid, start: Cell, heightmap: Option<HeightMap>) -> Self {
        let spawn = Vec3::new(start.col as f32 + 0.5, SPAWN_Y, start.row as f32 + 0.5);
        Self {
            maze,
            start,
            heightmap,
            player: Player::new(spawn),
            collision: CollisionResolver::new(),
            particles: ParticleSystem::new(),
            lighting: Lighting::new(),
            scene: Scene::new(),
            timer: FrameTimer::new(Instant::now()),
        }
    }

    /// Generates a fresh [`MAZE_COLS`] x [`MAZE_ROWS`] maze and builds the state around it.
    ///
    /// # Errors
    /// Propagates [`MazeError`] from the generator.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        heightmap: Option<HeightMap>,
    ) -> Result<Self, MazeError> {
        let (maze, start) = generator::generate(MAZE_COLS, MAZE_ROWS, rng)?;
        log::info!("Generated {MAZE_COLS}x{MAZE_ROWS} maze, start at {start:?}");
        Ok(Self::new(maze, start, heightmap))
    }

    /// Advances the simulation by one frame.
    ///
    /// # Arguments
    /// * `input` - Movement keys held this frame
    /// * `delta_time` - Seconds since the last frame
    /// * `time` - Seconds since startup, drives the model animation
    pub fn step(&mut self, input: &MovementInput, delta_time: f32, time: f32) {
        self.lighting.update_sun(delta_time);
        self.particles.update(delta_time);

        self.player.move_with_collision(
            &self.collision,
            &self.maze,
            self.heightmap.as_ref(),
            input,
            delta_time,
        );
        self.lighting
            .follow_camera(self.player.position, self.player.front());

        self.scene.animate(time);
    }

    /// Spawns one burst of particles at the camera.
    pub fn spawn_particles<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.particles.spawn(self.player.position, BURST_SIZE, rng)
    }

    /// Toggles noclip and returns the new state.
    pub fn toggle_noclip(&mut self) -> bool {
        self.collision.toggle_noclip()
    }

    /// This frame's opaque and back-to-front transparent lists.
    pub fn draw_order(&self) -> DrawOrder<DrawableKey> {
        DrawOrder::build(self.scene.iter(), self.player.position)
    }

    /// Camera and light uniforms for the given viewport aspect ratio.
    pub fn frame_uniforms(&self, aspect_ratio: f32) -> FrameUniforms {
        FrameUniforms::new(
            self.player.view_matrix(),
            self.player
                .projection_matrix(aspect_ratio, NEAR_PLANE, FAR_PLANE),
            self.player.position,
            &self.lighting,
            SHININESS,
        )
    }

    /// Writes the maze to a timestamped file under `dir`.
    ///
    /// # Errors
    /// Any I/O failure.
    pub fn save_maze(&self, dir: &Path) -> std::io::Result<PathBuf> {
        self.maze.save_to_file(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshKey;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> GameState {
        let maze: MazeGrid = "#####\n#X..#\n#.#.#\n#..e#\n#####\n"
            .parse()
            .expect("valid maze text");
        GameState::new(maze, Cell::new(1, 1), None)
    }

    #[test]
    fn test_spawn_over_start_cell() {
        let s = state();
        assert_eq!(s.player.position, Vec3::new(1.5, -59.0, 1.5));
        assert_relative_eq!(s.player.front().z(), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_generate_uses_fixed_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = GameState::generate(&mut rng, None).expect("valid size");
        assert_eq!(s.maze.dimensions(), (MAZE_COLS, MAZE_ROWS));
        assert_eq!(s.start, Cell::new(1, 1));
    }

    /// Above the maze layer the player moves freely. With no heightmap and a wall cell
    /// below, the height is left alone.
    #[test]
    fn test_step_moves_forward() {
        let mut s = state();
        let input = MovementInput {
            forward: true,
            ..Default::default()
        };
        s.step(&input, 0.1, 0.0);

        assert_relative_eq!(s.player.position.x(), 1.5, epsilon = 1e-5);
        assert_relative_eq!(s.player.position.z(), 1.0, epsilon = 1e-5);
        assert_eq!(s.player.position.y(), -59.0);
    }

    #[test]
    fn test_step_updates_world() {
        let mut s = state();
        let model = s
            .scene
            .add_animated(Vec3::new(3.0, -60.0, 3.0), Vec3::splat(0.5), MeshKey::default());
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(s.spawn_particles(&mut rng), BURST_SIZE);

        s.step(&MovementInput::default(), 0.5, 1.0);

        assert_relative_eq!(s.lighting.sun_angle, 0.05, epsilon = 1e-6);
        assert_eq!(s.particles.len(), BURST_SIZE);
        assert_eq!(s.lighting.spot.position, s.player.position);
        let m = s.scene.get(model).expect("model exists");
        assert_relative_eq!(m.transform.origin.x(), 1.0f32.sin() * 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_particles_expire_after_lifetime() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(9);
        s.spawn_particles(&mut rng);
        for _ in 0..5 {
            s.step(&MovementInput::default(), 0.5, 0.0);
        }
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_frame_uniforms_carry_camera() {
        let s = state();
        let frame = s.frame_uniforms(4.0 / 3.0);
        assert_eq!(frame.view_pos, [1.5, -59.0, 1.5, SHININESS]);
        assert_eq!(frame.view, s.player.view_matrix().0);
    }

    /// One frame per 100 ms reports 10 FPS after the first second.
    #[test]
    fn test_frame_timer_reports_once_per_second() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(t0);
        let mut reports = Vec::new();
        for i in 1..=25 {
            let (delta, fps) = timer.tick(t0 + Duration::from_millis(100 * i));
            assert_relative_eq!(delta, 0.1, epsilon = 1e-4);
            reports.extend(fps);
        }
        assert_eq!(reports, vec![10, 10]);
        assert_relative_eq!(timer.elapsed(t0 + Duration::from_secs(3)), 3.0);
    }
}
