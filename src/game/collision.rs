//! Camera collision against the maze and height following over the terrain.
//!
//! # Overview
//!
//! The camera is treated as a disk of radius [`PLAYER_RADIUS`] on the XZ plane. Maze walls
//! are unit squares centred on their cells. Blocking only applies while the camera is
//! inside the maze layer (`-70 < y < -65`); above or below it the camera flies freely.
//!
//! Resolution is a three-step fallback:
//!
//! 1. accept the proposed position if it is clear,
//! 2. otherwise try the X component of the move alone, then the Z component alone,
//! 3. otherwise stay put.
//!
//! Step 2 is what lets the camera slide along a wall when moving diagonally into it.
//!
//! # Height following
//!
//! After the horizontal move the camera's Y eases toward a target height: the maze floor
//! plus eye height when standing on an open maze cell, or the terrain surface under the
//! camera otherwise. Easing moves a fixed fraction ([`HEIGHT_EASING`]) of the remaining
//! distance each frame, so the camera never snaps.
//!
//! # Noclip
//!
//! [`CollisionResolver`] owns the noclip flag. While it is set both blocking and height
//! following are skipped.

use crate::game::player::{MovementInput, Player};
use crate::math::coordinates::constants::{EYE_HEIGHT, MAZE_FLOOR_Y};
use crate::math::coordinates::{axis_offset, world_to_grid};
use crate::math::mix;
use crate::math::vec::Vec3;
use crate::maze::{MazeCell, MazeGrid};
use crate::terrain::heightmap::{BASE_Y, HEIGHT_SCALE, HeightMap};

/// Radius of the camera's collision disk.
pub const PLAYER_RADIUS: f32 = 0.20;

/// Half the edge length of a wall cell.
pub const HALF_CELL: f32 = 0.5;

/// Exclusive Y range in which walls block movement.
pub const COLLISION_BAND: (f32, f32) = (-70.0, -65.0);

/// Exclusive Y range in which the camera snaps toward the maze floor.
pub const FLOOR_BAND: (f32, f32) = (-70.0, -58.0);

/// Fraction of the remaining height difference covered per frame.
pub const HEIGHT_EASING: f32 = 0.1;

fn in_band(y: f32, band: (f32, f32)) -> bool {
    y > band.0 && y < band.1
}

/// Resolves camera movement against a maze grid and a heightmap.
#[derive(Debug, Default, Clone)]
pub struct CollisionResolver {
    noclip: bool,
}

impl CollisionResolver {
    /// Creates a resolver with noclip off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether noclip is active.
    pub fn noclip(&self) -> bool {
        self.noclip
    }

    /// Flips noclip and returns the new state.
    pub fn toggle_noclip(&mut self) -> bool {
        self.noclip = !self.noclip;
        log::info!("Noclip {}", if self.noclip { "enabled" } else { "disabled" });
        self.noclip
    }

    /// Tests whether a disk at `pos` overlaps any wall cell.
    ///
    /// Only cells touched by the disk's bounding square are inspected. Cells outside the
    /// grid never block. The Y component of `pos` is ignored.
    pub fn is_blocked(&self, grid: &MazeGrid, pos: Vec3) -> bool {
        let (cols, rows) = grid.dimensions();
        let (offset_x, offset_z) = (axis_offset(cols), axis_offset(rows));

        let min_x = (pos.x() - PLAYER_RADIUS + offset_x).floor() as i32;
        let max_x = (pos.x() + PLAYER_RADIUS + offset_x).floor() as i32;
        let min_z = (pos.z() - PLAYER_RADIUS + offset_z).floor() as i32;
        let max_z = (pos.z() + PLAYER_RADIUS + offset_z).floor() as i32;

        let reach = HALF_CELL + PLAYER_RADIUS;
        (min_x..=max_x).any(|x| {
            (min_z..=max_z).any(|z| {
                if !grid.in_bounds(x, z) || grid.get(x, z) != MazeCell::Wall {
                    return false;
                }
                let centre_x = x as f32 - offset_x + HALF_CELL;
                let centre_z = z as f32 - offset_z + HALF_CELL;
                (pos.x() - centre_x).abs() < reach && (pos.z() - centre_z).abs() < reach
            })
        })
    }

    /// Resolves a move from `current` to `proposed`.
    ///
    /// # Returns
    /// - `proposed` when noclip is on, when `proposed.y` is outside the collision band, or
    ///   when `proposed` is clear
    /// - `current` moved along X only, if that is clear
    /// - `current` moved along Z only, if that is clear
    /// - `current` otherwise
    pub fn resolve(&self, grid: &MazeGrid, current: Vec3, proposed: Vec3) -> Vec3 {
        if self.noclip || !in_band(proposed.y(), COLLISION_BAND) {
            return proposed;
        }
        if !self.is_blocked(grid, proposed) {
            return proposed;
        }

        let delta = proposed - current;
        let slide_x = current + Vec3::new(delta.x(), 0.0, 0.0);
        if !self.is_blocked(grid, slide_x) {
            return slide_x;
        }
        let slide_z = current + Vec3::new(0.0, 0.0, delta.z());
        if !self.is_blocked(grid, slide_z) {
            return slide_z;
        }

        current
    }

    /// Height the camera should settle at above `pos`, if any.
    ///
    /// Open maze cells win while `pos.y` is inside the floor band; otherwise the terrain
    /// under `pos` is used. Returns `None` with noclip on or when neither applies.
    pub fn target_height(
        &self,
        grid: &MazeGrid,
        heightmap: Option<&HeightMap>,
        pos: Vec3,
    ) -> Option<f32> {
        if self.noclip {
            return None;
        }

        let (x, z) = world_to_grid(pos, grid.dimensions());
        if grid.in_bounds(x, z) && in_band(pos.y(), FLOOR_BAND) && grid.get(x, z).is_open() {
            return Some(MAZE_FLOOR_Y + EYE_HEIGHT);
        }

        heightmap.map(|map| {
            let pixel = map.sample_at_world(pos.x(), pos.z()) as f32;
            -(pixel * HEIGHT_SCALE) + BASE_Y + EYE_HEIGHT
        })
    }

    /// Eased Y for the camera at `pos`.
    ///
    /// Returns `pos.y` unchanged when [`CollisionResolver::target_height`] has no target.
    pub fn follow_height(&self, grid: &MazeGrid, heightmap: Option<&HeightMap>, pos: Vec3) -> f32 {
        match self.target_height(grid, heightmap, pos) {
            Some(target) => mix(pos.y(), target, HEIGHT_EASING),
            None => pos.y(),
        }
    }
}

impl Player {
    /// Moves the player for one frame: input, wall collision, then height follow.
    ///
    /// # Arguments
    /// * `resolver` - Owns the noclip flag and collision constants
    /// * `grid` - The maze to collide against
    /// * `heightmap` - Terrain used when the player is outside the maze
    /// * `input` - Movement keys held this frame
    /// * `delta_time` - Seconds since the last frame
    pub fn move_with_collision(
        &mut self,
        resolver: &CollisionResolver,
        grid: &MazeGrid,
        heightmap: Option<&HeightMap>,
        input: &MovementInput,
        delta_time: f32,
    ) {
        let proposed = self.position + self.movement_delta(input, delta_time);
        self.position = resolver.resolve(grid, self.position, proposed);

        let y = resolver.follow_height(grid, heightmap, self.position);
        self.position = self.position.with_y(y);
    }
}
