//! Coordinate system transformations for the maze.
//!
//! This module provides utilities to convert between the coordinate systems used in the scene:
//! - Maze Grid Coordinates: Used for maze generation (rows/columns)
//! - World Coordinates: 3D space where the camera moves (x, y, z)
//!
//! The maze is centred on the world origin with one world unit per cell, so the
//! centre of column `c` sits at `x = c - cols / 2 + 0.5` (and likewise for rows on Z).

mod transformations;

pub use transformations::*;

/// Constants describing where things sit in the world.
pub mod constants {
    /// Edge length of one maze cell in world units.
    pub const CELL_SIZE: f32 = 1.0;

    /// Height of the top of the maze floor tiles.
    pub const MAZE_FLOOR_Y: f32 = -68.0;

    /// Height at which wall cubes are centred.
    pub const MAZE_WALL_Y: f32 = -67.0;

    /// Camera eye height above whatever floor it is standing on.
    pub const EYE_HEIGHT: f32 = 1.0;

    /// Height at which the camera spawns over the start cell.
    pub const SPAWN_Y: f32 = -59.0;

    /// Height of the floating glass cubes, point lights and animated models.
    pub const PROP_Y: f32 = -60.0;
}
