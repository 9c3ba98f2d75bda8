//! Heightmap terrain surrounding the maze.
//!
//! The mesh is built once at startup; the same [`HeightMap`] is then kept by the game
//! state for camera height queries.

pub mod heightmap;

pub use heightmap::{HeightMap, build_mesh, subtexture_by_height, terrain_placement};
