//! Coordinate system transformations between different representations.
//!
//! This module provides functions to convert between maze grid coordinates and
//! world coordinates, making it clear how to map between these systems.

use super::constants::CELL_SIZE;
use crate::math::vec::Vec3;
use crate::maze::Cell;

/// Centering offset for a maze axis with `cells` cells, in world units.
pub fn axis_offset(cells: usize) -> f32 {
    cells as f32 / 2.0 * CELL_SIZE
}

/// Converts a maze grid cell to world coordinates.
///
/// # Arguments
/// * `cell` - The maze cell in grid coordinates (row, col)
/// * `maze_dimensions` - The dimensions of the maze (cols, rows) in cells
/// * `y_position` - The desired y-coordinate (height) in the world
///
/// # Returns
/// The centre of the cell in world space.
///
/// # Coordinate System
/// - Origin (0,0,0) is at the center of the maze footprint
/// - X increases with the column
/// - Y increases upwards
/// - Z increases with the row
pub fn maze_to_world(cell: &Cell, maze_dimensions: (usize, usize), y_position: f32) -> Vec3 {
    let (cols, rows) = maze_dimensions;
    let world_x = cell.col as f32 * CELL_SIZE - axis_offset(cols) + 0.5 * CELL_SIZE;
    let world_z = cell.row as f32 * CELL_SIZE - axis_offset(rows) + 0.5 * CELL_SIZE;

    Vec3::new(world_x, y_position, world_z)
}

/// Converts a world-space position to signed grid indices `(x, z)`.
///
/// The result is not clamped: positions outside the maze footprint produce indices
/// outside `0..cols` / `0..rows`, which callers use to detect leaving the maze.
pub fn world_to_grid(position: Vec3, maze_dimensions: (usize, usize)) -> (i32, i32) {
    let (cols, rows) = maze_dimensions;
    let x = ((position.x() + axis_offset(cols)) / CELL_SIZE).floor() as i32;
    let z = ((position.z() + axis_offset(rows)) / CELL_SIZE).floor() as i32;
    (x, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Cell centres follow `grid - offset + 0.5`.
    #[test]
    fn test_maze_to_world_cell_centre() {
        let p = maze_to_world(&Cell::new(1, 1), (25, 10), -59.0);
        assert_relative_eq!(p.x(), 1.0 - 12.5 + 0.5);
        assert_relative_eq!(p.z(), 1.0 - 5.0 + 0.5);
        assert_relative_eq!(p.y(), -59.0);
    }

    /// A cell centre maps back onto the same cell.
    #[test]
    fn test_world_to_grid_round_trip() {
        let cell = Cell::new(8, 23);
        let p = maze_to_world(&cell, (25, 10), 0.0);
        assert_eq!(world_to_grid(p, (25, 10)), (23, 8));
    }

    /// Positions outside the footprint produce out-of-range indices.
    #[test]
    fn test_world_to_grid_outside() {
        assert!(world_to_grid(Vec3::new(-100.0, 0.0, 0.0), (25, 10)).0 < 0);
        assert!(world_to_grid(Vec3::new(0.0, 0.0, 100.0), (25, 10)).1 >= 10);
    }
}
