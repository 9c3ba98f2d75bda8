//! Maze generation using randomized iterative depth-first carving.
//!
//! The generator works on a lattice of cells two steps apart, starting at `(1, 1)`.
//! From the cell on top of the stack it shuffles the lattice neighbours that lie inside
//! the carve-able interior, carves through to the first one that is still a wall (the
//! target plus the wall cell in between become floor) and pushes it. A cell with no
//! carve-able neighbour is popped. Every carve removes walls, so the loop ends, and the
//! carved lattice forms a spanning tree: a perfect maze.
//!
//! # Examples
//!
//! ```ignore
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let (grid, start) = generate(25, 10, &mut rng)?;
//! assert_eq!(start, Cell::new(1, 1));
//! println!("{grid}");
//! ```
//!
//! Odd dimensions give a lattice that reaches the far border. With an even dimension the
//! last row or column of the lattice is one short of `dimension - 2`, so the end marker
//! lands next to the lattice rather than on it. When both dimensions are even it only
//! touches the lattice diagonally and is walled off from the start.

use super::{Cell, MazeCell, MazeError, MazeGrid};
use rand::prelude::*;

/// Counters collected while carving.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of carve operations, one per tree edge.
    pub carves: usize,
    /// Largest stack depth reached.
    pub max_depth: usize,
}

/// Generates a `width` x `height` maze (columns x rows).
///
/// # Returns
/// The grid and the start cell, always `(1, 1)`.
///
/// # Errors
/// [`MazeError::TooSmall`] if either dimension is below 3.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<(MazeGrid, Cell), MazeError> {
    generate_with_stats(width, height, rng).map(|(grid, start, _)| (grid, start))
}

/// Same as [`generate`] but also reports [`GenerationStats`].
pub fn generate_with_stats<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<(MazeGrid, Cell, GenerationStats), MazeError> {
    if width < 3 || height < 3 {
        return Err(MazeError::TooSmall {
            cols: width,
            rows: height,
        });
    }

    let mut grid = MazeGrid::filled(width, height, MazeCell::Wall);
    let mut stats = GenerationStats::default();

    let start = Cell::new(1, 1);
    let mut stack = vec![start];
    grid.set(start, MazeCell::Floor);

    while let Some(&current) = stack.last() {
        let mut neighbours = lattice_neighbours(current, width, height);
        neighbours.shuffle(rng);

        let next = neighbours
            .into_iter()
            .find(|&(target, _)| grid.at(target) == MazeCell::Wall);

        match next {
            Some((target, between)) => {
                grid.set(between, MazeCell::Floor);
                grid.set(target, MazeCell::Floor);
                stack.push(target);
                stats.carves += 1;
                stats.max_depth = stats.max_depth.max(stack.len());
            }
            None => {
                stack.pop();
            }
        }
    }

    grid.set(start, MazeCell::Start);
    grid.set(Cell::new(height - 2, width - 2), MazeCell::End);

    log::debug!(
        "Generated {}x{} maze with {} carves:\n{}",
        width,
        height,
        stats.carves,
        grid
    );

    Ok((grid, start, stats))
}

/// Lattice neighbours two steps away, each paired with the wall cell in between.
///
/// Only neighbours inside the carve-able interior are returned, so carving never
/// touches the outer border.
fn lattice_neighbours(cell: Cell, cols: usize, rows: usize) -> Vec<(Cell, Cell)> {
    let (x, y) = (cell.col, cell.row);
    let mut result = Vec::with_capacity(4);

    if x > 2 {
        result.push((Cell::new(y, x - 2), Cell::new(y, x - 1)));
    }
    if y > 2 {
        result.push((Cell::new(y - 2, x), Cell::new(y - 1, x)));
    }
    if x + 3 < cols {
        result.push((Cell::new(y, x + 2), Cell::new(y, x + 1)));
    }
    if y + 3 < rows {
        result.push((Cell::new(y + 2, x), Cell::new(y + 1, x)));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::collections::{HashSet, VecDeque};

    /// Breadth-first search over open cells from `from`, 4-connected.
    fn reachable(grid: &MazeGrid, from: Cell) -> HashSet<Cell> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(cell) = queue.pop_front() {
            let (x, y) = (cell.col as i32, cell.row as i32);
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if grid.in_bounds(nx, ny) && grid.get(nx, ny).is_open() {
                    let next = Cell::new(ny as usize, nx as usize);
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    fn open_cells(grid: &MazeGrid) -> HashSet<Cell> {
        grid.iter()
            .filter(|(_, c)| c.is_open())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Tests that the 10-row by 25-column maze has its markers in the documented places
    /// and that a BFS from the start covers exactly the open cells.
    #[test]
    fn test_seeded_10x25_scenario() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let (grid, start) = generate(25, 10, &mut rng).expect("valid dimensions");

        assert_eq!(start, Cell::new(1, 1));
        assert_eq!(grid.at(Cell::new(1, 1)), MazeCell::Start);
        assert_eq!(grid.at(Cell::new(8, 23)), MazeCell::End);
        assert_eq!(grid.count(MazeCell::Start), 1);
        assert_eq!(grid.count(MazeCell::End), 1);

        let visited = reachable(&grid, start);
        assert_eq!(visited.len(), grid.count(MazeCell::Floor) + 2);
        assert_eq!(visited, open_cells(&grid));
    }

    /// Tests connectivity for a range of sizes and seeds: every open cell is reachable.
    #[test]
    fn test_connectivity_from_start() {
        for (w, h) in [(5, 5), (7, 9), (11, 11), (21, 15), (25, 10), (31, 31)] {
            for seed in 0..8 {
                let mut rng = StdRng::seed_from_u64(seed);
                let (grid, start) = generate(w, h, &mut rng).expect("valid dimensions");
                assert_eq!(
                    reachable(&grid, start),
                    open_cells(&grid),
                    "unreachable cells in {w}x{h} maze with seed {seed}"
                );
            }
        }
    }

    /// Tests acyclicity: lattice nodes = carves + 1 and every carve opens one passage.
    #[test]
    fn test_carved_cells_form_a_tree() {
        for (w, h) in [(5, 5), (11, 11), (21, 15), (31, 31)] {
            let mut rng = StdRng::seed_from_u64(42);
            let (grid, _, stats) = generate_with_stats(w, h, &mut rng).expect("valid dimensions");

            let open = open_cells(&grid);
            let nodes = open.iter().filter(|c| c.row % 2 == 1 && c.col % 2 == 1).count();
            let edges = open.len() - nodes;

            assert_eq!(nodes, stats.carves + 1, "{w}x{h}: nodes vs carves");
            assert_eq!(edges, nodes - 1, "{w}x{h}: edges vs nodes");
        }
    }

    /// With both dimensions even the end cell sits diagonally off the carving lattice:
    /// it is still marked, touches the carved region only at a corner, and cannot be
    /// reached from the start.
    #[test]
    fn test_even_by_even_end_is_walled_in() {
        for (w, h) in [(10, 10), (6, 8), (20, 12)] {
            for seed in 0..4 {
                let mut rng = StdRng::seed_from_u64(seed);
                let (grid, start) = generate(w, h, &mut rng).expect("valid dimensions");
                let end = Cell::new(h - 2, w - 2);

                assert_eq!(grid.at(end), MazeCell::End, "{w}x{h} seed {seed}");
                assert_eq!(grid.count(MazeCell::End), 1);

                for side in [
                    Cell::new(end.row - 1, end.col),
                    Cell::new(end.row + 1, end.col),
                    Cell::new(end.row, end.col - 1),
                    Cell::new(end.row, end.col + 1),
                ] {
                    assert_eq!(grid.at(side), MazeCell::Wall, "{w}x{h} seed {seed}: {side:?}");
                }
                assert!(grid.at(Cell::new(end.row - 1, end.col - 1)).is_open());

                let visited = reachable(&grid, start);
                assert!(!visited.contains(&end), "{w}x{h} seed {seed}: end reachable");
                assert_eq!(visited.len() + 1, open_cells(&grid).len());
            }
        }
    }

    /// The outer border is never carved.
    #[test]
    fn test_border_stays_solid() {
        let mut rng = StdRng::seed_from_u64(3);
        let (grid, _) = generate(21, 15, &mut rng).expect("valid dimensions");
        for (cell, kind) in grid.iter() {
            let on_border = cell.row == 0
                || cell.col == 0
                || cell.row == grid.rows() - 1
                || cell.col == grid.cols() - 1;
            if on_border {
                assert_eq!(kind, MazeCell::Wall, "border cell {cell:?} was opened");
            }
        }
    }

    /// Same seed, same maze.
    #[test]
    fn test_generation_is_deterministic_for_seed() {
        let a = generate(25, 10, &mut StdRng::seed_from_u64(9)).expect("valid dimensions");
        let b = generate(25, 10, &mut StdRng::seed_from_u64(9)).expect("valid dimensions");
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_tiny_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(2, 10, &mut rng).unwrap_err(),
            MazeError::TooSmall { cols: 2, rows: 10 }
        );
        assert!(generate(10, 1, &mut rng).is_err());
    }

    /// A 3x3 maze has no carve-able neighbours: just the start and the end on one cell.
    #[test]
    fn test_minimum_size_maze() {
        let mut rng = StdRng::seed_from_u64(1);
        let (grid, _, stats) = generate_with_stats(3, 3, &mut rng).expect("valid dimensions");
        assert_eq!(stats.carves, 0);
        assert_eq!(grid.at(Cell::new(1, 1)), MazeCell::End);
    }
}
