//! Maze grid storage, text encoding, and generation.
//!
//! A [`MazeGrid`] is a dense `rows x cols` array of [`MazeCell`]s. It is produced once by
//! [`generator::generate`] and treated as read-only for the rest of the session.
//!
//! The text form used for logging and snapshot files is one line per row:
//!
//! ```text
//! #####
//! #X..#
//! ###.#
//! #..e#
//! #####
//! ```
//!
//! - `#` wall
//! - `.` floor
//! - `X` start
//! - `e` end

pub mod generator;

use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use generator::{GenerationStats, generate, generate_with_stats};

/// Represents a cell in the maze grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index of the cell
    pub row: usize,
    /// Column index of the cell
    pub col: usize,
}

impl Cell {
    /// Creates a new Cell with the given coordinates
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeCell {
    /// Solid, blocks movement.
    Wall,
    /// Carved passage.
    Floor,
    /// The single entry cell.
    Start,
    /// The single goal cell.
    End,
}

impl MazeCell {
    /// Anything that is not a wall.
    pub fn is_open(self) -> bool {
        self != MazeCell::Wall
    }

    /// Character used in the text encoding.
    pub fn symbol(self) -> char {
        match self {
            MazeCell::Wall => '#',
            MazeCell::Floor => '.',
            MazeCell::Start => 'X',
            MazeCell::End => 'e',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '#' => Some(MazeCell::Wall),
            '.' | ' ' => Some(MazeCell::Floor),
            'X' => Some(MazeCell::Start),
            'e' => Some(MazeCell::End),
            _ => None,
        }
    }
}

/// Errors from building or parsing a maze.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// One of the dimensions is below the 3-cell minimum.
    #[error("maze must be at least 3x3, got {cols}x{rows}")]
    TooSmall {
        /// Requested column count.
        cols: usize,
        /// Requested row count.
        rows: usize,
    },
    /// Text encoding had rows of differing length.
    #[error("maze row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// Text encoding contained a character outside `#.Xe`.
    #[error("unexpected maze symbol {symbol:?} at row {row}, col {col}")]
    BadSymbol {
        /// The character found.
        symbol: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        col: usize,
    },
}

/// A fixed-size grid of maze cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<MazeCell>,
}

impl MazeGrid {
    /// Creates a grid filled entirely with `fill`.
    pub fn filled(cols: usize, rows: usize, fill: MazeCell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Number of rows (Z extent).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (X extent).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(cols, rows)`, the order the coordinate helpers expect.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Whether signed grid indices `(x, y)` fall inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    /// Clamped lookup: out-of-range coordinates read the nearest edge cell.
    pub fn get(&self, x: i32, y: i32) -> MazeCell {
        let x = x.clamp(0, self.cols as i32 - 1) as usize;
        let y = y.clamp(0, self.rows as i32 - 1) as usize;
        self.cells[y * self.cols + x]
    }

    /// Lookup by cell, clamped like [`MazeGrid::get`].
    pub fn at(&self, cell: Cell) -> MazeCell {
        self.get(cell.col as i32, cell.row as i32)
    }

    pub(crate) fn set(&mut self, cell: Cell, value: MazeCell) {
        let index = cell.row * self.cols + cell.col;
        self.cells[index] = value;
    }

    /// Iterates every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, MazeCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (Cell::new(i / self.cols, i % self.cols), c))
    }

    /// Number of cells holding `kind`.
    pub fn count(&self, kind: MazeCell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// First cell holding `kind`, scanning row by row.
    pub fn find(&self, kind: MazeCell) -> Option<Cell> {
        self.iter().find(|&(_, c)| c == kind).map(|(cell, _)| cell)
    }

    /// Writes the text encoding to a timestamped `.mz` file inside `dir`.
    ///
    /// The file name follows `Maze_%m-%d-%y_%I-%M%p.mz`, so saving twice in the same
    /// minute overwrites the earlier snapshot.
    ///
    /// # Returns
    /// The path of the written file.
    ///
    /// # Errors
    /// Any I/O failure creating the directory or writing the file.
    pub fn save_to_file(&self, dir: &Path) -> Result<PathBuf, std::io::Error> {
        let timestamp = Local::now().format("Maze_%m-%d-%y_%I-%M%p.mz").to_string();
        fs::create_dir_all(dir)?;

        let output_path = dir.join(timestamp);
        fs::write(&output_path, self.to_string())?;

        log::info!("Maze saved to: {}", output_path.display());
        Ok(output_path)
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for MazeGrid {
    type Err = MazeError;

    /// Parses the text encoding back into a grid. Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if rows < 3 || cols < 3 {
            return Err(MazeError::TooSmall { cols, rows });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = MazeCell::from_symbol(symbol)
                    .ok_or(MazeError::BadSymbol { symbol, row, col })?;
                cells.push(cell);
            }
        }

        Ok(Self { rows, cols, cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "#####\n#X..#\n###.#\n#..e#\n#####\n";

    /// Tests that the text encoding survives a parse/print cycle unchanged.
    #[test]
    fn test_display_matches_parsed_text() {
        let grid: MazeGrid = SMALL.parse().expect("valid maze text");
        assert_eq!(grid.to_string(), SMALL);
        assert_eq!(grid.dimensions(), (5, 5));
        assert_eq!(grid.find(MazeCell::Start), Some(Cell::new(1, 1)));
        assert_eq!(grid.find(MazeCell::End), Some(Cell::new(3, 3)));
    }

    /// Out-of-range reads clamp to the nearest edge instead of panicking.
    #[test]
    fn test_get_clamps_out_of_range() {
        let grid: MazeGrid = SMALL.parse().expect("valid maze text");
        assert_eq!(grid.get(-5, 1), MazeCell::Wall);
        assert_eq!(grid.get(1, -3), MazeCell::Wall);
        assert_eq!(grid.get(100, 100), grid.get(4, 4));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(5, 0));
        assert!(grid.in_bounds(4, 4));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "###\n#?#\n###".parse::<MazeGrid>(),
            Err(MazeError::BadSymbol {
                symbol: '?',
                row: 1,
                col: 1
            })
        );
        assert!(matches!(
            "###\n##\n###".parse::<MazeGrid>(),
            Err(MazeError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            "##\n##".parse::<MazeGrid>(),
            Err(MazeError::TooSmall { .. })
        ));
    }

    /// Tests that a snapshot lands in the requested directory with the maze text.
    #[test]
    fn test_save_to_file_writes_snapshot() {
        let grid: MazeGrid = SMALL.parse().expect("valid maze text");
        let dir = std::env::temp_dir().join(format!("terramaze-save-{}", std::process::id()));

        let path = grid.save_to_file(&dir).expect("snapshot should be written");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("Maze_") && name.ends_with(".mz"), "bad name {name}");
        assert_eq!(fs::read_to_string(&path).expect("readable snapshot"), SMALL);

        let _ = fs::remove_dir_all(&dir);
    }
}
