//! Bounded 2D cell storage for one participant's half of the match.

use crate::common::GameError;
use crate::config::EMPTY_MARK;

/// A bounded coordinate space `[min_row, max_row) x [min_col, max_col)`.
/// Each cell holds a marker char: empty, a vessel mark, a hit mark, or the
/// miss mark. Coordinates are signed so that candidate positions computed by
/// stepping north or west can be bounds-checked before anything is marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<char>,
    min_row: i32,
    min_col: i32,
    max_row: i32,
    max_col: i32,
    vessel_mark: char,
}

impl Grid {
    /// Create an empty grid. `vessel_mark` is the marker this grid withholds
    /// when rendered without vessels.
    pub fn new(min_row: i32, min_col: i32, max_row: i32, max_col: i32, vessel_mark: char) -> Self {
        debug_assert!(max_row > min_row && max_col > min_col);
        let rows = (max_row - min_row) as usize;
        let cols = (max_col - min_col) as usize;
        Grid {
            cells: vec![EMPTY_MARK; rows * cols],
            min_row,
            min_col,
            max_row,
            max_col,
            vessel_mark,
        }
    }

    /// Whether the coordinate lies inside the grid bounds.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.min_row && row < self.max_row && col >= self.min_col && col < self.max_col
    }

    fn index(&self, row: i32, col: i32) -> usize {
        let cols = (self.max_col - self.min_col) as usize;
        (row - self.min_row) as usize * cols + (col - self.min_col) as usize
    }

    /// Place a marker on the grid.
    pub fn set_mark(&mut self, row: i32, col: i32, mark: char) -> Result<(), GameError> {
        if !self.contains(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        let idx = self.index(row, col);
        self.cells[idx] = mark;
        Ok(())
    }

    /// The marker currently at the coordinate, if it is in bounds.
    pub fn mark_at(&self, row: i32, col: i32) -> Option<char> {
        if self.contains(row, col) {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// The marker this grid draws for vessels.
    pub fn vessel_mark(&self) -> char {
        self.vessel_mark
    }

    /// Render the grid with a dash border. When `show_vessels` is false the
    /// grid's vessel mark is replaced with open water, so an opponent sees
    /// only their own hits and misses.
    pub fn render(&self, show_vessels: bool) -> String {
        let rows = (self.max_row - self.min_row) as usize;
        let cols = (self.max_col - self.min_col) as usize;
        let mut out = String::with_capacity((rows + 2) * (cols + 3));
        let border = "-".repeat(cols + 2);
        out.push_str(&border);
        out.push('\n');
        for r in 0..rows {
            out.push('|');
            for c in 0..cols {
                let cell = self.cells[r * cols + c];
                if cell == self.vessel_mark && !show_vessels {
                    out.push(EMPTY_MARK);
                } else {
                    out.push(cell);
                }
            }
            out.push('|');
            out.push('\n');
        }
        out.push_str(&border);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(0, 0, 10, 10, 'A');
        assert!(grid.contains(0, 0));
        assert!(grid.contains(9, 9));
        assert!(!grid.contains(10, 0));
        assert!(!grid.contains(0, 10));
        assert!(!grid.contains(-1, 0));
    }

    #[test]
    fn set_mark_out_of_bounds_is_rejected() {
        let mut grid = Grid::new(0, 0, 10, 10, 'A');
        assert_eq!(
            grid.set_mark(10, 3, 'a'),
            Err(GameError::OutOfBounds { row: 10, col: 3 })
        );
    }

    #[test]
    fn render_withholds_vessel_marks() {
        let mut grid = Grid::new(0, 0, 3, 3, 'A');
        grid.set_mark(0, 0, 'A').unwrap();
        grid.set_mark(1, 1, '*').unwrap();
        let hidden = grid.render(false);
        assert!(!hidden.contains('A'));
        assert!(hidden.contains('*'));
        let shown = grid.render(true);
        assert!(shown.contains('A'));
    }
}
