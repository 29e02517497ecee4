//! This module defines the `Grid`, the dense square array of cell states the ant walks on.
//!
//! Everything outside the crate only gets read access. The stepper in `simulation`
//! is the single writer; the contour tracer borrows the grid immutably.

use serde::Serialize;

use crate::types::{Cell, TurmiteError, MAX_GRID_SIZE};

/// An `N×N` grid of cell states stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates a grid of `size × size` cells, all in state `0`.
    pub fn new(size: usize) -> Result<Self, TurmiteError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(TurmiteError::InvalidGridSize(size));
        }

        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Returns the edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Resolves signed coordinates to a `Cell`, or `None` when they fall outside the grid.
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;

        (x < self.size && y < self.size).then_some(Cell { x, y })
    }

    /// Returns the state stored at `cell`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate of `cell` is outside `0..size`. Cells obtained
    /// from `Grid::cell` on the same grid are always valid.
    pub fn get(&self, cell: Cell) -> usize {
        self.cells[self.index(cell)] as usize
    }

    /// Returns the raw row-major cell states.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns a snapshot of the grid, one vector per row.
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }

    /// Counts how many cells are in each of the `states` possible states.
    pub fn histogram(&self, states: usize) -> Vec<usize> {
        let mut counts = vec![0; states];
        for &value in &self.cells {
            if let Some(count) = counts.get_mut(value as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Advances `cell` to its next state, wrapping at `states`, and returns the previous value.
    pub(crate) fn increment(&mut self, cell: Cell, states: usize) -> usize {
        let index = self.index(cell);
        let previous = self.cells[index] as usize;
        // `states <= MAX_RULE_LENGTH`, so the wrapped value always fits in a u8.
        self.cells[index] = ((previous + 1) % states) as u8;
        previous
    }

    fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.x < self.size && cell.y < self.size,
            "cell {cell} is outside the {0}x{0} grid",
            self.size
        );
        cell.y * self.size + cell.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_blank() {
        let grid = Grid::new(3).unwrap();

        assert_eq!(grid.size(), 3);
        assert_eq!(grid.rows(), vec![vec![0, 0, 0]; 3]);
        assert_eq!(grid.histogram(2), vec![9, 0]);
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(Grid::new(0), Err(TurmiteError::InvalidGridSize(0)));
        assert_eq!(
            Grid::new(MAX_GRID_SIZE + 1),
            Err(TurmiteError::InvalidGridSize(MAX_GRID_SIZE + 1))
        );
    }

    #[test]
    fn test_cell_bounds() {
        let grid = Grid::new(2).unwrap();

        assert_eq!(grid.cell(0, 0), Some(Cell::new(0, 0)));
        assert_eq!(grid.cell(1, 1), Some(Cell::new(1, 1)));
        assert_eq!(grid.cell(-1, 0), None);
        assert_eq!(grid.cell(0, -1), None);
        assert_eq!(grid.cell(2, 0), None);
        assert_eq!(grid.cell(0, 2), None);
    }

    #[test]
    fn test_increment_wraps_and_is_row_major() {
        let mut grid = Grid::new(2).unwrap();
        let cell = Cell::new(1, 0);

        assert_eq!(grid.increment(cell, 3), 0);
        assert_eq!(grid.increment(cell, 3), 1);
        assert_eq!(grid.get(cell), 2);
        assert_eq!(grid.increment(cell, 3), 2);
        assert_eq!(grid.get(cell), 0);

        grid.increment(Cell::new(0, 1), 3);
        assert_eq!(grid.cells(), &[0, 0, 1, 0]);
        assert_eq!(grid.rows(), vec![vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn test_increment_largest_rule() {
        let mut grid = Grid::new(1).unwrap();
        let cell = Cell::new(0, 0);

        for _ in 0..255 {
            grid.increment(cell, 256);
        }
        assert_eq!(grid.get(cell), 255);
        grid.increment(cell, 256);
        assert_eq!(grid.get(cell), 0);
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 grid")]
    fn test_get_rejects_column_past_the_row() {
        let mut grid = Grid::new(3).unwrap();
        grid.increment(Cell::new(0, 1), 2);

        // (3, 0) would alias (0, 1) in row-major storage.
        grid.get(Cell::new(3, 0));
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn test_increment_rejects_foreign_cell() {
        let mut grid = Grid::new(2).unwrap();
        grid.increment(Cell::new(0, 2), 2);
    }
}
