use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{DoorId, Position};

/// Represents errors that can occur while building or addressing a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid has no rows or no columns")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Coordinates ({x}, {y}) are out of bounds for grid size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Static classification of a maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Floor,
    Wall,
    Door(DoorId),
    Start,
    Goal,
}

/// A generic, read-only 2D grid.
///
/// Stores elements of type `T` in a flat vector using row-major order. A grid
/// is fixed once built; agents move independently of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from rows of cells.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid by calling `f(x, y)` for every cell.
    pub fn from_generator<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut cells = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Grid {
            width,
            height,
            cells,
        }
    }

    /// Returns the width of the grid.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the grid.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks if the given position lies within the grid boundaries.
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Gets the cell at the given position, or `None` when out of bounds.
    pub fn get(&self, position: Position) -> Option<&T> {
        if self.contains(position) {
            self.cells.get(position.y * self.width + position.x)
        } else {
            None
        }
    }

    /// Shifts `position` by `(dx, dy)` and returns it if it stays in bounds.
    pub fn step(&self, position: Position, dx: isize, dy: isize) -> Option<Position> {
        position.offset(dx, dy).filter(|next| self.contains(*next))
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell in
    /// row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Position::new(index % width, index / width), cell))
    }

    /// Returns a copy of the grid with the cell at `position` replaced.
    ///
    /// Used while a level is assembled; play never edits the grid.
    pub(crate) fn with_cell(mut self, position: Position, value: T) -> Result<Self, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            });
        }
        let index = position.y * self.width + position.x;
        self.cells[index] = value;
        Ok(self)
    }
}

impl Grid<Cell> {
    /// True for in-bounds cells that are not walls.
    pub fn is_walkable(&self, position: Position) -> bool {
        matches!(self.get(position), Some(cell) if *cell != Cell::Wall)
    }

    /// True for in-bounds plain floor cells.
    pub fn is_floor(&self, position: Position) -> bool {
        matches!(self.get(position), Some(Cell::Floor))
    }

    /// Positions of every cell equal to `wanted`.
    pub fn find(&self, wanted: Cell) -> impl Iterator<Item = Position> + '_ {
        self.enumerate()
            .filter(move |(_, cell)| **cell == wanted)
            .map(|(position, _)| position)
    }
}

/// Indexing using Position coordinates for access
impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: Position) -> &Self::Output {
        match self.get(index) {
            Some(cell) => cell,
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                index.x, index.y, self.width, self.height
            ),
        }
    }
}
