//! Grid-shape normalization.
//!
//! Shaped recipes match up to translation: a two-cell vertical pair of
//! planks is the same recipe whether the player places it in the top-left
//! or bottom-right of the grid. Both recipe definitions and the live grid
//! are reduced to the minimal bounding box of their non-empty cells before
//! comparison, which makes the comparison translation-invariant.

use crate::recipe::RecipeCell;
use serde::{Deserialize, Serialize};

/// A normalized grid shape: the minimal bounding box of non-empty cells,
/// re-indexed so the first row and column are `(0, 0)`.
///
/// An entirely empty source grid normalizes to the degenerate `1x1` empty
/// pattern. No loadable recipe has an empty pattern, so empty grids match
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    height: usize,
    width: usize,
    cells: Vec<RecipeCell>,
}

impl Pattern {
    /// Normalize a row-major cell grid of the given width.
    ///
    /// Returns the pattern together with the `(row, col)` origin of the
    /// bounding box within the source grid, which shaped consumption uses
    /// to address the live grid cells that took part in the match.
    pub fn normalize(cells: &[RecipeCell], width: usize) -> (Pattern, (usize, usize)) {
        debug_assert!(width > 0 && cells.len() % width == 0);
        let height = cells.len() / width;

        let mut row_min = height;
        let mut row_max = 0usize;
        let mut col_min = width;
        let mut col_max = 0usize;
        for row in 0..height {
            for col in 0..width {
                if cells[row * width + col].item_id != 0 {
                    row_min = row_min.min(row);
                    row_max = row_max.max(row);
                    col_min = col_min.min(col);
                    col_max = col_max.max(col);
                }
            }
        }

        if row_min > row_max {
            // No occupied cells at all.
            return (
                Pattern {
                    height: 1,
                    width: 1,
                    cells: vec![RecipeCell::EMPTY],
                },
                (0, 0),
            );
        }

        let out_height = row_max - row_min + 1;
        let out_width = col_max - col_min + 1;
        let mut out = Vec::with_capacity(out_height * out_width);
        for row in 0..out_height {
            for col in 0..out_width {
                out.push(cells[(row_min + row) * width + (col_min + col)]);
            }
        }
        (
            Pattern {
                height: out_height,
                width: out_width,
                cells: out,
            },
            (row_min, col_min),
        )
    }

    /// Bounding-box height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounding-box width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at `(row, col)` within the bounding box.
    pub fn cell(&self, row: usize, col: usize) -> RecipeCell {
        debug_assert!(row < self.height && col < self.width);
        self.cells[row * self.width + col]
    }

    /// Iterate `(row, col, cell)` over the bounding box.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, RecipeCell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / width, i % width, *cell))
    }

    /// Whether the pattern contains no occupied cell (only the degenerate
    /// empty pattern does).
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.item_id == 0)
    }

    /// The row-major cells of the bounding box.
    pub fn cells(&self) -> &[RecipeCell] {
        &self.cells
    }
}
