use crate::pos::Pos;

/// Discrete playfield derived from a viewport in pixels.
///
/// Two sets of bounds exist. `cols`/`rows` are the wall: a cell is on the
/// board while its pixel origin is inside the viewport, so the last column
/// may be partly clipped. `food_cols`/`food_rows` are the smaller area food
/// is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cell_size: u32,
    pub cols: i32,
    pub rows: i32,
    pub food_cols: i32,
    pub food_rows: i32,
}

impl Grid {
    pub fn from_viewport(width: u32, height: u32, cells_across: u32) -> Self {
        let cell_size = (width.min(height) / cells_across.max(1)).max(1);
        let cols = width.div_ceil(cell_size) as i32;
        let rows = height.div_ceil(cell_size) as i32;
        let food_cols = ((width / cell_size) as i32 - 1).max(1);
        let food_rows = ((height / cell_size) as i32 - 1).max(1);
        Self { cell_size, cols, rows, food_cols, food_rows }
    }

    /// A grid measured directly in cells, food allowed everywhere.
    pub fn with_cells(cols: i32, rows: i32, cell_size: u32) -> Self {
        Self { cell_size, cols, rows, food_cols: cols, food_rows: rows }
    }

    pub fn contains(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.cols && p.y < self.rows
    }

    pub fn to_pixels(&self, p: Pos) -> (i64, i64) {
        let s = self.cell_size as i64;
        (p.x as i64 * s, p.y as i64 * s)
    }
}
