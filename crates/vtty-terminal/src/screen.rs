//! Screen buffer implementation
//!
//! Owns the fixed 2D grid of cells that makes up the terminal display.
//! Coordinates are validated by the caller; an out-of-range row or column
//! here is a bug and panics.

/// A single cell in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character in this cell
    pub c: char,
}

impl Cell {
    pub const BLANK: Cell = Cell { c: ' ' };

    pub fn new(c: char) -> Self {
        Self { c }
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl From<char> for Cell {
    fn from(c: char) -> Self {
        Self { c }
    }
}

/// Grid of cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl ScreenBuffer {
    /// Create a blank buffer.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            width > 0 && height > 0,
            "screen buffer dimensions must be positive, got {width}x{height}"
        );

        Self {
            width,
            height,
            cells: vec![Cell::BLANK; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the cell at a position
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid.
    pub fn get(&self, row: u16, col: u16) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Overwrite the cell at a position
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid.
    pub fn set(&mut self, row: u16, col: u16, cell: impl Into<Cell>) {
        let index = self.index(row, col);
        self.cells[index] = cell.into();
    }

    /// Cells of one row
    pub fn row(&self, row: u16) -> &[Cell] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.width as usize]
    }

    /// Iterate over rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width as usize)
    }

    /// Drop the top row and append a blank row at the bottom
    pub fn shift_up(&mut self) {
        let width = self.width as usize;
        self.cells.rotate_left(width);

        let clear_start = self.cells.len() - width;
        self.cells[clear_start..].fill(Cell::BLANK);
    }

    /// Drop the first cell of a row, shift the rest left and blank the last cell
    pub fn shift_row_left(&mut self, row: u16) {
        let start = self.index(row, 0);
        let end = start + self.width as usize;
        self.cells[start..end].rotate_left(1);
        self.cells[end - 1] = Cell::BLANK;
    }

    /// Blank a whole row
    pub fn clear_row(&mut self, row: u16) {
        let start = self.index(row, 0);
        self.cells[start..start + self.width as usize].fill(Cell::BLANK);
    }

    /// Blank a row from `col` to the end of the row
    pub fn clear_row_from(&mut self, row: u16, col: u16) {
        let start = self.index(row, col);
        let end = self.index(row, 0) + self.width as usize;
        self.cells[start..end].fill(Cell::BLANK);
    }

    /// Blank a row from its start up to and including `col`
    pub fn clear_row_to(&mut self, row: u16, col: u16) {
        let start = self.index(row, 0);
        let end = self.index(row, col);
        self.cells[start..=end].fill(Cell::BLANK);
    }

    /// Blank every cell from the position to the end of the screen
    pub fn clear_from(&mut self, row: u16, col: u16) {
        let start = self.index(row, col);
        self.cells[start..].fill(Cell::BLANK);
    }

    /// Blank every cell from the start of the screen up to, but not
    /// including, the position
    pub fn clear_to(&mut self, row: u16, col: u16) {
        let end = self.index(row, col);
        self.cells[..end].fill(Cell::BLANK);
    }

    /// Blank the whole grid
    pub fn clear_all(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, row: u16, col: u16) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        (row as usize) * (self.width as usize) + (col as usize)
    }
}
