//! Cursor position tracking
//!
//! The cursor always stays inside the grid it was created for. Moves that
//! would leave the grid are clamped, and moves past the bottom edge are
//! reported to the caller as scroll requests instead of growing the grid.

/// Cursor position within a `width` x `height` grid (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    row: u16,
    col: u16,
    width: u16,
    height: u16,

    /// Set after a character lands in the last column. The wrap to the next
    /// line happens only when another printable character arrives.
    wrap_pending: bool,
}

impl Cursor {
    pub fn new(width: u16, height: u16) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            row: 0,
            col: 0,
            width,
            height,
            wrap_pending: false,
        }
    }

    /// Current `(row, col)`
    pub fn position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn col(&self) -> u16 {
        self.col
    }

    pub fn wrap_pending(&self) -> bool {
        self.wrap_pending
    }

    /// Move right after writing a character.
    ///
    /// In the last column the cursor stays put and a wrap becomes pending.
    pub fn advance(&mut self) {
        if self.col + 1 >= self.width {
            self.wrap_pending = true;
        } else {
            self.col += 1;
        }
    }

    /// Consume a pending wrap, returning whether one was pending
    pub fn take_wrap(&mut self) -> bool {
        std::mem::take(&mut self.wrap_pending)
    }

    /// Move to column 0 of the next row.
    ///
    /// Returns `true` when the cursor was already on the last row; the
    /// caller must scroll the buffer. The row stays clamped to the grid.
    pub fn newline(&mut self) -> bool {
        self.wrap_pending = false;
        self.col = 0;
        if self.row + 1 >= self.height {
            true
        } else {
            self.row += 1;
            false
        }
    }

    pub fn carriage_return(&mut self) {
        self.wrap_pending = false;
        self.col = 0;
    }

    /// Move one column left, stopping at column 0
    pub fn backspace(&mut self) {
        self.wrap_pending = false;
        self.col = self.col.saturating_sub(1);
    }

    /// Move to the next tab stop, stopping at the last column
    pub fn tab(&mut self, tab_width: u16) {
        self.wrap_pending = false;
        let next = (self.col / tab_width + 1).saturating_mul(tab_width);
        self.col = next.min(self.width - 1);
    }

    pub fn move_to(&mut self, row: u16, col: u16) {
        self.wrap_pending = false;
        self.row = row.min(self.height - 1);
        self.col = col.min(self.width - 1);
    }

    pub fn set_row(&mut self, row: u16) {
        self.move_to(row, self.col);
    }

    pub fn set_col(&mut self, col: u16) {
        self.move_to(self.row, col);
    }

    pub fn move_up(&mut self, n: u16) {
        self.move_to(self.row.saturating_sub(n), self.col);
    }

    pub fn move_down(&mut self, n: u16) {
        self.move_to(self.row.saturating_add(n), self.col);
    }

    pub fn move_forward(&mut self, n: u16) {
        self.move_to(self.row, self.col.saturating_add(n));
    }

    pub fn move_back(&mut self, n: u16) {
        self.move_to(self.row, self.col.saturating_sub(n));
    }
}
