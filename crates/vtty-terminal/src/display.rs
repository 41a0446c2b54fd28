//! Terminal display conversion
//!
//! Converts the grid to text. The fixed form always has `height` lines of
//! exactly `width` characters joined by `\n`, with no trailing newline.

use std::fmt;

use crate::{cursor::Cursor, screen::ScreenBuffer};

/// Render the grid in its fixed-size form
pub fn render(buffer: &ScreenBuffer) -> String {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let mut out = String::with_capacity((width + 1) * height);

    for (i, row) in buffer.rows().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.extend(row.iter().map(|cell| cell.c));
    }

    out
}

/// Render the grid with trailing blanks removed from every line and
/// trailing empty lines dropped
pub fn render_trimmed(buffer: &ScreenBuffer) -> String {
    let lines: Vec<String> = buffer
        .rows()
        .map(|row| row.iter().map(|cell| cell.c).collect::<String>())
        .collect();
    trim_lines(&lines)
}

fn trim_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines
        .iter()
        .map(|line| line.as_ref().trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n");
    joined.trim_end_matches(&['\n', ' '][..]).to_string()
}

/// Point-in-time copy of the grid text and cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u16,
    pub height: u16,
    /// One string per row, each exactly `width` characters
    pub rows: Vec<String>,
    pub cursor_row: u16,
    pub cursor_col: u16,
}

impl Snapshot {
    pub fn capture(buffer: &ScreenBuffer, cursor: &Cursor) -> Self {
        let (cursor_row, cursor_col) = cursor.position();
        Self {
            width: buffer.width(),
            height: buffer.height(),
            rows: buffer
                .rows()
                .map(|row| row.iter().map(|cell| cell.c).collect())
                .collect(),
            cursor_row,
            cursor_col,
        }
    }

    /// Fixed-size text form
    pub fn text(&self) -> String {
        self.rows.join("\n")
    }

    /// Compact form with trailing whitespace removed
    pub fn trimmed(&self) -> String {
        trim_lines(&self.rows)
    }

    /// Fixed-size form inside an ASCII border
    pub fn framed(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.width as usize));
        let mut out = String::with_capacity((self.width as usize + 3) * (self.height as usize + 2));

        out.push_str(&border);
        for row in &self.rows {
            out.push_str("\n|");
            out.push_str(row);
            out.push('|');
        }
        out.push('\n');
        out.push_str(&border);
        out
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}
