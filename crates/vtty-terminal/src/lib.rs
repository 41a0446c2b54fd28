//! Virtual terminal emulation for vtty
//!
//! Emulates a fixed-size character grid fed by two output channels (primary
//! and diagnostic) that share one cursor and one control-sequence parser.
//! The grid can be rendered as a text snapshot at any time.

pub mod config;
pub mod cursor;
pub mod display;
pub mod emulator;
pub mod parser;
pub mod screen;

pub use config::TerminalConfig;
pub use cursor::Cursor;
pub use display::{render, render_trimmed, Snapshot};
pub use emulator::{Channel, Terminal, VirtualTerminal};
pub use parser::{ClearMode, Command, ControlChar, Parser, Perform};
pub use screen::{Cell, ScreenBuffer};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error("Invalid terminal dimensions: {width}x{height} (both must be positive)")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("Invalid terminal configuration: {0}")]
    InvalidConfig(String),

    #[error("UTF-8 decoding error: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Create a terminal of the given size.
///
/// Shorthand for [`VirtualTerminal::new`].
pub fn create_terminal(width: u16, height: u16) -> Result<VirtualTerminal> {
    VirtualTerminal::new(width, height)
}
