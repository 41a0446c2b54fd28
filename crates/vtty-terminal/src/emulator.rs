//! Terminal emulator core implementation
//!
//! [`Terminal`] owns the grid, cursor and parser and processes text on a
//! single thread. [`VirtualTerminal`] wraps it behind one mutex so the
//! primary and secondary channels can be written from different threads
//! while sharing a single cursor and parser.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::{
    config::TerminalConfig,
    cursor::Cursor,
    display::{self, Snapshot},
    parser::{ClearMode, Command, ControlChar, Parser, Perform, State},
    screen::ScreenBuffer,
    Result,
};

/// Output channel feeding the shared grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Regular program output (stdout)
    Primary,
    /// Diagnostic output (stderr)
    Secondary,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Primary => f.write_str("primary"),
            Channel::Secondary => f.write_str("secondary"),
        }
    }
}

/// Grid and cursor; the target of parsed actions
#[derive(Debug, Clone)]
struct Screen {
    buffer: ScreenBuffer,
    cursor: Cursor,
    tab_width: u16,
}

impl Screen {
    fn new(config: &TerminalConfig) -> Self {
        Self {
            buffer: ScreenBuffer::new(config.width, config.height),
            cursor: Cursor::new(config.width, config.height),
            tab_width: config.tab_width,
        }
    }

    fn linefeed(&mut self) {
        if self.cursor.newline() {
            self.buffer.shift_up();
        }
    }

    /// Carry out a deferred wrap before the next character is drawn
    fn wrap(&mut self) {
        if self.buffer.height() == 1 {
            // A single row has nowhere to wrap to, so it scrolls sideways.
            self.buffer.shift_row_left(0);
        } else {
            self.linefeed();
        }
    }

    fn clear(&mut self) {
        self.buffer.clear_all();
        self.cursor.move_to(0, 0);
    }
}

impl Perform for Screen {
    fn print(&mut self, c: char) {
        if self.cursor.take_wrap() {
            self.wrap();
        }

        let (row, col) = self.cursor.position();
        self.buffer.set(row, col, c);
        self.cursor.advance();
    }

    fn execute(&mut self, control: ControlChar) {
        match control {
            ControlChar::LineFeed | ControlChar::VerticalTab => self.linefeed(),
            ControlChar::CarriageReturn => self.cursor.carriage_return(),
            ControlChar::Backspace => self.cursor.backspace(),
            ControlChar::Tab => self.cursor.tab(self.tab_width),
            ControlChar::FormFeed => self.clear(),
            ControlChar::Bell => {}
        }
    }

    fn csi_dispatch(&mut self, command: Command) {
        let (row, col) = self.cursor.position();

        match command {
            Command::CursorUp(n) => self.cursor.move_up(n),
            Command::CursorDown(n) => self.cursor.move_down(n),
            Command::CursorForward(n) => self.cursor.move_forward(n),
            Command::CursorBack(n) => self.cursor.move_back(n),
            Command::CursorNextLine(n) => {
                self.cursor.move_down(n);
                self.cursor.set_col(0);
            }
            Command::CursorPrevLine(n) => {
                self.cursor.move_up(n);
                self.cursor.set_col(0);
            }
            Command::CursorColumn(col) => self.cursor.set_col(col),
            Command::CursorRow(row) => self.cursor.set_row(row),
            Command::CursorPosition { row, col } => self.cursor.move_to(row, col),

            Command::ClearScreen(ClearMode::Entire) => self.clear(),
            Command::ClearScreen(ClearMode::ToEnd) => self.buffer.clear_from(row, col),
            Command::ClearScreen(ClearMode::ToBeginning) => self.buffer.clear_to(row, col),

            Command::ClearLine(ClearMode::Entire) => self.buffer.clear_row(row),
            Command::ClearLine(ClearMode::ToEnd) => self.buffer.clear_row_from(row, col),
            Command::ClearLine(ClearMode::ToBeginning) => self.buffer.clear_row_to(row, col),

            // No colors or attributes are tracked
            Command::SetGraphicsRendition => {}
        }
    }
}

/// Single-threaded terminal emulator
#[derive(Debug, Clone)]
pub struct Terminal {
    parser: Parser,
    screen: Screen,
}

impl Terminal {
    /// Create a terminal with given dimensions and default policies
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::with_config(TerminalConfig::new(width, height))
    }

    pub fn with_config(config: TerminalConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            parser: Parser::new(),
            screen: Screen::new(&config),
        })
    }

    /// Process decoded text
    pub fn process(&mut self, text: &str) {
        self.parser.advance_str(&mut self.screen, text);
    }

    /// Process raw bytes.
    ///
    /// The whole chunk must be valid UTF-8; on failure nothing is applied.
    pub fn process_bytes(&mut self, data: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(data)?;
        self.process(text);
        Ok(())
    }

    /// Blank the grid, home the cursor and drop any partial sequence
    pub fn clear(&mut self) {
        self.screen.clear();
        self.parser.reset();
    }

    /// Get terminal dimensions as `(width, height)`
    pub fn dimensions(&self) -> (u16, u16) {
        (self.screen.buffer.width(), self.screen.buffer.height())
    }

    /// Cursor position as `(row, col)`
    pub fn cursor_position(&self) -> (u16, u16) {
        self.screen.cursor.position()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.screen.cursor
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.screen.buffer
    }

    pub fn parser_state(&self) -> State {
        self.parser.state()
    }

    /// Fixed-size text rendering of the grid
    pub fn render(&self) -> String {
        display::render(&self.screen.buffer)
    }

    /// Create a snapshot of current terminal state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.screen.buffer, &self.screen.cursor)
    }
}

/// Thread-safe terminal shared by the primary and secondary channels.
///
/// Cloning yields another handle to the same terminal. Every write holds
/// the lock for the whole chunk, so chunks are applied one at a time in the
/// order the lock is acquired and a snapshot never sees half a chunk.
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    terminal: Arc<Mutex<Terminal>>,
    config: TerminalConfig,
}

impl VirtualTerminal {
    /// Create a terminal of the given size
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::with_config(TerminalConfig::new(width, height))
    }

    pub fn with_config(config: TerminalConfig) -> Result<Self> {
        let terminal = Terminal::with_config(config)?;
        debug!(
            width = config.width,
            height = config.height,
            tab_width = config.tab_width,
            "created virtual terminal"
        );

        Ok(Self {
            terminal: Arc::new(Mutex::new(terminal)),
            config,
        })
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn width(&self) -> u16 {
        self.config.width
    }

    pub fn height(&self) -> u16 {
        self.config.height
    }

    /// `(width, height)`
    pub fn size(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }

    /// Write a chunk to one of the channels.
    ///
    /// The chunk is validated as UTF-8 before the terminal is touched, so a
    /// rejected chunk leaves no trace.
    pub fn write(&self, channel: Channel, data: impl AsRef<[u8]>) -> Result<()> {
        let data = data.as_ref();
        let text = std::str::from_utf8(data).map_err(|e| {
            debug!(%channel, error = %e, "rejecting chunk that is not valid UTF-8");
            e
        })?;

        trace!(%channel, len = data.len(), "processing chunk");
        self.lock().process(text);
        Ok(())
    }

    /// Write to the primary (stdout) channel
    pub fn write_primary(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.write(Channel::Primary, data)
    }

    /// Write to the secondary (stderr) channel
    pub fn write_secondary(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.write(Channel::Secondary, data)
    }

    /// Fixed-size text rendering: `height` lines of exactly `width` characters
    pub fn snapshot(&self) -> String {
        self.lock().render()
    }

    /// Rendering with trailing blanks and trailing empty lines removed
    pub fn trimmed_snapshot(&self) -> String {
        display::render_trimmed(self.lock().buffer())
    }

    /// Full snapshot including the cursor position
    pub fn capture(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Cursor position as `(row, col)`
    pub fn cursor_position(&self) -> (u16, u16) {
        self.lock().cursor_position()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Terminal> {
        self.terminal.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("terminal lock poisoned by a panicking writer, recovering");
            poisoned.into_inner()
        })
    }
}
