//! Terminal escape sequence parser
//!
//! A small explicit state machine over decoded characters. Everything the
//! parser needs to resume lives in [`Parser`], so a sequence may be split
//! across any number of `advance` calls. Decoded actions are handed to a
//! [`Perform`] implementation.
//!
//! Unsupported or malformed sequences are consumed and dropped. They never
//! reach the grid as literal text.

use tracing::trace;

/// Maximum number of numeric parameters kept for one control sequence
pub const MAX_PARAMS: usize = 16;

/// Single-character controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlChar {
    LineFeed,
    CarriageReturn,
    Backspace,
    Tab,
    Bell,
    VerticalTab,
    FormFeed,
}

impl ControlChar {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\n' => Some(Self::LineFeed),
            '\r' => Some(Self::CarriageReturn),
            '\x08' => Some(Self::Backspace),
            '\t' => Some(Self::Tab),
            '\x07' => Some(Self::Bell),
            '\x0b' => Some(Self::VerticalTab),
            '\x0c' => Some(Self::FormFeed),
            _ => None,
        }
    }
}

/// Region affected by an erase command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// From the cursor to the end (mode 0)
    ToEnd,
    /// From the start up to the cursor (mode 1). The line erase includes
    /// the cursor cell, the screen erase stops before it.
    ToBeginning,
    /// Everything (mode 2)
    Entire,
}

impl ClearMode {
    fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(Self::ToEnd),
            1 => Some(Self::ToBeginning),
            2 => Some(Self::Entire),
            _ => None,
        }
    }
}

/// Decoded control sequence. Counts are at least 1, positions are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBack(u16),
    CursorNextLine(u16),
    CursorPrevLine(u16),
    CursorColumn(u16),
    CursorRow(u16),
    CursorPosition { row: u16, col: u16 },
    ClearScreen(ClearMode),
    ClearLine(ClearMode),
    /// SGR. Recognized so it is not reported as unsupported; carries nothing.
    SetGraphicsRendition,
}

impl Command {
    /// Decode a CSI final character and its parameters.
    ///
    /// A parameter of 0 means "not given". Returns `None` for finals that
    /// are not supported and for erase modes out of range.
    pub fn from_csi(final_char: char, params: &[u16]) -> Option<Self> {
        let param = |i: usize| params.get(i).copied().unwrap_or(0);
        let count = |i: usize| param(i).max(1);
        let position = |i: usize| param(i).max(1) - 1;

        let command = match final_char {
            'A' => Self::CursorUp(count(0)),
            'B' => Self::CursorDown(count(0)),
            'C' => Self::CursorForward(count(0)),
            'D' => Self::CursorBack(count(0)),
            'E' => Self::CursorNextLine(count(0)),
            'F' => Self::CursorPrevLine(count(0)),
            'G' => Self::CursorColumn(position(0)),
            'd' => Self::CursorRow(position(0)),
            'H' | 'f' => Self::CursorPosition {
                row: position(0),
                col: position(1),
            },
            'J' => Self::ClearScreen(ClearMode::from_param(param(0))?),
            'K' => Self::ClearLine(ClearMode::from_param(param(0))?),
            'm' => Self::SetGraphicsRendition,
            _ => return None,
        };

        Some(command)
    }
}

/// Receiver of parsed actions
pub trait Perform {
    /// Draw a printable character at the cursor
    fn print(&mut self, c: char);

    /// Run a single-character control
    fn execute(&mut self, control: ControlChar);

    /// Apply a decoded control sequence
    fn csi_dispatch(&mut self, command: Command);
}

/// Parser state between characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Normal text
    #[default]
    Ground,
    /// After ESC
    EscapeSeen,
    /// After `ESC [`, reading numeric parameters
    CollectingParameters,
    /// After an intermediate byte inside a control sequence, waiting for the
    /// final byte of a sequence that will be dropped
    CollectingTerminator,
    /// Inside `ESC ]`, discarding until BEL or `ESC \`
    OscString,
}

/// Parameters of the control sequence being collected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CsiParams {
    values: Vec<u16>,
    current: Option<u16>,
    private: bool,
}

impl CsiParams {
    fn push_digit(&mut self, digit: u16) {
        let value = self.current.unwrap_or(0);
        self.current = Some(value.saturating_mul(10).saturating_add(digit));
    }

    fn push_separator(&mut self) {
        let value = self.current.take().unwrap_or(0);
        if self.values.len() < MAX_PARAMS {
            self.values.push(value);
        }
    }

    fn finish(&mut self) -> &[u16] {
        if self.current.is_some() || !self.values.is_empty() {
            self.push_separator();
        }
        &self.values
    }

    fn clear(&mut self) {
        self.values.clear();
        self.current = None;
        self.private = false;
    }
}

/// Parser for terminal escape sequences
#[derive(Debug, Clone, Default)]
pub struct Parser {
    state: State,
    params: CsiParams,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, mostly useful for tests and diagnostics
    pub fn state(&self) -> State {
        self.state
    }

    /// Drop any partially collected sequence
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.params.clear();
    }

    /// Feed every character of `text`
    pub fn advance_str<P: Perform>(&mut self, performer: &mut P, text: &str) {
        for c in text.chars() {
            self.advance(performer, c);
        }
    }

    /// Process a single character
    pub fn advance<P: Perform>(&mut self, performer: &mut P, c: char) {
        match self.state {
            State::Ground => self.advance_ground(performer, c),
            State::EscapeSeen => self.advance_escape(c),
            State::CollectingParameters => self.advance_params(performer, c),
            State::CollectingTerminator => self.advance_terminator(performer, c),
            State::OscString => self.advance_osc(c),
        }
    }

    fn advance_ground<P: Perform>(&mut self, performer: &mut P, c: char) {
        match c {
            '\x1b' => self.state = State::EscapeSeen,
            c if c.is_control() => execute(performer, c),
            c => performer.print(c),
        }
    }

    /// The byte after ESC either opens a longer sequence or completes a
    /// two-character one. Any two-character sequence is dropped whole,
    /// controls and a second ESC included.
    fn advance_escape(&mut self, c: char) {
        match c {
            '[' => {
                self.params.clear();
                self.state = State::CollectingParameters;
            }
            ']' => self.state = State::OscString,
            c => {
                trace!(byte = ?c, "discarding unsupported escape sequence");
                self.state = State::Ground;
            }
        }
    }

    fn advance_params<P: Perform>(&mut self, performer: &mut P, c: char) {
        match c {
            '0'..='9' => self.params.push_digit(u16::from(c as u8 - b'0')),
            ';' | ':' => self.params.push_separator(),
            '<'..='?' => self.params.private = true,
            '\x20'..='\x2f' => self.state = State::CollectingTerminator,
            '\x40'..='\x7e' => {
                self.dispatch(performer, c);
                self.params.clear();
                self.state = State::Ground;
            }
            c => self.interrupt(performer, c),
        }
    }

    fn advance_terminator<P: Perform>(&mut self, performer: &mut P, c: char) {
        match c {
            '\x20'..='\x2f' => {}
            '\x30'..='\x7e' => {
                trace!(final_char = ?c, "discarding sequence with intermediate bytes");
                self.params.clear();
                self.state = State::Ground;
            }
            c => self.interrupt(performer, c),
        }
    }

    fn advance_osc(&mut self, c: char) {
        match c {
            '\x07' | '\x18' | '\x1a' => self.state = State::Ground,
            '\x1b' => self.state = State::EscapeSeen,
            _ => {}
        }
    }

    /// Handle a character that does not belong to the sequence being
    /// collected. Controls run in place, ESC restarts, anything else
    /// abandons the sequence.
    fn interrupt<P: Perform>(&mut self, performer: &mut P, c: char) {
        match c {
            '\x1b' => {
                self.params.clear();
                self.state = State::EscapeSeen;
            }
            '\x18' | '\x1a' => self.reset(),
            '\x7f' => {}
            c if is_c0(c) => execute(performer, c),
            c => {
                trace!(byte = ?c, "abandoning malformed control sequence");
                self.reset();
            }
        }
    }

    fn dispatch<P: Perform>(&mut self, performer: &mut P, final_char: char) {
        if self.params.private {
            trace!(final_char = ?final_char, "discarding private control sequence");
            return;
        }

        let params = self.params.finish();
        match Command::from_csi(final_char, params) {
            Some(command) => performer.csi_dispatch(command),
            None => trace!(final_char = ?final_char, ?params, "discarding unsupported control sequence"),
        }
    }
}

fn is_c0(c: char) -> bool {
    c < '\x20'
}

fn execute<P: Perform>(performer: &mut P, c: char) {
    match ControlChar::from_char(c) {
        Some(control) => performer.execute(control),
        None => trace!(byte = ?c, "ignoring control character"),
    }
}
