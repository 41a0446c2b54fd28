//! Terminal construction parameters

use crate::TerminalError;

/// Default grid width in columns
pub const DEFAULT_WIDTH: u16 = 20;

/// Default grid height in rows
pub const DEFAULT_HEIGHT: u16 = 6;

/// Default distance between tab stops
pub const DEFAULT_TAB_WIDTH: u16 = 8;

/// Dimensions and policies for a virtual terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct TerminalConfig {
    /// Terminal width in columns
    #[cfg_attr(feature = "clap", arg(long, default_value_t = DEFAULT_WIDTH))]
    pub width: u16,

    /// Terminal height in rows
    #[cfg_attr(feature = "clap", arg(long, default_value_t = DEFAULT_HEIGHT))]
    pub height: u16,

    /// Columns between tab stops
    #[cfg_attr(feature = "clap", arg(long, default_value_t = DEFAULT_TAB_WIDTH))]
    pub tab_width: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl TerminalConfig {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    pub fn with_tab_width(mut self, tab_width: u16) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Check that the configuration describes a usable terminal
    pub fn validate(&self) -> Result<(), TerminalError> {
        if self.width == 0 || self.height == 0 {
            return Err(TerminalError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if self.tab_width == 0 {
            return Err(TerminalError::InvalidConfig(
                "tab width must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
