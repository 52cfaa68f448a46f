//! Stylesheet for terminal output, built on owo-colors.

use owo_colors::Style;
use wslhub_common::RunState;

/// Colors used across commands. Every field is a no-op style until
/// [`Styles::colorize`] runs, so plain output needs no special casing.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Secondary text: keys, URLs, stopped distributions
    pub dim: Style,
    pub header: Style,
    pub running: Style,
    /// Transitional states such as `Installing` or `Converting`
    pub busy: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
        self.running = Style::new().bold().green();
        self.busy = Style::new().yellow();
    }

    /// Style for a distribution state in tables.
    #[must_use]
    pub fn state(&self, state: &RunState) -> Style {
        match state {
            RunState::Running => self.running,
            RunState::Stopped => self.dim,
            RunState::Other(_) => self.busy,
        }
    }
}
