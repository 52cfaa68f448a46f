//! Output formatting: styled terminal lines, spinners, event reporters and
//! JSON rendering.
//!
//! Status lines share one shape, `"  {mark} {message}"`. Errors and warnings
//! go to stderr so `--json` stdout stays parseable.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::{JsonLinesReporter, Reporter, TerminalReporter};
pub use styles::Styles;

/// Leading symbol of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Done,
    Step,
    Warning,
    Failed,
    Note,
}

impl Mark {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Mark::Done => "✓",
            Mark::Step => "→",
            Mark::Warning => "⚠",
            Mark::Failed => "✗",
            Mark::Note => "ℹ",
        }
    }

    fn style(self, styles: &Styles) -> Style {
        match self {
            Mark::Done => styles.success,
            Mark::Step | Mark::Note => styles.info,
            Mark::Warning => styles.warning,
            Mark::Failed => styles.error,
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Mark::Warning | Mark::Failed)
    }
}

/// Render one status line without printing it.
#[must_use]
pub fn format_line(styles: &Styles, mark: Mark, msg: &str) -> String {
    format!("  {} {msg}", mark.symbol().style(mark.style(styles)))
}

/// Print one status line to stdout, or stderr for warnings and failures.
pub fn print_line(styles: &Styles, mark: Mark, msg: &str) {
    let line = format_line(styles, mark, msg);
    if mark.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are on only for a TTY with neither `--no-color` nor `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a status line. Only failures survive `--quiet`.
    pub fn line(&self, mark: Mark, msg: &str) {
        if !self.quiet || mark == Mark::Failed {
            print_line(&self.styles, mark, msg);
        }
    }

    pub fn success(&self, msg: &str) {
        self.line(Mark::Done, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line(Mark::Note, msg);
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}
