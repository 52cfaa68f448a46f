//! Spinners for steps whose length is unknown, built on indicatif.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{Mark, OutputContext};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

/// Start a spinner showing `msg`.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner when `ctx` is an interactive, non-quiet terminal.
#[must_use]
pub fn spinner_for(ctx: &OutputContext, msg: &str) -> Option<ProgressBar> {
    ctx.show_progress().then(|| spinner(msg))
}

/// Replace the spinner with a final `"{mark} {msg}"` line.
pub fn finish(pb: &ProgressBar, mark: Mark, msg: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix} {msg}")
            .expect("valid template"),
    );
    pb.set_prefix(mark.symbol());
    pb.finish_with_message(msg.to_string());
}
