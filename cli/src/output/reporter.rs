//! Presentation-layer implementations of the `EventSink` port.
//!
//! `TerminalReporter` folds progress into a single spinner line on a TTY and
//! prints one line per event otherwise. `JsonLinesReporter` writes each event
//! as a timestamped JSON object on its own line.

use indicatif::ProgressBar;
use wslhub_common::{CompletionStatus, Event, EventRecord};

use crate::application::ports::EventSink;
use crate::output::{Mark, OutputContext, Styles, format_line, print_line, progress};

/// Terminal event renderer.
///
/// - progress events update the spinner (or print `"  → {message}"`)
/// - `distribution-error` and failed `migration-done` print `"  ✗ {message}"` to stderr
/// - everything except errors is suppressed when quiet
pub struct TerminalReporter {
    styles: Styles,
    quiet: bool,
    spinner: Option<ProgressBar>,
}

impl TerminalReporter {
    /// Create a reporter styled after `ctx`.
    #[must_use]
    pub fn new(ctx: &OutputContext) -> Self {
        Self {
            styles: ctx.styles,
            quiet: ctx.quiet,
            spinner: progress::spinner_for(ctx, "starting..."),
        }
    }

    /// Clear the spinner line unless a final status is already shown.
    pub fn finish(&self) {
        if let Some(pb) = self.spinner.as_ref().filter(|pb| !pb.is_finished()) {
            pb.finish_and_clear();
        }
    }

    fn step(&self, message: &str) {
        if self.quiet {
            return;
        }
        match &self.spinner {
            Some(pb) => pb.set_message(message.to_string()),
            None => print_line(&self.styles, Mark::Step, message),
        }
    }

    fn done(&self, message: &str) {
        if self.quiet {
            return;
        }
        match &self.spinner {
            Some(pb) => progress::finish(pb, Mark::Done, message),
            None => print_line(&self.styles, Mark::Done, message),
        }
    }

    fn warn(&self, message: &str) {
        match &self.spinner {
            Some(pb) => {
                let line = format_line(&self.styles, Mark::Warning, message);
                pb.suspend(|| eprintln!("{line}"));
            }
            None if !self.quiet => print_line(&self.styles, Mark::Warning, message),
            None => {}
        }
    }

    fn fail(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            pb.finish_and_clear();
        }
        print_line(&self.styles, Mark::Failed, message);
    }
}

impl EventSink for TerminalReporter {
    fn emit(&self, event: Event) {
        match event {
            Event::DistributionOutput(msg) if msg == "success" => self.done("done"),
            Event::DistributionOutput(msg)
            | Event::MigrationProgress(msg)
            | Event::UninstallProgress(msg) => {
                if msg.starts_with("warning:") {
                    self.warn(&msg);
                } else {
                    self.step(&msg);
                }
            }
            Event::DistributionError(msg) => self.fail(&msg),
            Event::MigrationDone(done) => match done.status {
                CompletionStatus::Success => self.done("migration complete"),
                CompletionStatus::Failed => {
                    self.fail(done.error.as_deref().unwrap_or("migration failed"));
                }
            },
        }
    }
}

/// Writes every event as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLinesReporter;

impl EventSink for JsonLinesReporter {
    fn emit(&self, event: Event) {
        match serde_json::to_string(&EventRecord::now(event)) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "cannot serialize event"),
        }
    }
}

/// Either renderer, chosen from `--json`.
pub enum Reporter {
    Terminal(TerminalReporter),
    Json(JsonLinesReporter),
}

impl Reporter {
    #[must_use]
    pub fn new(ctx: &OutputContext, json: bool) -> Self {
        if json {
            Reporter::Json(JsonLinesReporter)
        } else {
            Reporter::Terminal(TerminalReporter::new(ctx))
        }
    }

    pub fn finish(&self) {
        if let Reporter::Terminal(t) = self {
            t.finish();
        }
    }
}

impl EventSink for Reporter {
    fn emit(&self, event: Event) {
        match self {
            Reporter::Terminal(t) => t.emit(event),
            Reporter::Json(j) => j.emit(event),
        }
    }
}
