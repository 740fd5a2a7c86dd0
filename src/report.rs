//! Human-readable output for workflow results.
//!
//! Results go to stdout so they can be piped; fatal errors go to stderr.

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::api::{Terms, ZoneStatus};
use crate::orchestrator::Workflow;
use crate::zones::format_zone_list;

/// Output contract consumed by the orchestrator.
pub trait Reporter: Send + Sync {
    /// Print the current terms and conditions.
    fn terms(&self, terms: &Terms);
    /// Print one zone status row.
    fn zone_status(&self, status: &ZoneStatus);
    /// Print the zones a completed workflow acted upon.
    fn summary(&self, workflow: Workflow, zones: &[String]);
    /// Print a fatal error.
    fn error(&self, msg: &str);
}

/// `identifier<TAB>status`
pub fn status_line(status: &ZoneStatus) -> String {
    format!("{}\t{}", status.zone, status.label)
}

/// `Requested: [a b]`, or `None` for workflows without a summary.
pub fn summary_line(workflow: Workflow, zones: &[String]) -> Option<String> {
    let label = workflow.summary_label()?;
    Some(format!("{label}: {}", format_zone_list(zones)))
}

pub fn terms_block(terms: &Terms) -> String {
    format!(
        "Terms and Conditions (version {}):\n{}",
        terms.version, terms.content
    )
}

/// Default reporter writing to the process's stdout and stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalReporter {
    color: bool,
}

impl TerminalReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn stdout_line(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

impl Reporter for TerminalReporter {
    fn terms(&self, terms: &Terms) {
        self.stdout_line(&terms_block(terms));
    }

    fn zone_status(&self, status: &ZoneStatus) {
        self.stdout_line(&status_line(status));
    }

    fn summary(&self, workflow: Workflow, zones: &[String]) {
        if let Some(line) = summary_line(workflow, zones) {
            self.stdout_line(&line);
        }
    }

    fn error(&self, msg: &str) {
        let mut err = io::stderr().lock();
        if self.color {
            let _ = writeln!(err, "{} {msg}", "error:".red().bold());
        } else {
            let _ = writeln!(err, "error: {msg}");
        }
    }
}
