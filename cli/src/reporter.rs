//! Terminal reporter.

use chrono::Local;
use colored::Colorize;

use squidxopp::{Reporter, Severity};

/// Prints timestamped, coloured messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn report(&self, severity: Severity, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = match severity {
            Severity::Info => message.normal(),
            Severity::Success => message.green(),
            Severity::Warning => message.yellow(),
            Severity::Error => message.red().bold(),
        };
        eprintln!("{} {}", stamp.to_string().dimmed(), line);
    }
}
