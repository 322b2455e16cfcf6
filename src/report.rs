//! User-facing progress and degradation reporting.
//!
//! The converter never decides how messages are shown. It holds a
//! [`Reporter`] and hands it to every stage; the CLI supplies a coloured
//! terminal reporter, embedders may use [`LogReporter`], and tests collect
//! messages with [`MemoryReporter`].

use std::cell::{Cell, RefCell};
use std::fmt;

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Progress information
    Info,
    /// A step completed
    Success,
    /// Something was degraded or skipped
    Warning,
    /// A step failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Sink for conversion messages. Purely observational.
pub trait Reporter {
    /// Report a message.
    fn report(&self, severity: Severity, message: &str);

    /// Report progress.
    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    /// Report a completed step.
    fn success(&self, message: &str) {
        self.report(Severity::Success, message);
    }

    /// Report a degradation.
    fn warning(&self, message: &str) {
        self.report(Severity::Warning, message);
    }

    /// Report a failure.
    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, severity: Severity, message: &str) {
        (**self).report(severity, message);
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&self, severity: Severity, message: &str) {
        (**self).report(severity, message);
    }
}

/// Forwards messages to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info | Severity::Success => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _severity: Severity, _message: &str) {}
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected messages in order.
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.borrow().clone()
    }

    /// Messages of one severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Collected warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warning)
    }

    /// Forget everything collected so far.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, message: &str) {
        self.entries
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}

/// Wraps another reporter and counts the warnings passing through.
#[derive(Debug)]
pub struct CountingReporter<R> {
    inner: R,
    warnings: Cell<u32>,
}

impl<R: Reporter> CountingReporter<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            warnings: Cell::new(0),
        }
    }

    /// Warnings seen so far.
    pub fn warning_count(&self) -> u32 {
        self.warnings.get()
    }
}

impl<R: Reporter> Reporter for CountingReporter<R> {
    fn report(&self, severity: Severity, message: &str) {
        if severity == Severity::Warning {
            self.warnings.set(self.warnings.get() + 1);
        }
        self.inner.report(severity, message);
    }
}
