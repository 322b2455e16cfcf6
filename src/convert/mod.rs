//! Whole-note conversion.
//!
//! [`Converter`] drives the pipeline for one note archive: it resolves the
//! page order, extracts background documents, decodes and projects every
//! page, then writes the Xournal++ document.
//!
//! # Example
//!
//! ```no_run
//! use squidxopp::convert::{ConvertOptions, Converter};
//!
//! fn main() -> squidxopp::Result<()> {
//!     let options = ConvertOptions::new().with_xml(true);
//!     let result = Converter::new().convert_file("lecture.squid", &options)?;
//!     println!("{} pages", result.stats.page_count);
//!     Ok(())
//! }
//! ```

mod converter;
mod output;

pub use converter::Converter;
pub use output::{write_gzip, write_plain, OutputPaths};

use std::path::PathBuf;

use crate::archive::BackgroundReport;
use crate::render::{ConversionStats, ProjectOptions};

/// What to do when a page record cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Abort the conversion; nothing is written
    #[default]
    Strict,

    /// Leave the page out with a warning and continue
    Lenient,
}

/// Options for note conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Scale and resolution settings
    pub project: ProjectOptions,

    /// Do everything except writing files
    pub dry_run: bool,

    /// Also write an uncompressed copy of the document
    pub write_xml: bool,

    /// Page decode failure policy
    pub error_mode: ErrorMode,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set projection options.
    pub fn with_project_options(mut self, options: ProjectOptions) -> Self {
        self.project = options;
        self
    }

    /// Enable or disable dry run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable the uncompressed copy.
    pub fn with_xml(mut self, write_xml: bool) -> Self {
        self.write_xml = write_xml;
        self
    }

    /// Set the page decode failure policy.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }
}

/// Result of converting one note.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The complete Xournal++ document
    pub xml: String,

    /// What was written, skipped and degraded
    pub stats: ConversionStats,

    /// Background document extraction outcome
    pub backgrounds: BackgroundReport,

    /// Files written, in order
    pub written: Vec<PathBuf>,
}
