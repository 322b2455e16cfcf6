//! # squidxopp
//!
//! Converts Squid handwritten-note archives into Xournal++ documents.
//!
//! A Squid note is a ZIP archive holding a SQLite page index, one protobuf
//! record per page, PDF background documents and raster images. This crate
//! reads the page order from the index, decodes each page record, projects
//! strokes, images and backgrounds onto Xournal++ markup and writes the
//! gzip-compressed `.xopp` file next to the input.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> squidxopp::Result<()> {
//!     let result = squidxopp::convert_file("lecture.squid")?;
//!     println!(
//!         "{} pages, {} strokes, {} warnings",
//!         result.stats.page_count, result.stats.stroke_count, result.stats.warning_count
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Faithful ink**: pen and highlighter strokes with per-point widths
//! - **Images**: cropped, flipped, rotated and downsampled to a target DPI
//! - **PDF backgrounds**: extracted next to the output and referenced by page
//! - **Graceful degradation**: unsupported content is reported, never silently dropped

pub mod archive;
pub mod convert;
pub mod error;
pub mod record;
pub mod render;
pub mod report;
pub mod units;

// Re-export commonly used types
pub use archive::{NoteArchive, PageRef};
pub use convert::{ConvertOptions, ConvertResult, Converter, ErrorMode, OutputPaths};
pub use error::{Error, Result};
pub use record::{DecodedPage, Item, Stroke, StrokeKind};
pub use render::{ConversionStats, ProjectOptions};
pub use report::{LogReporter, MemoryReporter, NullReporter, Reporter, Severity};

use std::path::Path;

/// Convert a note with default options, writing `<input>.xopp`.
///
/// # Example
///
/// ```no_run
/// use squidxopp::convert_file;
///
/// let result = convert_file("lecture.squid").unwrap();
/// println!("wrote {:?}", result.written);
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    Converter::new().convert_file(path, &ConvertOptions::default())
}

/// Convert a note with custom options.
///
/// # Example
///
/// ```no_run
/// use squidxopp::{convert_file_with_options, ConvertOptions, ProjectOptions};
///
/// let options = ConvertOptions::new()
///     .with_project_options(ProjectOptions::new().with_image_dpi(300))
///     .with_xml(true);
/// let result = convert_file_with_options("lecture.squid", &options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    Converter::new().convert_file(path, options)
}

/// Read the ordered page list of a note.
pub fn read_page_index<P: AsRef<Path>>(path: P) -> Result<Vec<PageRef>> {
    let mut archive = NoteArchive::open(path)?;
    archive::resolve_page_index(&mut archive, &NullReporter)
}

/// Decode the page at 1-based position `page_number` of a note.
pub fn read_page_at<P: AsRef<Path>>(path: P, page_number: usize) -> Result<(PageRef, DecodedPage)> {
    let mut archive = NoteArchive::open(path)?;
    let pages = archive::resolve_page_index(&mut archive, &NullReporter)?;
    let page_ref = page_number
        .checked_sub(1)
        .and_then(|i| pages.get(i))
        .cloned()
        .ok_or_else(|| {
            Error::Other(format!(
                "page {} out of range, the note has {} pages",
                page_number,
                pages.len()
            ))
        })?;
    let page = record::read_page(&mut archive, &page_ref.page_id)?;
    Ok((page_ref, page))
}
