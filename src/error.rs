//! Error types for squidxopp library.

use std::io;
use thiserror::Error;

/// Result type alias for squidxopp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The note archive could not be opened or read.
    #[error("Archive error: {0}")]
    Archive(String),

    /// A required entry is missing from the note archive.
    #[error("Missing archive entry: {0}")]
    MissingEntry(String),

    /// The page index could not be read from the embedded database.
    #[error("Page index resolution failed: {0}")]
    IndexResolution(String),

    /// A page record could not be read or violates the record schema.
    #[error("Failed to decode page {page_id}: {reason}")]
    PageDecode {
        /// Identifier of the offending page
        page_id: String,
        /// What went wrong
        reason: String,
    },

    /// Error decoding, transforming or encoding an embedded image.
    #[error("Image error: {0}")]
    Image(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a page decode error.
    pub fn page_decode(page_id: impl Into<String>, reason: impl ToString) -> Self {
        Error::PageDecode {
            page_id: page_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Check whether this error came from a page record.
    pub fn is_page_decode(&self) -> bool {
        matches!(self, Error::PageDecode { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
