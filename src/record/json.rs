//! JSON rendering of decoded pages.

use serde::Serialize;

use crate::archive::PageRef;
use crate::error::{Error, Result};

use super::DecodedPage;

/// JSON output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// A decoded page together with its place in the note.
#[derive(Debug, Clone, Serialize)]
pub struct PageDump {
    /// 1-based position in index order
    pub page_number: usize,
    pub page_id: String,
    pub background_doc_id: String,
    pub page: DecodedPage,
}

impl PageDump {
    pub fn new(page_number: usize, page_ref: PageRef, page: DecodedPage) -> Self {
        Self {
            page_number,
            page_id: page_ref.page_id,
            background_doc_id: page_ref.background_doc_id,
            page,
        }
    }
}

/// Render a page dump as JSON.
pub fn to_json(dump: &PageDump, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(dump),
        JsonFormat::Compact => serde_json::to_string(dump),
    };

    result.map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
}
