//! Page order and background linkage from the embedded database.

use std::io::{Read, Seek};

use rusqlite::Connection;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::report::Reporter;

use super::{NoteArchive, DATABASE_ENTRY};

const PAGE_QUERY: &str = "SELECT id, documentId FROM page ORDER BY pageNum ASC";

/// One page of the note, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    /// Page record identifier
    pub page_id: String,
    /// Background document identifier, empty if the page has none
    pub background_doc_id: String,
}

impl PageRef {
    /// Create a page reference.
    pub fn new(page_id: impl Into<String>, background_doc_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            background_doc_id: background_doc_id.into(),
        }
    }

    /// Check whether the page links a background document.
    pub fn has_background_doc(&self) -> bool {
        !self.background_doc_id.is_empty()
    }
}

/// Read the ordered page list from the archive's `note.db`.
///
/// The database is copied into a private temporary directory which is removed,
/// together with the connection, before this function returns.
pub fn resolve_page_index<R, P>(archive: &mut NoteArchive<R>, reporter: &P) -> Result<Vec<PageRef>>
where
    R: Read + Seek,
    P: Reporter + ?Sized,
{
    let dir = tempfile::tempdir().map_err(index_error)?;
    let db_path = dir.path().join(DATABASE_ENTRY);
    archive
        .extract_entry(DATABASE_ENTRY, &db_path)
        .map_err(index_error)?;

    let conn = Connection::open(&db_path).map_err(index_error)?;
    reporter.success(&format!("Connected to page database {}", db_path.display()));

    let pages = query_pages(&conn);

    conn.close().map_err(|(_, e)| index_error(e))?;
    reporter.info("Closed page database connection");

    let pages = pages?;
    reporter.info(&format!(
        "Page / background query completed, found {} pages",
        pages.len()
    ));
    Ok(pages)
}

fn query_pages(conn: &Connection) -> Result<Vec<PageRef>> {
    let mut stmt = conn.prepare(PAGE_QUERY).map_err(index_error)?;
    let rows = stmt
        .query_map([], |row| {
            let page_id: String = row.get(0)?;
            let doc_id: Option<String> = row.get(1)?;
            Ok(PageRef::new(page_id, doc_id.unwrap_or_default()))
        })
        .map_err(index_error)?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(index_error)
}

fn index_error<E: std::fmt::Display>(err: E) -> Error {
    Error::IndexResolution(err.to_string())
}
