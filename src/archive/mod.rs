//! Squid note archive access.
//!
//! A note archive is a ZIP container laid out as:
//!
//! ```text
//! note.db                 SQLite database with the page table
//! data/pages/<id>.page    one protobuf record per page
//! data/docs/<id>          PDF background documents
//! data/imgs/<ref>         raster image attachments
//! ```

mod backgrounds;
mod index;

pub use backgrounds::{distinct_background_ids, extract_backgrounds, BackgroundReport};
pub use index::{resolve_page_index, PageRef};

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Upper bound on the preallocation for an entry read, whatever its header claims.
const READ_HINT_LIMIT: u64 = 1 << 20;

/// Name of the embedded page index database.
pub const DATABASE_ENTRY: &str = "note.db";

/// Archive path of a page record.
pub fn page_entry(page_id: &str) -> String {
    format!("data/pages/{}.page", page_id)
}

/// Archive path of a background document.
pub fn document_entry(doc_id: &str) -> String {
    format!("data/docs/{}", doc_id)
}

/// Archive path of an image attachment.
pub fn image_entry(image_ref: &str) -> String {
    format!("data/imgs/{}", image_ref)
}

/// Anything that can hand out the bytes of a named entry.
pub trait EntryReader {
    /// Read the full content of the entry called `name`.
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>>;
}

impl EntryReader for HashMap<String, Vec<u8>> {
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::MissingEntry(name.to_string()))
    }
}

/// Counts of the entry classes found in an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Whether `note.db` is present
    pub has_database: bool,
    /// Page record identifiers, sorted
    pub page_records: Vec<String>,
    /// Number of background documents
    pub documents: usize,
    /// Number of image attachments
    pub images: usize,
    /// Entries matching none of the above
    pub other: usize,
}

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data/(?:pages/(?P<page>.+)\.page|(?P<doc>docs)/.+|(?P<img>imgs)/.+)$")
            .expect("entry pattern is a valid regex")
    })
}

/// An opened, read-only note archive. Closed on drop.
pub struct NoteArchive<R> {
    zip: ZipArchive<R>,
}

impl NoteArchive<BufReader<File>> {
    /// Open a note archive on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> NoteArchive<R> {
    /// Wrap any seekable reader holding a ZIP archive.
    pub fn new(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader).map_err(Error::from)?;
        Ok(Self { zip })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    /// Check if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Names of all entries, in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    /// Check whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.zip.file_names().any(|n| n == name)
    }

    /// Classify the entries of the archive.
    pub fn summary(&self) -> ArchiveSummary {
        let mut summary = ArchiveSummary::default();
        for name in self.zip.file_names() {
            if name == DATABASE_ENTRY {
                summary.has_database = true;
                continue;
            }
            match entry_pattern().captures(name) {
                Some(caps) if caps.name("page").is_some() => {
                    summary.page_records.push(caps["page"].to_string());
                }
                Some(caps) if caps.name("doc").is_some() => summary.documents += 1,
                Some(caps) if caps.name("img").is_some() => summary.images += 1,
                _ => summary.other += 1,
            }
        }
        summary.page_records.sort();
        summary
    }

    /// Copy an entry verbatim to `dest`, returning the number of bytes written.
    pub fn extract_entry(&mut self, name: &str, dest: &Path) -> Result<u64> {
        let mut entry = self.zip.by_name(name).map_err(|e| missing(name, e))?;
        let mut out = File::create(dest)?;
        let written = io::copy(&mut entry, &mut out)?;
        log::debug!("Extracted {} ({} bytes) to {}", name, written, dest.display());
        Ok(written)
    }
}

impl<R: Read + Seek> EntryReader for NoteArchive<R> {
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self.zip.by_name(name).map_err(|e| missing(name, e))?;
        let mut data = Vec::with_capacity(entry.size().min(READ_HINT_LIMIT) as usize);
        entry.read_to_end(&mut data)?;
        log::debug!("Read {} ({} bytes)", name, data.len());
        Ok(data)
    }
}

fn missing(name: &str, err: ZipError) -> Error {
    match err {
        ZipError::FileNotFound => Error::MissingEntry(name.to_string()),
        other => Error::from(other),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::NoteArchive;

    /// Build an in-memory archive from `(name, bytes)` pairs.
    pub fn archive(entries: &[(&str, &[u8])]) -> NoteArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        let cursor = writer.finish().unwrap();
        NoteArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }
}
