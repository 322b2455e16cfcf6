//! Output file naming and persistence.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;

/// Files produced for one input note.
///
/// Every name is the input path with a suffix appended, so outputs land
/// next to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The input note
    pub input: PathBuf,
    /// Compressed Xournal++ document
    pub xopp: PathBuf,
    /// Uncompressed copy of the document
    pub xml: PathBuf,
}

impl OutputPaths {
    /// Derive output names from the input path.
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        Self {
            xopp: with_suffix(&input, ".xopp"),
            xml: with_suffix(&input, ".xml.xopp"),
            input,
        }
    }

    /// Destination of the background document `doc_id`.
    pub fn background(&self, doc_id: &str) -> PathBuf {
        with_suffix(&self.xopp, &format!(".{}.pdf", doc_id))
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `xml` gzip-compressed to `path`.
pub fn write_gzip(path: &Path, xml: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(xml.as_bytes())?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    log::debug!("wrote {} bytes of XML to {}", xml.len(), path.display());
    Ok(())
}

/// Write `xml` uncompressed to `path`.
pub fn write_plain(path: &Path, xml: &str) -> Result<()> {
    std::fs::write(path, xml)?;
    Ok(())
}
