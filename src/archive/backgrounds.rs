//! Background PDF extraction.

use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::convert::OutputPaths;
use crate::report::Reporter;

use super::{document_entry, NoteArchive, PageRef};

/// Outcome of background extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundReport {
    /// Distinct background ids referenced by the note
    pub referenced: Vec<String>,
    /// Files written, one per successfully extracted id
    pub extracted: Vec<PathBuf>,
    /// Ids that could not be extracted
    pub failed: Vec<String>,
}

/// Distinct, non-empty background ids of `pages`.
pub fn distinct_background_ids(pages: &[PageRef]) -> BTreeSet<&str> {
    pages
        .iter()
        .filter(|p| p.has_background_doc())
        .map(|p| p.background_doc_id.as_str())
        .collect()
}

/// Copy every distinct background document next to the output file.
///
/// Failures are reported and recorded but never abort the conversion; the
/// page backgrounds keep pointing at the expected file name.
pub fn extract_backgrounds<R, P>(
    pages: &[PageRef],
    archive: &mut NoteArchive<R>,
    paths: &OutputPaths,
    dry_run: bool,
    reporter: &P,
) -> BackgroundReport
where
    R: Read + Seek,
    P: Reporter + ?Sized,
{
    let ids = distinct_background_ids(pages);
    let mut report = BackgroundReport {
        referenced: ids.iter().map(|id| id.to_string()).collect(),
        ..Default::default()
    };

    if dry_run {
        if !ids.is_empty() {
            reporter.info(&format!(
                "Dry run, skipping extraction of {} background documents",
                ids.len()
            ));
        }
        return report;
    }

    for id in ids {
        let dest = paths.background(id);
        if !is_plain_id(id) {
            reporter.warning(&format!(
                "Refusing to extract background document with unsafe id \"{}\"",
                id
            ));
            report.failed.push(id.to_string());
            continue;
        }

        match archive.extract_entry(&document_entry(id), &dest) {
            Ok(_) => {
                reporter.success(&format!(
                    "Extracted background PDF {} to \"{}\"",
                    id,
                    dest.display()
                ));
                report.extracted.push(dest);
            }
            Err(e) => {
                reporter.warning(&format!(
                    "Failed to extract background PDF {} to \"{}\": {}",
                    id,
                    dest.display(),
                    e
                ));
                report.failed.push(id.to_string());
            }
        }
    }

    report
}

/// An id must name a single file, never a path.
fn is_plain_id(id: &str) -> bool {
    let path = Path::new(id);
    !id.contains(['/', '\\'])
        && path.components().count() == 1
        && matches!(path.components().next(), Some(std::path::Component::Normal(_)))
}
