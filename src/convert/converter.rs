//! Note archive to Xournal++ converter.

use std::io::{Read, Seek};
use std::path::Path;

use crate::archive::{extract_backgrounds, resolve_page_index, EntryReader, NoteArchive, PageRef};
use crate::error::{Error, Result};
use crate::record::read_page;
use crate::render::{ConversionStats, PageProjector, ProjectOptions, XoppWriter};
use crate::report::{LogReporter, Reporter};

use super::output::{write_gzip, write_plain};
use super::{ConvertOptions, ConvertResult, ErrorMode, OutputPaths};

/// Converts Squid note archives.
///
/// All progress and degradation messages go to the held [`Reporter`].
#[derive(Debug, Clone, Default)]
pub struct Converter<R: Reporter = LogReporter> {
    reporter: R,
}

impl Converter<LogReporter> {
    /// Create a converter reporting through the `log` facade.
    pub fn new() -> Self {
        Self {
            reporter: LogReporter,
        }
    }
}

impl<R: Reporter> Converter<R> {
    /// Create a converter with a custom reporter.
    pub fn with_reporter(reporter: R) -> Self {
        Self { reporter }
    }

    /// The reporter messages are sent to.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Convert the note at `input`, writing outputs next to it.
    pub fn convert_file<P: AsRef<Path>>(
        &self,
        input: P,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let input = input.as_ref();
        let paths = OutputPaths::for_input(input);

        if options.dry_run {
            self.reporter
                .warning("This is a dry run, no files will be written");
        }
        self.reporter
            .success(&format!("Input file:  \"{}\"", input.display()));
        self.reporter
            .info(&format!("Output file: \"{}\"", paths.xopp.display()));
        if options.write_xml {
            self.reporter
                .info(&format!("XML file:    \"{}\"", paths.xml.display()));
        }

        let mut archive = NoteArchive::open(input).map_err(|e| match e {
            Error::Archive(_) => e,
            other => Error::Archive(format!("cannot open \"{}\": {}", input.display(), other)),
        })?;
        self.reporter.info(&format!(
            "Opened note archive \"{}\" ({} entries)",
            input.display(),
            archive.len()
        ));

        self.convert_archive(&mut archive, &paths, options)
    }

    /// Convert an already opened archive.
    pub fn convert_archive<S: Read + Seek>(
        &self,
        archive: &mut NoteArchive<S>,
        paths: &OutputPaths,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let pages = resolve_page_index(archive, &self.reporter)?;
        self.reporter
            .info(&format!("Page index lists {} pages", pages.len()));

        let backgrounds =
            extract_backgrounds(&pages, archive, paths, options.dry_run, &self.reporter);

        let (xml, stats) =
            self.render_pages(archive, &pages, &options.project, options.error_mode)?;
        self.reporter
            .success("Completed XML generation for document");

        let mut written = Vec::new();
        if !options.dry_run {
            write_gzip(&paths.xopp, &xml)?;
            self.reporter.success(&format!(
                "Wrote Xournal++ file \"{}\"",
                paths.xopp.display()
            ));
            written.push(paths.xopp.clone());

            if options.write_xml {
                write_plain(&paths.xml, &xml)?;
                self.reporter.success(&format!(
                    "Wrote Xournal++ XML file \"{}\"",
                    paths.xml.display()
                ));
                written.push(paths.xml.clone());
            }
        }

        Ok(ConvertResult {
            xml,
            stats,
            backgrounds,
            written,
        })
    }

    /// Decode and project `pages` in order into a complete document.
    ///
    /// Page records and images are read from `source`. Nothing is written to
    /// disk.
    pub fn render_pages<E: EntryReader + ?Sized>(
        &self,
        source: &mut E,
        pages: &[PageRef],
        options: &ProjectOptions,
        error_mode: ErrorMode,
    ) -> Result<(String, ConversionStats)> {
        let mut out = XoppWriter::new();
        let mut projector = PageProjector::new(options, &self.reporter);

        for (index, page_ref) in pages.iter().enumerate() {
            let page_number = index + 1;
            log::debug!("decoding page {} ({})", page_number, page_ref.page_id);

            let page = match read_page(source, &page_ref.page_id) {
                Ok(page) => page,
                Err(e) if error_mode == ErrorMode::Lenient && e.is_page_decode() => {
                    projector.skip_page(page_number, &page_ref.page_id, &e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            projector.project_page(
                &mut out,
                &page,
                &page_ref.background_doc_id,
                page_number,
                source,
            );
        }

        Ok((out.finish(), projector.into_stats()))
    }
}
