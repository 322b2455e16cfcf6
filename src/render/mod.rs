//! Projection of decoded pages into Xournal++ markup.
//!
//! [`PageProjector`] walks a [`DecodedPage`] and appends its page, layers,
//! strokes and images to an [`XoppWriter`]. Anything without an Xournal++
//! counterpart is degraded or omitted with a warning; projection itself only
//! fails through the writer's caller.

mod background;
mod image;
mod options;
mod stats;
mod stroke;
mod writer;

pub use background::{project_background, PageBackground};
pub use image::{
    apply_flips, apply_rotation, crop_region, downsample_factor, encode_base64_wrapped,
    encode_png, project_image, resample, ImageElement,
};
pub use options::{ProjectOptions, DEFAULT_IMAGE_DPI};
pub use stats::ConversionStats;
pub use stroke::{StrokeElement, StrokeTool};
pub use writer::{escape_xml, XoppWriter, XOPP_CREATOR, XOPP_FILE_VERSION, XOPP_TITLE};

use crate::archive::EntryReader;
use crate::error::Error;
use crate::record::{DecodedPage, Item};
use crate::report::{CountingReporter, Reporter};

/// Projects pages one after another, accumulating statistics.
pub struct PageProjector<'a, P: Reporter + ?Sized> {
    options: &'a ProjectOptions,
    reporter: CountingReporter<&'a P>,
    stats: ConversionStats,
}

impl<'a, P: Reporter + ?Sized> PageProjector<'a, P> {
    pub fn new(options: &'a ProjectOptions, reporter: &'a P) -> Self {
        Self {
            options,
            reporter: CountingReporter::new(reporter),
            stats: ConversionStats::new(),
        }
    }

    /// Append one page to `out`.
    ///
    /// `page_number` is 1-based and only used in messages. Images are read
    /// from `assets`.
    pub fn project_page<E: EntryReader + ?Sized>(
        &mut self,
        out: &mut XoppWriter,
        page: &DecodedPage,
        background_doc_id: &str,
        page_number: usize,
        assets: &mut E,
    ) {
        let background = project_background(&page.background, background_doc_id, &self.reporter);
        out.begin_page(&background);

        for (layer_index, layer) in page.layers.iter().enumerate() {
            out.begin_layer();
            for (item_index, item) in layer.items.iter().enumerate() {
                let position = ItemPosition {
                    page: page_number,
                    layer: layer_index + 1,
                    item: item_index + 1,
                };
                self.project_item(out, item, position, assets);
            }
            out.end_layer();
            self.stats.add_layer();
        }

        out.end_page();
        self.stats.add_page();
        self.reporter
            .success(&format!("Completed XML generation for page {}", page_number));
    }

    fn project_item<E: EntryReader + ?Sized>(
        &mut self,
        out: &mut XoppWriter,
        item: &Item,
        position: ItemPosition,
        assets: &mut E,
    ) {
        match item {
            Item::Stroke(stroke) => match StrokeElement::from_stroke(stroke, self.options) {
                Some(element) => {
                    out.stroke(&element);
                    self.stats.add_stroke();
                }
                None => {
                    self.reporter.warning(&format!(
                        "Unhandled stroke type {} ({}) at {} skipped",
                        stroke.kind.code(),
                        stroke.kind,
                        position
                    ));
                    self.stats.add_skipped_item();
                }
            },
            Item::Image(image) => {
                match project_image(image, assets, self.options, &self.reporter) {
                    Ok(element) => {
                        out.image(&element);
                        self.stats.add_image();
                        self.reporter
                            .info(&format!("Inserted image '{}' at {}", image.image_ref, position));
                    }
                    Err(e) => {
                        self.reporter.warning(&format!(
                            "Image '{}' at {} omitted: {}",
                            image.image_ref, position, e
                        ));
                        self.stats.add_skipped_item();
                    }
                }
            }
            other => {
                self.reporter.warning(&format!(
                    "Unhandled item type {} ({}) at {} skipped",
                    other.code(),
                    other.name(),
                    position
                ));
                self.stats.add_skipped_item();
            }
        }
    }

    /// Record a page left out of the document.
    pub fn skip_page(&mut self, page_number: usize, page_id: &str, error: &Error) {
        self.reporter.warning(&format!(
            "Page {} ({}) skipped: {}",
            page_number, page_id, error
        ));
        self.stats.add_skipped_page();
    }

    /// Statistics so far.
    pub fn stats(&self) -> ConversionStats {
        ConversionStats {
            warning_count: self.reporter.warning_count(),
            ..self.stats.clone()
        }
    }

    pub fn into_stats(self) -> ConversionStats {
        self.stats()
    }
}

#[derive(Debug, Clone, Copy)]
struct ItemPosition {
    page: usize,
    layer: usize,
    item: usize,
}

impl std::fmt::Display for ItemPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {} layer {} item {}", self.page, self.layer, self.item)
    }
}
