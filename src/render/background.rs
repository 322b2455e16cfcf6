//! Page background projection.

use crate::record::{Background, BackgroundKind};
use crate::report::Reporter;
use crate::units::{split_color, to_points, Rgba, A4_HEIGHT_CM, A4_WIDTH_CM};

/// Output page size and backdrop, in points.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBackground {
    /// Plain coloured page
    Solid {
        width: f64,
        height: f64,
        color: Rgba,
    },
    /// Page of an attached PDF
    Pdf {
        width: f64,
        height: f64,
        /// File name relative to the output document
        filename: String,
        /// 1-based PDF page number
        page_number: i64,
    },
}

impl PageBackground {
    /// Page width and height in points.
    pub fn size(&self) -> (f64, f64) {
        match self {
            PageBackground::Solid { width, height, .. } => (*width, *height),
            PageBackground::Pdf { width, height, .. } => (*width, *height),
        }
    }

    /// A4 white page.
    pub fn a4() -> Self {
        PageBackground::Solid {
            width: to_points(A4_WIDTH_CM),
            height: to_points(A4_HEIGHT_CM),
            color: Rgba::WHITE,
        }
    }

    fn solid(background: &Background) -> Self {
        PageBackground::Solid {
            width: to_points(f64::from(background.width)),
            height: to_points(f64::from(background.height)),
            color: split_color(background.color),
        }
    }
}

/// Map a decoded backdrop to its output form.
///
/// `background_doc_id` is the page's document id from the page index; PDF
/// backdrops reference `<id>.pdf`.
pub fn project_background<P: Reporter + ?Sized>(
    background: &Background,
    background_doc_id: &str,
    reporter: &P,
) -> PageBackground {
    match background.kind {
        BackgroundKind::Blank => PageBackground::solid(background),
        BackgroundKind::Undefined
        | BackgroundKind::RuledPaper
        | BackgroundKind::QuadPaper
        | BackgroundKind::Papyrus => {
            reporter.warning(&format!(
                "Page background type {} ({}) replaced by blank background",
                background.kind.code(),
                background.kind
            ));
            PageBackground::solid(background)
        }
        BackgroundKind::Pdf { page_number } => {
            if background_doc_id.is_empty() {
                reporter.warning(&format!(
                    "PDF background page {} has no linked document, replaced by blank background",
                    page_number
                ));
                return PageBackground::solid(background);
            }
            PageBackground::Pdf {
                width: to_points(f64::from(background.width)),
                height: to_points(f64::from(background.height)),
                filename: format!("{}.pdf", background_doc_id),
                page_number: i64::from(page_number) + 1,
            }
        }
        BackgroundKind::Unknown { code } => {
            reporter.warning(&format!(
                "Unhandled unknown page background type {} replaced by A4 background",
                code
            ));
            PageBackground::a4()
        }
    }
}
