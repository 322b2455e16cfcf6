//! Xournal++ document buffer.

use super::{ImageElement, PageBackground, StrokeElement};

/// `creator` attribute of the root element.
pub const XOPP_CREATOR: &str = "Xournal++ 1.1.1";

/// Xournal++ file format version.
pub const XOPP_FILE_VERSION: u32 = 4;

/// Document title.
pub const XOPP_TITLE: &str = "Xournal++ document - see https://github.com/xournalpp/xournalpp";

/// Append-only Xournal++ XML buffer.
///
/// Elements are written in document order; callers open and close pages and
/// layers around the strokes and images they emit.
#[derive(Debug, Clone)]
pub struct XoppWriter {
    buf: String,
}

impl XoppWriter {
    /// Start a document, writing the XML prolog, root element and title.
    pub fn new() -> Self {
        let mut buf = String::new();
        buf.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
        buf.push_str(&format!(
            "<xournal creator=\"{}\" fileversion=\"{}\">\n",
            XOPP_CREATOR, XOPP_FILE_VERSION
        ));
        buf.push_str(&format!("<title>{}</title>\n", escape_xml(XOPP_TITLE)));
        Self { buf }
    }

    /// Open a page and write its background.
    pub fn begin_page(&mut self, background: &PageBackground) {
        let (width, height) = background.size();
        self.buf.push_str(&format!(
            "<page width=\"{:.3}\" height=\"{:.3}\">\n",
            width, height
        ));
        match background {
            PageBackground::Solid { color, .. } => {
                self.buf.push_str(&format!(
                    "<background type=\"solid\" color=\"{}\" style=\"plain\"/>\n",
                    color
                ));
            }
            PageBackground::Pdf {
                filename,
                page_number,
                ..
            } => {
                self.buf.push_str(&format!(
                    "<background type=\"pdf\" domain=\"attach\" filename=\"{}\" pageno=\"{}\"/>\n",
                    escape_xml(filename),
                    page_number
                ));
            }
        }
    }

    /// Close the current page.
    pub fn end_page(&mut self) {
        self.buf.push_str("</page>\n");
    }

    /// Open a layer.
    pub fn begin_layer(&mut self) {
        self.buf.push_str("<layer>\n");
    }

    /// Close the current layer.
    pub fn end_layer(&mut self) {
        self.buf.push_str("</layer>\n");
    }

    /// Write a stroke element.
    pub fn stroke(&mut self, stroke: &StrokeElement) {
        let widths = stroke
            .widths
            .iter()
            .map(|w| format!("{:.3}", w))
            .collect::<Vec<_>>()
            .join(" ");
        let coords = stroke
            .points
            .iter()
            .map(|(x, y)| format!("{:.3} {:.3}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        self.buf.push_str(&format!(
            "<stroke tool=\"{}\" ts=\"0\" fn=\"\" color=\"{}\" width=\"{}\">{}</stroke>\n",
            stroke.tool, stroke.color, widths, coords
        ));
    }

    /// Write an image element.
    pub fn image(&mut self, image: &ImageElement) {
        self.buf.push_str(&format!(
            "<image left=\"{:.3}\" top=\"{:.3}\" right=\"{:.3}\" bottom=\"{:.3}\">\n",
            image.left, image.top, image.right, image.bottom
        ));
        self.buf.push_str(&image.data);
        self.buf.push_str("</image>\n");
    }

    /// Content written so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Close the root element and return the document.
    pub fn finish(mut self) -> String {
        self.buf.push_str("</xournal>\n");
        self.buf
    }
}

impl Default for XoppWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
