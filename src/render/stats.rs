//! Conversion statistics.

use serde::Serialize;

/// Statistics collected while projecting pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Pages written to the output document
    pub page_count: u32,

    /// Pages omitted because their record could not be decoded
    pub skipped_page_count: u32,

    /// Layers written
    pub layer_count: u32,

    /// Strokes written
    pub stroke_count: u32,

    /// Images embedded
    pub image_count: u32,

    /// Items omitted (unsupported kinds or failed images)
    pub skipped_item_count: u32,

    /// Degradation warnings reported
    pub warning_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Increment skipped page count.
    pub fn add_skipped_page(&mut self) {
        self.skipped_page_count += 1;
    }

    /// Increment layer count.
    pub fn add_layer(&mut self) {
        self.layer_count += 1;
    }

    /// Increment stroke count.
    pub fn add_stroke(&mut self) {
        self.stroke_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment skipped item count.
    pub fn add_skipped_item(&mut self) {
        self.skipped_item_count += 1;
    }
}
