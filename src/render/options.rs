//! Projection options and configuration.

/// Default resolution for embedded images.
pub const DEFAULT_IMAGE_DPI: u32 = 150;

/// Options controlling how page content is projected to Xournal++.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOptions {
    /// Multiplier applied to pen stroke widths
    pub stroke_scale: f64,

    /// Multiplier applied to highlighter stroke widths
    pub highlight_scale: f64,

    /// Target resolution for embedded images; images are only downsampled
    pub image_dpi: u32,
}

impl ProjectOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pen width multiplier.
    pub fn with_stroke_scale(mut self, scale: f64) -> Self {
        self.stroke_scale = scale;
        self
    }

    /// Set the highlighter width multiplier.
    pub fn with_highlight_scale(mut self, scale: f64) -> Self {
        self.highlight_scale = scale;
        self
    }

    /// Set the target image resolution.
    pub fn with_image_dpi(mut self, dpi: u32) -> Self {
        self.image_dpi = dpi;
        self
    }
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            stroke_scale: 1.0,
            highlight_scale: 1.0,
            image_dpi: DEFAULT_IMAGE_DPI,
        }
    }
}
