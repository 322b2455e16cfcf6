//! Decoded page model.
//!
//! Lengths are centimetres as stored by Squid; crop bounds are pixels of the
//! attached image.

use serde::Serialize;
use std::fmt;

/// One decoded page record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedPage {
    /// Page backdrop
    pub background: Background,
    /// Layers, bottom first
    pub layers: Vec<Layer>,
}

impl DecodedPage {
    /// Create a page with the given background and no layers.
    pub fn new(background: Background) -> Self {
        Self {
            background,
            layers: Vec::new(),
        }
    }

    /// Add a layer.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Total number of items across all layers.
    pub fn item_count(&self) -> usize {
        self.layers.iter().map(|l| l.items.len()).sum()
    }
}

/// Page backdrop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Background {
    pub kind: BackgroundKind,
    pub width: f32,
    pub height: f32,
    /// Packed ARGB colour
    pub color: u32,
}

impl Background {
    /// Create a background.
    pub fn new(kind: BackgroundKind, width: f32, height: f32, color: u32) -> Self {
        Self {
            kind,
            width,
            height,
            color,
        }
    }
}

/// Backdrop variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundKind {
    #[default]
    Undefined,
    Blank,
    RuledPaper,
    QuadPaper,
    /// Page of a PDF document, 0-based
    Pdf { page_number: i32 },
    Papyrus,
    Unknown { code: i32 },
}

impl BackgroundKind {
    /// Map a wire enum value; `page_number` is only used for PDF backdrops.
    pub fn from_code(code: i32, page_number: i32) -> Self {
        match code {
            0 => BackgroundKind::Undefined,
            1 => BackgroundKind::Blank,
            2 => BackgroundKind::RuledPaper,
            3 => BackgroundKind::QuadPaper,
            4 => BackgroundKind::Pdf { page_number },
            5 => BackgroundKind::Papyrus,
            code => BackgroundKind::Unknown { code },
        }
    }

    /// Wire enum value.
    pub fn code(&self) -> i32 {
        match self {
            BackgroundKind::Undefined => 0,
            BackgroundKind::Blank => 1,
            BackgroundKind::RuledPaper => 2,
            BackgroundKind::QuadPaper => 3,
            BackgroundKind::Pdf { .. } => 4,
            BackgroundKind::Papyrus => 5,
            BackgroundKind::Unknown { code } => *code,
        }
    }
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundKind::Undefined => write!(f, "UNDEFINED"),
            BackgroundKind::Blank => write!(f, "BLANK"),
            BackgroundKind::RuledPaper => write!(f, "RULEDPAPER"),
            BackgroundKind::QuadPaper => write!(f, "QUADPAPER"),
            BackgroundKind::Pdf { .. } => write!(f, "PDF"),
            BackgroundKind::Papyrus => write!(f, "PAPYRUS"),
            BackgroundKind::Unknown { code } => write!(f, "unknown ({})", code),
        }
    }
}

/// An ordered sequence of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layer {
    pub items: Vec<Item>,
}

impl Layer {
    /// Create a layer from items.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// Page content element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Stroke(Stroke),
    Shape,
    Text,
    Image(ImageItem),
    Undefined,
    Unknown { code: i32 },
}

impl Item {
    /// Wire enum value.
    pub fn code(&self) -> i32 {
        match self {
            Item::Undefined => 0,
            Item::Stroke(_) => 1,
            Item::Shape => 2,
            Item::Text => 3,
            Item::Image(_) => 4,
            Item::Unknown { code } => *code,
        }
    }

    /// Short name for messages.
    pub fn name(&self) -> String {
        match self {
            Item::Stroke(_) => "STROKE".to_string(),
            Item::Shape => "SHAPE".to_string(),
            Item::Text => "TEXT".to_string(),
            Item::Image(_) => "IMAGE".to_string(),
            Item::Undefined => "UNDEFINED".to_string(),
            Item::Unknown { code } => format!("unknown ({})", code),
        }
    }
}

/// Freehand ink path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stroke {
    pub kind: StrokeKind,
    /// Packed ARGB colour
    pub color: u32,
    /// Width sample of the start point
    pub weight: f32,
    pub start: Point,
    /// Movements relative to the previous point
    pub deltas: Vec<Delta>,
}

impl Stroke {
    /// Number of points including the start point.
    pub fn point_count(&self) -> usize {
        self.deltas.len() + 1
    }
}

/// Stroke variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrokeKind {
    #[default]
    Undefined,
    Normal,
    Highlight,
    Line,
    Smooth,
    Unknown { code: i32 },
}

impl StrokeKind {
    /// Map a wire enum value.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => StrokeKind::Undefined,
            1 => StrokeKind::Normal,
            2 => StrokeKind::Highlight,
            3 => StrokeKind::Line,
            4 => StrokeKind::Smooth,
            code => StrokeKind::Unknown { code },
        }
    }

    /// Wire enum value.
    pub fn code(&self) -> i32 {
        match self {
            StrokeKind::Undefined => 0,
            StrokeKind::Normal => 1,
            StrokeKind::Highlight => 2,
            StrokeKind::Line => 3,
            StrokeKind::Smooth => 4,
            StrokeKind::Unknown { code } => *code,
        }
    }
}

impl fmt::Display for StrokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeKind::Undefined => write!(f, "UNDEFINED"),
            StrokeKind::Normal => write!(f, "NORMAL"),
            StrokeKind::Highlight => write!(f, "HIGHLIGHT"),
            StrokeKind::Line => write!(f, "LINE"),
            StrokeKind::Smooth => write!(f, "SMOOTH"),
            StrokeKind::Unknown { code } => write!(f, "unknown ({})", code),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One relative movement with its width sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Delta {
    pub dx: f32,
    pub dy: f32,
    pub weight: f32,
}

impl Delta {
    pub fn new(dx: f32, dy: f32, weight: f32) -> Self {
        Self { dx, dy, weight }
    }
}

/// Placed, cropped and transformed image attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageItem {
    /// Placement on the page, centimetres
    pub bounds: Rect,
    /// Region of the source image, pixels
    pub crop_bounds: CropRect,
    /// Name of the attachment under `data/imgs/`
    pub image_ref: String,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Degrees
    pub rotation: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CropRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Check whether every coordinate is zero (crop not recorded).
    pub fn is_unset(&self) -> bool {
        *self == CropRect::default()
    }
}
