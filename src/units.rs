//! Unit conversion and colour unpacking.
//!
//! Squid measures everything in centimetres and packs colours as ARGB
//! integers; Xournal++ wants PostScript points and `#RRGGBBAA` strings.

use serde::Serialize;
use std::fmt;

/// Points per centimetre (72 / 2.54).
pub const POINTS_PER_CM: f64 = 28.34645669;

/// Pen width multiplier applied to the recorded stroke weight.
pub const PEN_WIDTH_FACTOR: f64 = 2.834645669;

/// Highlighter width multiplier, ten times the pen multiplier.
pub const HIGHLIGHTER_WIDTH_FACTOR: f64 = 28.34645669;

/// Width of an A4 sheet in centimetres.
pub const A4_WIDTH_CM: f64 = 21.0;

/// Height of an A4 sheet in centimetres.
pub const A4_HEIGHT_CM: f64 = 29.7;

/// Convert a length in centimetres to points.
#[inline]
pub fn to_points(cm: f64) -> f64 {
    cm * POINTS_PER_CM
}

/// An unpacked RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba {
        r: 0xff,
        g: 0xff,
        b: 0xff,
        a: 0xff,
    };

    /// Create a colour from its components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an `(r, g, b, a)` tuple.
    pub fn channels(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl From<u32> for Rgba {
    fn from(packed: u32) -> Self {
        split_color(packed)
    }
}

/// Unpack a Squid colour.
///
/// The big-endian bytes of `packed` are `[a, r, g, b]`.
pub fn split_color(packed: u32) -> Rgba {
    let [a, r, g, b] = packed.to_be_bytes();
    Rgba { r, g, b, a }
}
