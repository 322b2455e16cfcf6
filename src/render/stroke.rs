//! Stroke projection.

use std::fmt;

use crate::record::{Stroke, StrokeKind};
use crate::units::{split_color, to_points, Rgba, HIGHLIGHTER_WIDTH_FACTOR, PEN_WIDTH_FACTOR};

use super::ProjectOptions;

/// Xournal++ drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeTool {
    Pen,
    Highlighter,
}

impl fmt::Display for StrokeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeTool::Pen => write!(f, "pen"),
            StrokeTool::Highlighter => write!(f, "highlighter"),
        }
    }
}

/// A stroke ready to be written, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeElement {
    pub tool: StrokeTool,
    pub color: Rgba,
    /// One width per point
    pub widths: Vec<f64>,
    /// Absolute point coordinates
    pub points: Vec<(f64, f64)>,
}

impl StrokeElement {
    /// Project a stroke, or `None` if its kind has no Xournal++ counterpart.
    pub fn from_stroke(stroke: &Stroke, options: &ProjectOptions) -> Option<Self> {
        let (tool, factor) = match stroke.kind {
            StrokeKind::Normal => (StrokeTool::Pen, options.stroke_scale * PEN_WIDTH_FACTOR),
            StrokeKind::Highlight => (
                StrokeTool::Highlighter,
                options.highlight_scale * HIGHLIGHTER_WIDTH_FACTOR,
            ),
            StrokeKind::Undefined
            | StrokeKind::Line
            | StrokeKind::Smooth
            | StrokeKind::Unknown { .. } => return None,
        };

        let widths = std::iter::once(stroke.weight)
            .chain(stroke.deltas.iter().map(|d| d.weight))
            .map(|w| factor * f64::from(w))
            .collect();

        let mut x = to_points(f64::from(stroke.start.x));
        let mut y = to_points(f64::from(stroke.start.y));
        let mut points = Vec::with_capacity(stroke.point_count());
        points.push((x, y));
        for delta in &stroke.deltas {
            x += to_points(f64::from(delta.dx));
            y += to_points(f64::from(delta.dy));
            points.push((x, y));
        }

        Some(Self {
            tool,
            color: split_color(stroke.color),
            widths,
            points,
        })
    }
}
