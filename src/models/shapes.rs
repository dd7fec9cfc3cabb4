// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Slide contents as reported by the presentation server.

use crate::util::geometry::Rect;
use serde::{Deserialize, Serialize};

/// MsoShapeType code of a picture.
pub const MSO_PICTURE: i32 = 13;
/// MsoShapeType code of a placeholder.
pub const MSO_PLACEHOLDER: i32 = 14;

/// PpPlaceholderType codes of text placeholders that never take a figure.
pub const PP_PLACEHOLDER_TITLE: i32 = 1;
pub const PP_PLACEHOLDER_BODY: i32 = 2;
pub const PP_PLACEHOLDER_SUBTITLE: i32 = 4;

/// Slide size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct SlideDimensions {
    pub width: f64,
    pub height: f64,
}

impl From<(f64, f64)> for SlideDimensions {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

impl From<SlideDimensions> for (f64, f64) {
    fn from(dims: SlideDimensions) -> Self {
        (dims.width, dims.height)
    }
}

/// Position and type of one shape, in slide z-order (back to front).
///
/// Decoded from `[x, y, w, h, type]`, optionally followed by the
/// placeholder type for placeholder shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShapeRecord", into = "ShapeRecord")]
pub struct ShapePosition {
    pub rect: Rect,
    pub kind: i32,
    pub placeholder_type: Option<i32>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ShapeRecord {
    Placeholder(f64, f64, f64, f64, i32, i32),
    Shape(f64, f64, f64, f64, i32),
}

impl From<ShapeRecord> for ShapePosition {
    fn from(record: ShapeRecord) -> Self {
        match record {
            ShapeRecord::Placeholder(x, y, w, h, kind, ptype) => {
                ShapePosition::from((x, y, w, h, kind)).with_placeholder_type(ptype)
            }
            ShapeRecord::Shape(x, y, w, h, kind) => ShapePosition::from((x, y, w, h, kind)),
        }
    }
}

impl From<ShapePosition> for ShapeRecord {
    fn from(shape: ShapePosition) -> Self {
        let r = shape.rect;
        match shape.placeholder_type {
            Some(ptype) => ShapeRecord::Placeholder(r.x, r.y, r.width, r.height, shape.kind, ptype),
            None => ShapeRecord::Shape(r.x, r.y, r.width, r.height, shape.kind),
        }
    }
}

impl ShapePosition {
    /// Attach a PpPlaceholderType code.
    pub fn with_placeholder_type(self, ptype: i32) -> Self {
        Self {
            placeholder_type: Some(ptype),
            ..self
        }
    }

    /// Whether the shape is a picture.
    pub fn is_picture(&self) -> bool {
        self.kind == MSO_PICTURE
    }

    /// Whether the shape is a placeholder of any kind.
    pub fn is_placeholder(&self) -> bool {
        self.kind == MSO_PLACEHOLDER
    }

    /// A placeholder that can receive a figure. Title, subtitle and body
    /// placeholders are kept for text; an unknown type counts as usable.
    pub fn is_figure_placeholder(&self) -> bool {
        self.is_placeholder()
            && !matches!(
                self.placeholder_type,
                Some(PP_PLACEHOLDER_TITLE | PP_PLACEHOLDER_BODY | PP_PLACEHOLDER_SUBTITLE)
            )
    }
}

impl From<(f64, f64, f64, f64, i32)> for ShapePosition {
    fn from((x, y, width, height, kind): (f64, f64, f64, f64, i32)) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind,
            placeholder_type: None,
        }
    }
}

/// Snapshot of a slide used for placement previews.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub dims: SlideDimensions,
    pub shapes: Vec<ShapePosition>,
}

impl SlideLayout {
    /// Picture rectangles in z-order.
    pub fn pictures(&self) -> Vec<Rect> {
        self.shapes
            .iter()
            .filter(|s| s.is_picture())
            .map(|s| s.rect)
            .collect()
    }

    /// First placeholder that can take a figure, for automatic placement.
    pub fn first_placeholder(&self) -> Option<Rect> {
        self.shapes.iter().find(|s| s.is_figure_placeholder()).map(|s| s.rect)
    }
}
