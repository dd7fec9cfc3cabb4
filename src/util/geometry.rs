// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the rectangle type used for slide placement and
//! utilities for scaling normalized (fraction of slide) rectangles to slide
//! coordinates, fitting aspect ratios and measuring overlap.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x, y, width, height)`.
///
/// Slide coordinates are in points with the origin at the top-left corner.
/// Normalized rectangles use the same layout with fractions of the slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Width times height.
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Width divided by height, `None` for a degenerate rectangle.
    pub fn aspect(&self) -> Option<f64> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

/// Convert a normalized rectangle (0.0 to 1.0) to slide coordinates.
pub fn denormalize_rect(rect: &Rect, slide_width: f64, slide_height: f64) -> Rect {
    Rect::new(
        rect.x * slide_width,
        rect.y * slide_height,
        rect.width * slide_width,
        rect.height * slide_height,
    )
}

/// Shrink `target` to the given aspect ratio, keeping it centred.
pub fn fit_aspect(target: &Rect, aspect: f64) -> Rect {
    let Some(target_aspect) = target.aspect() else {
        return *target;
    };
    if aspect <= 0.0 || !aspect.is_finite() {
        return *target;
    }

    if aspect > target_aspect {
        // Figure is wider than the box - fit to width
        let height = target.width / aspect;
        Rect::new(target.x, target.y + (target.height - height) / 2.0, target.width, height)
    } else {
        // Figure is taller - fit to height
        let width = target.height * aspect;
        Rect::new(target.x + (target.width - width) / 2.0, target.y, width, target.height)
    }
}

/// Area of the intersection of two rectangles.
pub fn overlap_area(a: &Rect, b: &Rect) -> f64 {
    let w = a.right().min(b.right()) - a.x.max(b.x);
    let h = a.bottom().min(b.bottom()) - a.y.max(b.y);
    if w > 0.0 && h > 0.0 {
        w * h
    } else {
        0.0
    }
}

/// Index of the rectangle overlapping `target` the most.
///
/// Returns `None` when nothing overlaps. Ties go to the earliest rectangle.
pub fn most_overlapping(target: &Rect, candidates: &[Rect]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, rect) in candidates.iter().enumerate() {
        let area = overlap_area(target, rect);
        if area > 0.0 && best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((idx, area));
        }
    }
    best.map(|(idx, _)| idx)
}
