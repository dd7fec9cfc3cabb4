// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Placement planning.
//!
//! The server performs the actual insertion; these functions reproduce its
//! placement rules against a slide snapshot so callers can preview where a
//! figure will land.

use super::bbox::{Bbox, Preset, PresetTable};
use super::selector::PictureSelector;
use super::shapes::SlideLayout;
use crate::util::geometry::{fit_aspect, most_overlapping, Rect};
use serde::Serialize;

/// Where a figure will be placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Final rectangle of the inserted picture
    pub rect: Rect,
    /// Index (into the slide's pictures) of a picture being replaced
    pub replaces: Option<usize>,
}

/// Plan an `add_figure` call.
pub fn plan_add_figure(
    bbox: &Bbox,
    replace: bool,
    keep_aspect: bool,
    figure_aspect: Option<f64>,
    presets: &PresetTable,
    layout: &SlideLayout,
) -> Placement {
    let target = bbox.resolve(presets, layout.dims).unwrap_or_else(|| {
        layout
            .first_placeholder()
            .unwrap_or_else(|| presets.resolve(Preset::Center, layout.dims))
    });

    let pictures = layout.pictures();
    let replaces = if replace {
        most_overlapping(&target, &pictures)
    } else {
        None
    };
    // An overlapping picture's position wins over the requested bbox
    let target = replaces.map_or(target, |idx| pictures[idx]);

    Placement {
        rect: apply_aspect(target, keep_aspect, figure_aspect),
        replaces,
    }
}

/// Plan a `replace_figure` call. `None` when the selector matches nothing.
pub fn plan_replace_figure(
    selector: &PictureSelector,
    keep_aspect: bool,
    figure_aspect: Option<f64>,
    layout: &SlideLayout,
) -> Option<Placement> {
    let pictures = layout.pictures();
    let idx = selector.pick(&pictures)?;
    Some(Placement {
        rect: apply_aspect(pictures[idx], keep_aspect, figure_aspect),
        replaces: Some(idx),
    })
}

fn apply_aspect(target: Rect, keep_aspect: bool, figure_aspect: Option<f64>) -> Rect {
    match figure_aspect {
        Some(aspect) if keep_aspect => fit_aspect(&target, aspect),
        _ => target,
    }
}
