// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding boxes for figure placement.
//!
//! A bounding box is either left to the server (`Auto`), given explicitly
//! in slide points, or named by a preset. Presets are kept as normalized
//! rectangles in a [`PresetTable`] so they scale with the slide size.

use crate::error::ClientError;
use crate::models::shapes::SlideDimensions;
use crate::util::geometry::{denormalize_rect, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named placement presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Preset {
    Center,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    CenterL,
    CenterXL,
    Full,
}

impl Preset {
    pub const ALL: [Preset; 10] = [
        Preset::Center,
        Preset::Left,
        Preset::Right,
        Preset::TopLeft,
        Preset::TopRight,
        Preset::BottomLeft,
        Preset::BottomRight,
        Preset::CenterL,
        Preset::CenterXL,
        Preset::Full,
    ];

    /// Canonical spelling, as understood by the server.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Center => "Center",
            Preset::Left => "Left",
            Preset::Right => "Right",
            Preset::TopLeft => "TopLeft",
            Preset::TopRight => "TopRight",
            Preset::BottomLeft => "BottomLeft",
            Preset::BottomRight => "BottomRight",
            Preset::CenterL => "CenterL",
            Preset::CenterXL => "CenterXL",
            Preset::Full => "Full",
        }
    }

    /// Built-in rectangle as fractions of the slide.
    pub fn default_rect(self) -> Rect {
        match self {
            Preset::Center => Rect::new(0.15, 0.22, 0.70, 0.70),
            Preset::Left => Rect::new(0.02, 0.22, 0.47, 0.70),
            Preset::Right => Rect::new(0.51, 0.22, 0.47, 0.70),
            Preset::TopLeft => Rect::new(0.02, 0.20, 0.47, 0.38),
            Preset::TopRight => Rect::new(0.51, 0.20, 0.47, 0.38),
            Preset::BottomLeft => Rect::new(0.02, 0.60, 0.47, 0.38),
            Preset::BottomRight => Rect::new(0.51, 0.60, 0.47, 0.38),
            Preset::CenterL => Rect::new(0.10, 0.20, 0.80, 0.75),
            Preset::CenterXL => Rect::new(0.05, 0.18, 0.90, 0.80),
            Preset::Full => Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClientError::InvalidBbox(s.to_string()))
    }
}

impl TryFrom<String> for Preset {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Preset> for String {
    fn from(preset: Preset) -> Self {
        preset.name().to_string()
    }
}

/// Where a figure should be placed on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bbox {
    /// First empty image placeholder, or `Center` if there is none.
    #[default]
    Auto,
    /// Explicit rectangle in slide points.
    Coords(Rect),
    Preset(Preset),
}

impl Bbox {
    /// Whether placement is left to the server.
    pub fn is_auto(&self) -> bool {
        matches!(self, Bbox::Auto)
    }

    /// Resolve to slide coordinates. `Auto` has no fixed rectangle.
    pub fn resolve(&self, presets: &PresetTable, dims: SlideDimensions) -> Option<Rect> {
        match self {
            Bbox::Auto => None,
            Bbox::Coords(rect) => Some(*rect),
            Bbox::Preset(preset) => Some(presets.resolve(*preset, dims)),
        }
    }
}

impl From<Rect> for Bbox {
    fn from(rect: Rect) -> Self {
        Bbox::Coords(rect)
    }
}

impl From<Preset> for Bbox {
    fn from(preset: Preset) -> Self {
        Bbox::Preset(preset)
    }
}

impl FromStr for Bbox {
    type Err = ClientError;

    /// Accepts `auto`/`none`, a preset name, or `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Bbox::Auto);
        }
        if !trimmed.contains(',') {
            return trimmed.parse().map(Bbox::Preset);
        }

        let values = trimmed
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ClientError::InvalidBbox(s.to_string()))?;
        match values[..] {
            [x, y, w, h] if values.iter().all(|v| v.is_finite()) && w > 0.0 && h > 0.0 => {
                Ok(Bbox::Coords(Rect::new(x, y, w, h)))
            }
            _ => Err(ClientError::InvalidBbox(s.to_string())),
        }
    }
}

/// Preset rectangles, normalized to the slide size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetTable {
    overrides: BTreeMap<Preset, Rect>,
}

impl PresetTable {
    /// Replace the rectangle of a preset.
    pub fn set(&mut self, preset: Preset, rect: Rect) {
        self.overrides.insert(preset, rect);
    }

    /// Normalized rectangle of a preset.
    pub fn get(&self, preset: Preset) -> Rect {
        self.overrides
            .get(&preset)
            .copied()
            .unwrap_or_else(|| preset.default_rect())
    }

    /// Scale a preset to slide points.
    pub fn resolve(&self, preset: Preset, dims: SlideDimensions) -> Rect {
        denormalize_rect(&self.get(preset), dims.width, dims.height)
    }

    /// True when no preset is overridden.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
