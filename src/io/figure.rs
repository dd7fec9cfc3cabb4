// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Figure capture.
//!
//! This module defines the [`Figure`] interface that a plotting backend
//! implements, a raster implementation on top of the `image` crate, and
//! [`capture`], which renders a figure into a temporary PNG for upload.

use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tempfile::TempPath;

/// Dots per inch assumed for rasters without other information.
pub const DEFAULT_DPI: f64 = 100.0;

/// Padding kept around the content by [`Figure::tight_layout`], in inches.
const TIGHT_PAD_INCHES: f64 = 0.1;

/// Rendering options applied when saving, also forwarded to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub transparent: bool,
    /// Backend-specific options, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plotted figure that can be written to an image file.
pub trait Figure {
    /// Figure size `(width, height)` in inches.
    fn size_inches(&self) -> (f64, f64);

    /// Tighten the layout before saving.
    fn tight_layout(&mut self);

    /// Write the figure as PNG.
    fn save(&self, path: &Path, options: &SaveOptions) -> Result<()>;

    /// Width over height, `None` for an empty figure.
    fn aspect(&self) -> Option<f64> {
        let (w, h) = self.size_inches();
        (w > 0.0 && h > 0.0).then(|| w / h)
    }
}

/// A figure backed by an in-memory raster.
#[derive(Debug, Clone)]
pub struct ImageFigure {
    image: RgbaImage,
    dpi: f64,
}

impl ImageFigure {
    /// Wrap a raster rendered at `dpi`. Non-positive values fall back to
    /// [`DEFAULT_DPI`].
    pub fn new(image: RgbaImage, dpi: f64) -> Self {
        let dpi = if dpi > 0.0 { dpi } else { DEFAULT_DPI };
        Self { image, dpi }
    }

    /// Load a figure from an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)?.to_rgba8();
        log::debug!("Loaded figure {} ({}x{})", path.display(), image.width(), image.height());
        Ok(Self::new(image, DEFAULT_DPI))
    }

    /// Raster size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn background(&self) -> Option<Rgba<u8>> {
        (self.image.width() > 0 && self.image.height() > 0).then(|| *self.image.get_pixel(0, 0))
    }

    /// Bounding box `(x, y, w, h)` of pixels differing from the background.
    fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let bg = self.background()?;
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0, 0);
        for (x, y, pixel) in self.image.enumerate_pixels() {
            if *pixel != bg {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
        (min_x <= max_x && min_y <= max_y).then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

impl Figure for ImageFigure {
    fn size_inches(&self) -> (f64, f64) {
        (
            f64::from(self.image.width()) / self.dpi,
            f64::from(self.image.height()) / self.dpi,
        )
    }

    /// Crop uniform borders, keeping a small margin.
    fn tight_layout(&mut self) {
        let Some((x, y, w, h)) = self.content_bounds() else {
            return;
        };
        let pad = (TIGHT_PAD_INCHES * self.dpi).round() as u32;
        let x0 = x.saturating_sub(pad);
        let y0 = y.saturating_sub(pad);
        let x1 = (x + w + pad).min(self.image.width());
        let y1 = (y + h + pad).min(self.image.height());
        if (x0, y0, x1, y1) == (0, 0, self.image.width(), self.image.height()) {
            return;
        }

        log::debug!("Tight layout cropped figure to {}x{}", x1 - x0, y1 - y0);
        self.image = imageops::crop_imm(&self.image, x0, y0, x1 - x0, y1 - y0).to_image();
    }

    fn save(&self, path: &Path, options: &SaveOptions) -> Result<()> {
        let mut out = self.image.clone();
        if options.transparent {
            if let Some(bg) = self.background() {
                for pixel in out.pixels_mut().filter(|p| **p == bg) {
                    pixel.0[3] = 0;
                }
            }
        }

        if let Some(dpi) = options.dpi.filter(|&dpi| dpi > 0.0 && (dpi - self.dpi).abs() > f64::EPSILON) {
            let scale = dpi / self.dpi;
            let w = ((f64::from(out.width()) * scale).round() as u32).max(1);
            let h = ((f64::from(out.height()) * scale).round() as u32).max(1);
            out = imageops::resize(&out, w, h, FilterType::Lanczos3);
        }

        out.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// A figure saved to a temporary PNG file.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct CapturedFigure {
    path: TempPath,
}

impl CapturedFigure {
    /// Location of the PNG, valid while this value is alive.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Save a figure to a fresh temporary file.
pub fn capture(figure: &mut dyn Figure, tight: bool, options: &SaveOptions) -> Result<CapturedFigure> {
    let path = tempfile::Builder::new()
        .prefix("pptpush-")
        .suffix(".png")
        .tempfile()?
        .into_temp_path();

    if tight {
        figure.tight_layout();
    }
    figure.save(&path, options)?;
    log::debug!("Captured figure to {}", path.display());

    Ok(CapturedFigure { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White 40x20 canvas with a black 10x4 block at (15, 8).
    fn sample() -> ImageFigure {
        let mut image = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));
        for x in 15..25 {
            for y in 8..12 {
                image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        ImageFigure::new(image, 10.0)
    }

    #[test]
    fn test_size_inches() {
        let figure = sample();
        assert_eq!(figure.size_inches(), (4.0, 2.0));
        assert_eq!(figure.aspect(), Some(2.0));
    }

    #[test]
    fn test_tight_layout_crops_with_padding() {
        let mut figure = sample();
        figure.tight_layout();
        // One pixel of padding at 10 dpi
        assert_eq!(figure.dimensions(), (12, 6));
    }

    #[test]
    fn test_tight_layout_on_blank_figure() {
        let mut figure = ImageFigure::new(RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255])), 10.0);
        figure.tight_layout();
        assert_eq!(figure.dimensions(), (8, 8));
    }

    #[test]
    fn test_capture_writes_png_and_cleans_up() {
        let mut figure = sample();
        let captured = capture(&mut figure, false, &SaveOptions::default()).unwrap();
        let path = captured.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (40, 20));

        drop(captured);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_with_dpi_and_transparency() {
        let figure = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.png");
        let options = SaveOptions {
            dpi: Some(20.0),
            transparent: true,
            ..SaveOptions::default()
        };
        figure.save(&path, &options).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (80, 40));
        assert_eq!(saved.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_save_options_serialize_flat() {
        let mut options = SaveOptions {
            dpi: Some(150.0),
            ..SaveOptions::default()
        };
        options.extra.insert("facecolor".into(), Value::from("white"));
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, serde_json::json!({ "dpi": 150.0, "facecolor": "white" }));
    }
}
