// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentation API.
//!
//! This module contains [`Presentation`], the handle callers use to drive
//! the remote presentation: slide titles, slide creation, read-back of slide
//! contents, and the two figure workflows. It owns the transport selected
//! at initialization and the preset table used to resolve bounding boxes.

use crate::client::{self, params_of, Client, Params, Response};
use crate::error::Result;
use crate::io::figure::{capture, Figure, SaveOptions};
use crate::models::{
    bbox::{Bbox, PresetTable},
    config::ClientConfig,
    placement::{self, Placement},
    selector::PictureSelector,
    shapes::{ShapePosition, SlideDimensions, SlideLayout},
};
use crate::util::geometry::Rect;
use serde::{Serialize, Serializer};
use std::cell::OnceCell;

/// Options for [`Presentation::add_figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddFigureOptions {
    pub bbox: Bbox,
    /// 1-based slide number; the active slide when `None`
    pub slide_no: Option<u32>,
    /// Preserve the figure's aspect ratio inside the bbox
    pub keep_aspect: bool,
    /// Tighten the figure layout before saving
    pub tight: bool,
    /// Delete empty placeholders on the slide. Ignored for `Bbox::Auto`.
    pub delete_placeholders: bool,
    /// Replace the picture overlapping the bbox the most, if any
    pub replace: bool,
    pub save: SaveOptions,
}

impl Default for AddFigureOptions {
    fn default() -> Self {
        Self {
            bbox: Bbox::Auto,
            slide_no: None,
            keep_aspect: true,
            tight: true,
            delete_placeholders: true,
            replace: false,
            save: SaveOptions::default(),
        }
    }
}

/// Options for [`Presentation::replace_figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceFigureOptions {
    pub selector: PictureSelector,
    pub slide_no: Option<u32>,
    /// Preserve the figure's aspect ratio inside the replaced picture's box
    pub keep_aspect: bool,
    /// Move the new picture to the z-order of the one it replaces
    pub keep_zorder: bool,
    pub tight: bool,
    pub save: SaveOptions,
}

impl Default for ReplaceFigureOptions {
    fn default() -> Self {
        Self {
            selector: PictureSelector::default(),
            slide_no: None,
            keep_aspect: true,
            keep_zorder: true,
            tight: true,
            save: SaveOptions::default(),
        }
    }
}

/// Bounding box as sent to the server.
#[derive(Debug, Clone, PartialEq)]
enum WireBbox {
    Auto,
    Coords(Rect),
    Named(&'static str),
}

impl Serialize for WireBbox {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            WireBbox::Auto => serializer.serialize_none(),
            WireBbox::Coords(rect) => rect.serialize(serializer),
            WireBbox::Named(name) => serializer.serialize_str(name),
        }
    }
}

#[derive(Serialize)]
struct AddFigureParams<'a> {
    bbox: WireBbox,
    slide_no: Option<u32>,
    keep_aspect: bool,
    delete_placeholders: bool,
    replace: bool,
    #[serde(flatten)]
    save: &'a SaveOptions,
}

#[derive(Serialize)]
struct ReplaceFigureParams<'a> {
    #[serde(flatten)]
    selector: PictureSelector,
    slide_no: Option<u32>,
    keep_aspect: bool,
    keep_zorder: bool,
    #[serde(flatten)]
    save: &'a SaveOptions,
}

#[derive(Serialize)]
struct SlideParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    slide_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout_as: Option<u32>,
}

impl<'a> SlideParams<'a> {
    fn slide(slide_no: Option<u32>) -> Self {
        Self {
            title: None,
            subtitle: None,
            slide_no,
            layout_as: None,
        }
    }
}

/// Handle on the remote presentation.
pub struct Presentation {
    client: Box<dyn Client>,
    presets: PresetTable,
    slide_dims: OnceCell<Option<SlideDimensions>>,
}

/// Connect to the server described by `config`.
pub fn init_client(config: &ClientConfig) -> Result<Presentation> {
    let client = client::connect(config)?;
    Ok(Presentation::new(client, config.presets.clone()))
}

impl Presentation {
    /// Wrap an already connected client.
    pub fn new(client: Box<dyn Client>, presets: PresetTable) -> Self {
        Self {
            client,
            presets,
            slide_dims: OnceCell::new(),
        }
    }

    /// The underlying transport, for raw calls.
    pub fn client(&self) -> &dyn Client {
        self.client.as_ref()
    }

    /// Preset rectangles used to resolve named bboxes.
    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    fn call(&self, method: &str, params: &Params) -> Result<Response> {
        log::debug!("Calling {} with {} parameter(s)", method, params.len());
        self.client.get(method, params)
    }

    /// Bring title and subtitle to front.
    pub fn title_to_front(&self, slide_no: Option<u32>) -> Result<Response> {
        self.call("title_to_front", &params_of(&SlideParams::slide(slide_no))?)
    }

    /// Set the title of a slide. Only the first title placeholder is set.
    pub fn set_title(&self, title: &str, slide_no: Option<u32>) -> Result<Response> {
        let params = SlideParams {
            title: Some(title),
            ..SlideParams::slide(slide_no)
        };
        self.call("set_title", &params_of(&params)?)
    }

    /// Set the subtitle of a slide.
    pub fn set_subtitle(&self, subtitle: &str, slide_no: Option<u32>) -> Result<Response> {
        let params = SlideParams {
            subtitle: Some(subtitle),
            ..SlideParams::slide(slide_no)
        };
        self.call("set_subtitle", &params_of(&params)?)
    }

    /// Add a slide after `slide_no` with the layout of slide `layout_as`.
    ///
    /// Both default to the active slide. Returns the new slide's number.
    pub fn add_slide(&self, slide_no: Option<u32>, layout_as: Option<u32>) -> Result<Option<u32>> {
        let params = SlideParams {
            layout_as,
            ..SlideParams::slide(slide_no)
        };
        self.call("add_slide", &params_of(&params)?)?.json()
    }

    /// Positions of all shapes on a slide, in z-order.
    pub fn get_shape_positions(&self, slide_no: Option<u32>) -> Result<Option<Vec<ShapePosition>>> {
        self.call("get_shape_positions", &params_of(&SlideParams::slide(slide_no))?)?
            .json()
    }

    /// Positions of all pictures on a slide, in z-order.
    pub fn get_image_positions(&self, slide_no: Option<u32>) -> Result<Option<Vec<Rect>>> {
        self.call("get_image_positions", &params_of(&SlideParams::slide(slide_no))?)?
            .json()
    }

    /// Slide size in points. Fetched once, then cached.
    pub fn get_slide_dimensions(&self) -> Result<Option<SlideDimensions>> {
        if let Some(dims) = self.slide_dims.get() {
            return Ok(*dims);
        }
        let dims: Option<SlideDimensions> = self.call("get_slide_dimensions", &Params::new())?.json()?;
        if dims.is_none() {
            log::warn!("Slide dimensions unavailable on a deferred transport");
        }
        Ok(*self.slide_dims.get_or_init(|| dims))
    }

    /// Speaker notes of every slide.
    pub fn get_notes(&self) -> Result<Option<Vec<String>>> {
        self.call("get_notes", &Params::new())?.json()
    }

    /// Translate a bbox into what the server receives.
    fn wire_bbox(&self, bbox: &Bbox) -> Result<WireBbox> {
        Ok(match bbox {
            Bbox::Auto => WireBbox::Auto,
            Bbox::Coords(rect) => WireBbox::Coords(*rect),
            Bbox::Preset(preset) => match self.get_slide_dimensions()? {
                Some(dims) => WireBbox::Coords(self.presets.resolve(*preset, dims)),
                None => WireBbox::Named(preset.name()),
            },
        })
    }

    fn add_figure_params(&self, options: &AddFigureOptions) -> Result<Params> {
        // Auto placement fills a placeholder and keeps all the others
        let delete_placeholders = options.delete_placeholders && !options.bbox.is_auto();
        params_of(&AddFigureParams {
            bbox: self.wire_bbox(&options.bbox)?,
            slide_no: options.slide_no,
            keep_aspect: options.keep_aspect,
            delete_placeholders,
            replace: options.replace,
            save: &options.save,
        })
    }

    /// Add a figure to a slide.
    pub fn add_figure(&self, figure: &mut dyn Figure, options: &AddFigureOptions) -> Result<Response> {
        let params = self.add_figure_params(options)?;
        // Deleted on drop, after the call returns or fails
        let captured = capture(figure, options.tight, &options.save)?;
        self.client.post_and_figure("add_figure", captured.path(), &params)
    }

    /// Delete a picture from a slide and put the figure in its place.
    pub fn replace_figure(
        &self,
        figure: &mut dyn Figure,
        options: &ReplaceFigureOptions,
    ) -> Result<Response> {
        let params = params_of(&ReplaceFigureParams {
            selector: options.selector,
            slide_no: options.slide_no,
            keep_aspect: options.keep_aspect,
            keep_zorder: options.keep_zorder,
            save: &options.save,
        })?;
        let captured = capture(figure, options.tight, &options.save)?;
        self.client.post_and_figure("replace_figure", captured.path(), &params)
    }

    /// Fetch a snapshot of a slide. `None` on a deferred transport.
    pub fn slide_layout(&self, slide_no: Option<u32>) -> Result<Option<SlideLayout>> {
        let Some(dims) = self.get_slide_dimensions()? else {
            return Ok(None);
        };
        Ok(self
            .get_shape_positions(slide_no)?
            .map(|shapes| SlideLayout { dims, shapes }))
    }

    /// Predict where `add_figure` will place a figure.
    pub fn preview_add_figure(
        &self,
        figure: &dyn Figure,
        options: &AddFigureOptions,
    ) -> Result<Option<Placement>> {
        let Some(layout) = self.slide_layout(options.slide_no)? else {
            return Ok(None);
        };
        Ok(Some(placement::plan_add_figure(
            &options.bbox,
            options.replace,
            options.keep_aspect,
            figure.aspect(),
            &self.presets,
            &layout,
        )))
    }

    /// Predict which picture `replace_figure` will replace.
    pub fn preview_replace_figure(
        &self,
        figure: &dyn Figure,
        options: &ReplaceFigureOptions,
    ) -> Result<Option<Placement>> {
        let Some(layout) = self.slide_layout(options.slide_no)? else {
            return Ok(None);
        };
        Ok(placement::plan_replace_figure(
            &options.selector,
            options.keep_aspect,
            figure.aspect(),
            &layout,
        ))
    }
}
