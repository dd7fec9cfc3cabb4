// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! pptpush - push figures into a running PowerPoint presentation
//!
//! Figures are rendered to a temporary PNG and sent, together with
//! placement instructions, to a presentation server running next to
//! PowerPoint. Calls travel either directly over HTTP or as scripts run by
//! the notebook front-end in the browser.
//!
//! ```no_run
//! use pptpush::{init_client, AddFigureOptions, ClientConfig, ImageFigure};
//! use std::path::Path;
//!
//! # fn main() -> pptpush::Result<()> {
//! let ppt = init_client(&ClientConfig::new("192.168.1.20", 5000, false))?;
//! let mut figure = ImageFigure::open(Path::new("plot.png"))?;
//! let options = AddFigureOptions {
//!     bbox: "TopLeft".parse()?,
//!     ..AddFigureOptions::default()
//! };
//! ppt.add_figure(&mut figure, &options)?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod client;
pub mod error;
pub mod io;
pub mod models;
pub mod util;

pub use app::{init_client, AddFigureOptions, Presentation, ReplaceFigureOptions};
pub use client::{connect, Availability, Client, Params, Response};
pub use error::{ClientError, Result};
pub use io::figure::{capture, CapturedFigure, Figure, ImageFigure, SaveOptions};
pub use models::bbox::{Bbox, Preset, PresetTable};
pub use models::config::{ClientConfig, TransportKind};
pub use models::placement::Placement;
pub use models::selector::PictureSelector;
pub use models::shapes::{ShapePosition, SlideDimensions, SlideLayout};
pub use util::geometry::Rect;
