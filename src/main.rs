// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! pptpush - push figures into a running PowerPoint presentation
//!
//! Command-line front-end to the presentation server: set slide titles,
//! add slides, read back slide contents and upload figures.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pptpush::io::serialization;
use pptpush::{
    init_client, AddFigureOptions, Bbox, ClientConfig, Figure, ImageFigure, Params,
    PictureSelector, Presentation, ReplaceFigureOptions, Response, SaveOptions, TransportKind,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pptpush", version, about = "Push figures into a running PowerPoint presentation")]
struct Cli {
    /// Client config file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Server port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Call the server directly instead of emitting notebook scripts
    #[arg(long, global = true)]
    direct: bool,

    /// Request timeout in seconds (direct transport)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bring title and subtitle to front
    TitleToFront {
        #[arg(long)]
        slide: Option<u32>,
    },
    /// Set the title of a slide
    SetTitle {
        title: String,
        #[arg(long)]
        slide: Option<u32>,
    },
    /// Set the subtitle of a slide
    SetSubtitle {
        subtitle: String,
        #[arg(long)]
        slide: Option<u32>,
    },
    /// Add a slide
    AddSlide {
        /// Insert after this slide (default: active slide)
        #[arg(long)]
        after: Option<u32>,
        /// Copy the layout of this slide (default: active slide)
        #[arg(long)]
        layout_as: Option<u32>,
    },
    /// Print positions of all shapes on a slide
    Shapes {
        #[arg(long)]
        slide: Option<u32>,
    },
    /// Print positions of all pictures on a slide
    Images {
        #[arg(long)]
        slide: Option<u32>,
    },
    /// Print the slide size in points
    Dimensions,
    /// Print speaker notes of all slides
    Notes,
    /// Add an image to a slide
    AddFigure(AddFigureArgs),
    /// Replace a picture on a slide with an image
    ReplaceFigure(ReplaceFigureArgs),
    /// Invoke a remote method with key=value parameters
    Call {
        method: String,
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, Value)>,
        /// Send as POST with a JSON body
        #[arg(long)]
        post: bool,
    },
    /// Write the effective configuration to a file
    InitConfig { path: PathBuf },
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Image file to upload
    image: PathBuf,
    /// Resample the image to this DPI before upload
    #[arg(long)]
    dpi: Option<f64>,
    /// Make background-coloured pixels transparent
    #[arg(long)]
    transparent: bool,
    /// Do not crop uniform borders
    #[arg(long)]
    no_tight: bool,
    #[arg(long)]
    slide: Option<u32>,
}

impl RenderArgs {
    fn save_options(&self) -> SaveOptions {
        SaveOptions {
            dpi: self.dpi,
            transparent: self.transparent,
            ..SaveOptions::default()
        }
    }

    fn open(&self) -> Result<ImageFigure> {
        ImageFigure::open(&self.image).with_context(|| format!("Failed to load {}", self.image.display()))
    }
}

#[derive(Debug, Args)]
struct AddFigureArgs {
    #[command(flatten)]
    render: RenderArgs,
    /// Preset name, `x,y,width,height` in points, or `auto`
    #[arg(long, default_value = "auto", value_parser = parse_bbox)]
    bbox: Bbox,
    /// Stretch the image to the bbox
    #[arg(long)]
    no_keep_aspect: bool,
    /// Keep empty placeholders on the slide
    #[arg(long)]
    keep_placeholders: bool,
    /// Replace the picture overlapping the bbox the most
    #[arg(long)]
    replace: bool,
    /// Only print where the figure would be placed
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct ReplaceFigureArgs {
    #[command(flatten)]
    render: RenderArgs,
    /// Picture by position in the slide's list of pictures
    #[arg(long)]
    pic: Option<u32>,
    /// Picture by rank from the left
    #[arg(long)]
    left: Option<u32>,
    /// Picture by rank from the top
    #[arg(long)]
    top: Option<u32>,
    /// Picture by z-order, counting from the front
    #[arg(long)]
    zorder: Option<u32>,
    /// Stretch the image to the replaced picture's box
    #[arg(long)]
    no_keep_aspect: bool,
    /// Leave the new picture on top instead of at the old z-order
    #[arg(long)]
    no_keep_zorder: bool,
    /// Only print where the figure would be placed
    #[arg(long)]
    dry_run: bool,
}

fn parse_bbox(s: &str) -> Result<Bbox, String> {
    s.parse().map_err(|e: pptpush::ClientError| e.to_string())
}

fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Config file (if any) overlaid with command-line flags.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => serialization::load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.direct {
        config.transport = TransportKind::Direct;
    }
    if cli.timeout.is_some() {
        config.timeout_secs = cli.timeout;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: Option<T>) -> Result<()> {
    match value {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => log::info!("Request handed to the notebook front-end"),
    }
    Ok(())
}

fn print_response(response: Response) {
    match response {
        Response::Body(body) => println!("{body}"),
        Response::Deferred => log::info!("Request handed to the notebook front-end"),
    }
}

fn add_figure(ppt: &Presentation, args: &AddFigureArgs) -> Result<()> {
    let mut figure = args.render.open()?;
    let options = AddFigureOptions {
        bbox: args.bbox,
        slide_no: args.render.slide,
        keep_aspect: !args.no_keep_aspect,
        tight: !args.render.no_tight,
        delete_placeholders: !args.keep_placeholders,
        replace: args.replace,
        save: args.render.save_options(),
    };

    if args.dry_run {
        if options.tight {
            figure.tight_layout();
        }
        return print_json(ppt.preview_add_figure(&figure, &options)?);
    }
    print_response(ppt.add_figure(&mut figure, &options)?);
    Ok(())
}

fn replace_figure(ppt: &Presentation, args: &ReplaceFigureArgs) -> Result<()> {
    let mut figure = args.render.open()?;
    let options = ReplaceFigureOptions {
        selector: PictureSelector::from_indices(args.pic, args.left, args.top, args.zorder)?,
        slide_no: args.render.slide,
        keep_aspect: !args.no_keep_aspect,
        keep_zorder: !args.no_keep_zorder,
        tight: !args.render.no_tight,
        save: args.render.save_options(),
    };

    if args.dry_run {
        if options.tight {
            figure.tight_layout();
        }
        let plan = ppt.preview_replace_figure(&figure, &options)?;
        if plan.is_none() {
            log::warn!("No picture matches {:?}", options.selector);
        }
        return print_json(plan);
    }
    print_response(ppt.replace_figure(&mut figure, &options)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    if let Command::InitConfig { path } = &cli.command {
        serialization::save_config(&config, path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        return Ok(());
    }

    let ppt = init_client(&config).context("Failed to initialize client")?;
    log::debug!("Using {} transport", ppt.client().kind());

    match &cli.command {
        Command::TitleToFront { slide } => print_response(ppt.title_to_front(*slide)?),
        Command::SetTitle { title, slide } => print_response(ppt.set_title(title, *slide)?),
        Command::SetSubtitle { subtitle, slide } => print_response(ppt.set_subtitle(subtitle, *slide)?),
        Command::AddSlide { after, layout_as } => print_json(ppt.add_slide(*after, *layout_as)?)?,
        Command::Shapes { slide } => print_json(ppt.get_shape_positions(*slide)?)?,
        Command::Images { slide } => print_json(ppt.get_image_positions(*slide)?)?,
        Command::Dimensions => print_json(ppt.get_slide_dimensions()?)?,
        Command::Notes => print_json(ppt.get_notes()?)?,
        Command::AddFigure(args) => add_figure(&ppt, args)?,
        Command::ReplaceFigure(args) => replace_figure(&ppt, args)?,
        Command::Call { method, params, post } => {
            let params: Params = params.iter().cloned().collect();
            let response = if *post {
                ppt.client().post(method, &params)?
            } else {
                ppt.client().get(method, &params)?
            };
            print_response(response);
        }
        Command::InitConfig { .. } => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    run(Cli::parse())
}
