use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    DirSource, OffscreenCanvas, PreloadHandle, PreloadOpts, Progress, ProgressSource,
    RenderOutcome, SceneConfig, ScrollLayout, ScrollScene, ScrollTracker, ViewportSize,
};
use tracing_subscriber::EnvFilter;

/// Env var overriding the preload worker count.
const PRELOAD_THREADS_ENV: &str = "SCROLLREEL_PRELOAD_THREADS";

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a scroll progress as a PNG.
    Frame(FrameArgs),
    /// Print the overlay panel states at a scroll progress as JSON.
    Overlay(OverlayArgs),
    /// Preload a sequence and report which frames are missing.
    Probe(SourceArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Directory serving the frames. With `--config`, defaults to the config's directory.
    #[arg(long)]
    seq: Option<PathBuf>,

    /// Scene config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame count when no config is given.
    #[arg(long, default_value_t = scrollreel::DEFAULT_FRAME_COUNT)]
    count: usize,

    /// Preload worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Scroll progress in [0, 1]; values outside are clamped.
    #[arg(long)]
    progress: f64,

    /// Canvas layout width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Canvas layout height in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Scroll progress in [0, 1]; values outside are clamped.
    #[arg(long)]
    progress: f64,

    /// Scene config JSON supplying a custom choreography.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Overlay(args) => cmd_overlay(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn load_config(args: &SourceArgs) -> anyhow::Result<(SceneConfig, PathBuf)> {
    match (&args.config, &args.seq) {
        (Some(path), seq) => {
            let config = SceneConfig::from_json_file(path)?;
            let root = seq.clone().unwrap_or_else(|| {
                path.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            Ok((config, root))
        }
        (None, Some(seq)) => {
            let mut config = SceneConfig::new("");
            config.frame_count = args.count;
            config.validate()?;
            Ok((config, seq.clone()))
        }
        (None, None) => anyhow::bail!("either --seq or --config is required"),
    }
}

fn preload_threads(args: &SourceArgs) -> anyhow::Result<Option<usize>> {
    if args.threads.is_some() {
        return Ok(args.threads);
    }
    match std::env::var(PRELOAD_THREADS_ENV) {
        Ok(v) => {
            let n = v
                .parse::<usize>()
                .with_context(|| format!("parse {PRELOAD_THREADS_ENV}='{v}'"))?;
            Ok(Some(n))
        }
        Err(_) => Ok(None),
    }
}

fn preload(args: &SourceArgs) -> anyhow::Result<(SceneConfig, PreloadHandle)> {
    let (config, root) = load_config(args)?;
    let opts = PreloadOpts {
        threads: preload_threads(args)?,
    };
    let source = DirSource::new(root);
    let seq = scrollreel::preload_sequence(&config.sequence_spec(), &source, &opts)?;
    Ok((config, PreloadHandle::ready(std::sync::Arc::new(seq))))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (config, frames) = preload(&args.source)?;

    let viewport = ViewportSize::new(args.width, args.height);
    let canvas = OffscreenCanvas::new(viewport, args.dpr);
    let scene = Rc::new(RefCell::new(ScrollScene::from_config(&config, frames, canvas)?));

    let layout = ScrollLayout::tall_container(args.height, config.container_viewports);
    let mut tracker = ScrollTracker::new(layout);
    let sub = ScrollScene::attach(&scene, &mut tracker);
    tracker.on_scroll(layout.scroll_top_for(Progress::new(args.progress)));
    tracker.unsubscribe(sub);

    let scene = scene.borrow();
    match scene.last_outcome() {
        Some(RenderOutcome::Drawn { index, .. }) => {
            eprintln!("frame {} at progress {:.4}", index.0, scene.progress().get());
        }
        Some(RenderOutcome::MissingFrame { index }) => {
            anyhow::bail!("frame {} failed to load; nothing to draw", index.0)
        }
        other => anyhow::bail!("nothing was drawn ({other:?})"),
    }

    let surface = scene
        .target()
        .surface()
        .context("canvas has no drawing surface")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = match config.background_rgba {
        Some(background) => surface.to_rgba_image_over(background)?,
        None => surface.to_rgba_image()?,
    };
    png.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let choreography = match &args.config {
        Some(path) => SceneConfig::from_json_file(path)?.choreography()?,
        None => scrollreel::Choreography::standard()?,
    };
    let states = choreography.sample(Progress::new(args.progress));
    println!(
        "{}",
        serde_json::to_string_pretty(&states).context("serialize panel states")?
    );
    Ok(())
}

fn cmd_probe(args: SourceArgs) -> anyhow::Result<()> {
    let (config, frames) = preload(&args)?;
    let seq = frames.wait()?;
    let spec = config.sequence_spec();

    println!("loaded {}/{}", seq.loaded_count(), seq.len());
    for index in seq.missing() {
        println!("missing {}", spec.asset_path(index));
    }
    Ok(())
}
