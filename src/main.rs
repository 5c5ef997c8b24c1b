//! Bezier patch viewer
//!
//! Interactive window by default; `render` draws frames headless to PNG.

mod window;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use bezier_raster::app::Renderer;
use bezier_raster::rasterizer::{Matrix4, Vector3, HEIGHT, WIDTH};
use bezier_raster::scene::{
    load_control_points, load_render_parameters, save_control_points, save_render_parameters,
    ControlPoints, RenderParameters,
};

#[derive(Parser, Debug)]
#[command(name = "bezier-raster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive viewer (default).
    Window(SceneArgs),
    /// Render frames to PNG without opening a window.
    Render(RenderArgs),
    /// Write the default parameters and control points as RON files.
    DumpDefaults {
        /// Output directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct SceneArgs {
    /// Render parameters (RON).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Control points (RON list of 16 points).
    #[arg(long)]
    points: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<usize>,

    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path. With several frames, the frame number is appended.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: usize,

    /// Turntable rotation about the y axis per frame, in degrees.
    #[arg(long, default_value_t = 0.0)]
    spin: f32,
}

impl SceneArgs {
    fn size(&self) -> (usize, usize) {
        (self.width.unwrap_or(WIDTH), self.height.unwrap_or(HEIGHT))
    }

    fn load(&self) -> anyhow::Result<(RenderParameters, ControlPoints)> {
        let params = match &self.params {
            Some(path) => load_render_parameters(path)
                .with_context(|| format!("loading render parameters from {}", path.display()))?,
            None => RenderParameters::default(),
        };
        let points = match &self.points {
            Some(path) => load_control_points(path)
                .with_context(|| format!("loading control points from {}", path.display()))?,
            None => ControlPoints::default(),
        };
        Ok((params, points))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Command::Window(SceneArgs::default())) {
        Command::Window(scene) => {
            let (params, points) = scene.load()?;
            let (width, height) = scene.size();
            info!(version = bezier_raster::VERSION, width, height, "Opening viewer");
            macroquad::Window::from_config(
                window::window_conf(width, height),
                window::run(params, points),
            );
            Ok(())
        }
        Command::Render(args) => render_headless(&args),
        Command::DumpDefaults { dir } => dump_defaults(&dir),
    }
}

fn frame_path(out: &Path, frame: usize, frames: usize) -> PathBuf {
    if frames <= 1 {
        return out.to_path_buf();
    }
    let stem = out.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    out.with_file_name(format!("{}_{:04}.png", stem, frame))
}

fn render_headless(args: &RenderArgs) -> anyhow::Result<()> {
    let (mut params, points) = args.scene.load()?;
    let (width, height) = args.scene.size();
    let frames = args.frames.max(1);
    let spin = Matrix4::rotation(Vector3::Y, args.spin.to_radians());

    let mut renderer = Renderer::new(width, height);

    #[cfg(not(target_arch = "wasm32"))]
    let progress = indicatif::ProgressBar::new(frames as u64);

    for frame in 0..frames {
        let stats = renderer.render_frame(&params, &points);
        let path = frame_path(&args.out, frame, frames);
        renderer
            .buffer()
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            frame,
            fragments = stats.fragments,
            pixels = stats.pixels_written,
            seconds = stats.elapsed.as_secs_f64(),
            path = %path.display(),
            "Rendered frame"
        );
        params.rotation = spin * params.rotation;

        #[cfg(not(target_arch = "wasm32"))]
        progress.inc(1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    progress.finish_and_clear();
    Ok(())
}

fn dump_defaults(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let params_path = dir.join("params.ron");
    let points_path = dir.join("points.ron");
    save_render_parameters(&RenderParameters::default(), &params_path)?;
    save_control_points(&ControlPoints::default(), &points_path)?;
    info!(params = %params_path.display(), points = %points_path.display(), "Wrote defaults");
    Ok(())
}
