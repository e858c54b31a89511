use anyhow::{Context, Result};
use blockrun_common::{GameConfig, PerspectiveCamera, ViewMode, WindowSize};
use blockrun_persist::{FileScoreStore, MemoryScoreStore, ScoreStore};
use blockrun_render::{DebugTextRenderer, Scene, frame_passes, render_frame};
use blockrun_runner::{Autopilot, TickInput, TickOutcome};
use blockrun_sandbox::{BlockKind, PointerButton, Sandbox};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod play;
mod session;

use session::RunnerSession;

#[derive(Parser)]
#[command(name = "blockrun", about = "Endless runner and voxel sandbox demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the high-score slot
    #[arg(long, global = true, default_value = "./blockrun_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the runner headless with the autopilot playing
    Run {
        /// Maximum number of ticks to simulate
        #[arg(short, long, default_value = "3600")]
        ticks: u64,
        /// Seed for obstacle placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Never jump; the run ends on the first few hits
        #[arg(long)]
        idle: bool,
        /// Print a rendered frame every N ticks
        #[arg(long)]
        dump_every: Option<u64>,
        /// Keep the high score in memory only
        #[arg(long)]
        no_save: bool,
    },
    /// Play the runner in this terminal
    Play {
        /// Seed for obstacle placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Override the configured view mode (mono or stereo)
        #[arg(long)]
        view: Option<ViewMode>,
    },
    /// Place blocks in the sandbox by simulated clicks and print the result
    Sandbox {
        /// Block kind to select before clicking
        #[arg(short, long, default_value = "stone")]
        kind: BlockKind,
        /// Clicks as `x,y` window pixels
        #[arg(value_name = "X,Y")]
        clicks: Vec<String>,
    },
    /// Print the viewport split for a window size
    Layout {
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Override the configured view mode (mono or stereo)
        #[arg(long)]
        view: Option<ViewMode>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Play mode owns the screen; keep logs quiet there unless asked.
    let filter = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Play { .. }, false) => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("blockrun v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", blockrun_common::crate_info());
            println!("runner: {}", blockrun_runner::crate_info());
            println!("sandbox: {}", blockrun_sandbox::crate_info());
            println!("render: {}", blockrun_render::crate_info());
            println!("persist: {}", blockrun_persist::crate_info());
            println!("data dir: {}", cli.data_dir.display());
        }
        Commands::Run {
            ticks,
            seed,
            idle,
            dump_every,
            no_save,
        } => {
            let store = open_store(&cli.data_dir, no_save)?;
            let mut session = RunnerSession::new(config.runner.clone(), seed, store)?;
            let pilot = Autopilot::default();
            let window = WindowSize::new(config.display.width, config.display.height);
            let mut camera = runner_camera(window);
            let mut renderer = DebugTextRenderer::new();

            println!("Runner: seed={seed}, max ticks={ticks}, autopilot={}", !idle);
            for _ in 0..ticks {
                let input = if idle {
                    TickInput::idle()
                } else {
                    pilot.decide(session.state())
                };
                let outcome = session.step(input);

                if let Some(every) = dump_every.filter(|n| *n > 0) {
                    if session.state().frame() % every == 0 {
                        for pass in render_frame(
                            &mut renderer,
                            session.scene().scene(),
                            &mut camera,
                            config.display.view_mode,
                            window,
                        ) {
                            print!("{pass}");
                        }
                    }
                }

                if let TickOutcome::GameOver {
                    score, new_record, ..
                } = outcome
                {
                    println!(
                        "Game over at frame {}: score={score}{}",
                        session.state().frame(),
                        if new_record { " (new record)" } else { "" }
                    );
                    break;
                }
            }
            println!("{}", session.state().summary());
        }
        Commands::Play { seed, view } => {
            if let Some(view) = view {
                config.display.view_mode = view;
            }
            let store = open_store(&cli.data_dir, false)?;
            let session = RunnerSession::new(config.runner.clone(), seed, store)?;
            play::run(&config, session)?;
        }
        Commands::Sandbox { kind, clicks } => {
            let window = WindowSize::new(config.display.width, config.display.height);
            let mut sandbox = Sandbox::new(&config.sandbox, window);
            sandbox.select(kind);
            for click in &clicks {
                let (x, y) = parse_click(click)?;
                sandbox.pointer_down(PointerButton::Primary, x, y);
            }
            for event in sandbox.drain_events() {
                println!("{event:?}");
            }

            let scene = Scene::from_sandbox(&sandbox);
            let mut camera = sandbox.camera().clone();
            let mut renderer = DebugTextRenderer::new();
            for pass in render_frame(
                &mut renderer,
                &scene,
                &mut camera,
                config.display.view_mode,
                window,
            ) {
                print!("{pass}");
            }
        }
        Commands::Layout {
            width,
            height,
            view,
        } => {
            let mode = view.unwrap_or(config.display.view_mode);
            for pass in frame_passes(mode, WindowSize::new(width, height)) {
                let v = pass.viewport;
                println!(
                    "{:?}: viewport=({}, {}, {}x{}) scissor={} offset_x={}",
                    pass.eye,
                    v.x,
                    v.y,
                    v.width,
                    v.height,
                    pass.scissor.is_some(),
                    pass.view_offset.map_or(0.0, |o| o.x)
                );
            }
        }
    }

    Ok(())
}

fn open_store(data_dir: &Path, in_memory: bool) -> Result<Box<dyn ScoreStore>> {
    if in_memory {
        return Ok(Box::new(MemoryScoreStore::new()));
    }
    let store = FileScoreStore::open(data_dir)
        .with_context(|| format!("opening data dir {}", data_dir.display()))?;
    Ok(Box::new(store))
}

/// Chase camera behind and above the agent, looking down the track.
fn runner_camera(window: WindowSize) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(75.0, window.aspect(), 0.1, 1000.0);
    camera.position = glam::Vec3::new(0.0, 3.0, 6.0);
    camera.rotation.x = -0.3;
    camera
}

fn parse_click(text: &str) -> Result<(f32, f32)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("click `{text}` is not of the form x,y"))?;
    let x = x.trim().parse().with_context(|| format!("bad x in `{text}`"))?;
    let y = y.trim().parse().with_context(|| format!("bad y in `{text}`"))?;
    Ok((x, y))
}
