//! Two-link arm tracking CLI.
//!
//! Provides four modes of operation:
//! - `run`: Play the target path headlessly, then write plots and a recording
//! - `path`: Print the reachable target path
//! - `solve`: Solve inverse kinematics for one point
//! - `info`: Print workspace crate versions and the default configuration

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::{Args, Parser, Subcommand};

use twolink_core::output::{ensure_dir, next_free_index, numbered_path};
use twolink_core::prelude::*;
use twolink_ik::{KinematicsSolver, solve_path};
use twolink_path::PathSampler;
use twolink_plot::{ANGLES_STEM, SVG_EXT, TRACKING_STEM, TrackingFigure, render_angles};
use twolink_record::prelude::*;
use twolink_sim::{SceneBuilder, SpawnedScene};

const MCAP_EXT: &str = "mcap";

/// Library crates versioned together with this binary.
const WORKSPACE_CRATES: [&str; 6] = [
    "twolink-core",
    "twolink-ik",
    "twolink-path",
    "twolink-sim",
    "twolink-record",
    "twolink-plot",
];

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Two-link planar arm tracking a straight line.
#[derive(Parser, Debug)]
#[command(name = "twolink", version, about)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the path and write plots and a recording.
    Run(RunArgs),

    /// Print the reachable target path.
    Path {
        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Solve inverse kinematics for one target point.
    Solve {
        /// Target x in millimetres.
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Target y in millimetres.
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print crate information.
    Info,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
struct RunArgs {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to play (default: path length times repeat).
    #[arg(short, long)]
    frames: Option<u64>,

    /// Output directory (overrides the configuration).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write an MCAP recording.
    #[arg(long)]
    no_record: bool,

    /// Do not write SVG plots.
    #[arg(long)]
    no_plots: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Install the global log subscriber.
///
/// `LogPlugin` sets the subscriber when it is built, so a throwaway app is
/// enough; every later app logs through it.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let mut app = App::new();
    app.add_plugins(LogPlugin {
        level,
        ..default()
    });
}

fn load_config(path: Option<&Path>) -> Result<TwoLinkConfig, ConfigError> {
    let config = match path {
        Some(path) => TwoLinkConfig::from_file(path)?,
        None => TwoLinkConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Outcome of one `run`: frame counts and the files written.
#[derive(Debug, Default)]
struct RunSummary {
    path_len: usize,
    scanned: usize,
    frames_played: u64,
    frames_solved: u64,
    frames_skipped: u64,
    sim_time: SimTime,
    solve_rate: Option<f64>,
    written: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_tracking(args: &RunArgs) -> Result<RunSummary, TwoLinkError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.output {
        config.output.dir.clone_from(dir);
    }
    config.output.record &= !args.no_record;
    config.output.plots &= !args.no_plots;

    let output = config.output.clone();
    let geometry = config.geometry()?;
    let line = config.path.line;
    let line_range = (config.path.x_min, config.path.x_max);

    let mut builder = SceneBuilder::new().with_config(config);
    if let Some(frames) = args.frames {
        builder = builder.with_frames(frames);
    }
    let mut scene = builder.build()?;

    // One counter for every file of this run.
    let mut index = None;
    if output.record || output.plots {
        match ensure_dir(&output.dir) {
            Ok(()) => {
                index = Some(next_free_index(
                    &output.dir,
                    &[
                        (TRACKING_STEM, SVG_EXT),
                        (ANGLES_STEM, SVG_EXT),
                        (ANGLES_STEM, MCAP_EXT),
                    ],
                ));
            }
            Err(e) => error!(
                "twolink: cannot create output directory {}: {e}",
                output.dir.display()
            ),
        }
    }

    let recording = index
        .filter(|_| output.record)
        .map(|n| numbered_path(&output.dir, ANGLES_STEM, n, MCAP_EXT));
    if let Some(path) = &recording {
        scene.app.insert_resource(RecordingConfig {
            output_path: path.clone(),
            ..RecordingConfig::default()
        });
        scene.app.add_plugins(RecorderPlugin);
    }

    scene.run();

    let mut summary = summarize(&scene);
    if let Some(path) = recording {
        match finish_recording(scene.app.world_mut()) {
            Ok(Some(messages)) => {
                debug!("twolink: {messages} messages recorded");
                summary.written.push(path);
            }
            Ok(None) => {}
            Err(e) => error!("twolink: failed to finish {}: {e}", path.display()),
        }
    }

    if let Some(n) = index.filter(|_| output.plots) {
        let history = scene.history();
        let tracking = TrackingFigure::new(geometry, line, line_range, &scene.path)
            .with_history(history)
            .render();
        match twolink_plot::save_numbered(&output.dir, TRACKING_STEM, n, &tracking) {
            Ok(path) => summary.written.push(path),
            Err(e) => error!("twolink: failed to save tracking plot: {e}"),
        }
        match render_angles(history)
            .and_then(|doc| twolink_plot::save_numbered(&output.dir, ANGLES_STEM, n, &doc))
        {
            Ok(path) => summary.written.push(path),
            Err(e) => warn!("twolink: angle plot not saved: {e}"),
        }
    }

    Ok(summary)
}

fn summarize(scene: &SpawnedScene) -> RunSummary {
    let stats = scene.stats();
    RunSummary {
        path_len: scene.path.len(),
        scanned: scene.scanned,
        frames_played: stats.frames_played,
        frames_solved: stats.frames_solved,
        frames_skipped: stats.frames_skipped,
        sim_time: *scene.app.world().resource::<SimTime>(),
        solve_rate: stats.solve_rate(),
        written: Vec::new(),
    }
}

fn print_summary(summary: &RunSummary) {
    println!(
        "path: {} of {} scanned points within reach",
        summary.path_len, summary.scanned
    );
    println!(
        "frames: played={}, solved={}, skipped={}, time={}",
        summary.frames_played, summary.frames_solved, summary.frames_skipped, summary.sim_time
    );
    if let Some(rate) = summary.solve_rate {
        println!("solve rate: {:.1}%", rate * 100.0);
    }
    for path in &summary.written {
        println!("wrote {}", path.display());
    }
}

fn run_path(config: Option<&Path>) -> Result<(), TwoLinkError> {
    let config = load_config(config)?;
    let sampler = PathSampler::new(config.geometry()?, &config.path)?;
    let path = sampler.generate();
    let solutions = solve_path(&KinematicsSolver::new(*sampler.geometry()), &path);

    println!(
        "{}: {} of {} scanned points within reach",
        sampler.line(),
        path.len(),
        sampler.scan_count()
    );
    for (i, (p, angles)) in path.iter().zip(&solutions).enumerate() {
        match angles {
            Some(angles) => {
                let (deg1, deg2) = angles.to_degrees();
                println!("{i:4} {:9.3} {:9.3}  {deg1:9.3} {deg2:9.3}", p.x, p.y);
            }
            None => println!("{i:4} {:9.3} {:9.3}  skipped", p.x, p.y),
        }
    }
    Ok(())
}

fn run_solve(x: f64, y: f64, config: Option<&Path>) -> Result<(), TwoLinkError> {
    let config = load_config(config)?;
    let solver = KinematicsSolver::new(config.geometry()?);
    let target = TargetPoint::new(x, y);

    let Some(angles) = solver.solve_point(target) else {
        let g = solver.geometry();
        println!(
            "{target} is unreachable (reach {} to {} mm)",
            g.min_reach(),
            g.max_reach()
        );
        return Ok(());
    };

    let (deg1, deg2) = angles.to_degrees();
    let pose = solver.forward(angles);
    println!("target  {target}");
    println!("theta1  {deg1:9.3} deg  ({:.6} rad)", angles.theta1);
    println!("theta2  {deg2:9.3} deg  ({:.6} rad)", angles.theta2);
    println!("elbow   ({:.3}, {:.3})", pose.elbow.x, pose.elbow.y);
    println!("effector ({:.3}, {:.3})", pose.effector.x, pose.effector.y);
    Ok(())
}

fn run_info() {
    println!("twolink v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("workspace crates (all at v{}):", env!("CARGO_PKG_VERSION"));
    for name in WORKSPACE_CRATES {
        println!("  {name}");
    }
    println!();
    println!("edition: 2024");
    println!();
    println!("default configuration:");
    match toml::to_string_pretty(&TwoLinkConfig::default()) {
        Ok(text) => print!("{text}"),
        Err(e) => warn!("twolink: cannot serialize default configuration: {e}"),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Run(args)) => run_tracking(&args).map(|s| print_summary(&s)),
        Some(Commands::Path { config }) => run_path(config.as_deref()),
        Some(Commands::Solve { x, y, config }) => run_solve(x, y, config.as_deref()),
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        // Default: run with defaults
        None => run_tracking(&RunArgs::default()).map(|s| print_summary(&s)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
