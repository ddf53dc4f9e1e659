//! Footprint CLI - create, check and run foot probing scenes

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use footprint::config::{ConfigError, SceneConfig};
use footprint::game::{Scene, SceneError, TickReport, TracingDebugSink};

#[derive(Parser)]
#[command(name = "footprint")]
#[command(about = "Foot ground probing scene runner", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample scene.toml
    Init {
        /// Target file (default: scene.toml in the current directory)
        #[arg(default_value = "scene.toml")]
        path: PathBuf,
    },
    /// Load and validate a scene without running it
    Check {
        #[arg(default_value = "scene.toml")]
        path: PathBuf,
    },
    /// Walk the character through a scene and report foot offsets per tick
    Run {
        #[arg(default_value = "scene.toml")]
        path: PathBuf,
        /// Number of ticks (default: until the end of the path)
        #[arg(short, long, env = "FOOTPRINT_TICKS")]
        ticks: Option<u64>,
        /// Print one JSON object per tick instead of a table
        #[arg(long)]
        json: bool,
        /// Route debug draw calls to the log
        #[arg(long)]
        draw: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("failed to write {}: {}", .0.display(), .1)]
    Write(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    Serialize(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Init { path } => init_scene(&path),
        Commands::Check { path } => check_scene(&path),
        Commands::Run {
            path,
            ticks,
            json,
            draw,
        } => run_scene(&path, ticks, json, draw),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_scene(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }

    let sample = SceneConfig::sample();
    let text = sample
        .to_toml()
        .map_err(|e| CliError::Serialize(e.to_string()))?;
    let content = format!("# {} - Footprint scene\n{}", sample.name, text);
    std::fs::write(path, content).map_err(|e| CliError::Write(path.to_path_buf(), e))?;

    info!(path = %path.display(), "scene written");
    println!("Created {}", path.display());
    println!("Run it with: footprint run {}", path.display());
    Ok(())
}

fn check_scene(path: &Path) -> Result<(), CliError> {
    let config = SceneConfig::from_file(path)?;
    let fp = &config.footprint;

    println!("Scene: {}", config.name);
    println!(
        "  probing: {} (half-length {}, sockets {} / {})",
        if fp.enabled { "on" } else { "off" },
        fp.probe_half_length,
        fp.right_socket,
        fp.left_socket
    );
    println!(
        "  debug: text={} points={} lines={}",
        fp.debug.show_text, fp.debug.show_points, fp.debug.show_lines
    );
    println!("  ground boxes: {}", config.ground.len());
    println!("  sensor boxes: {}", config.sensors.len());
    println!(
        "  waypoints: {} (face travel: {})",
        config.path.waypoints.len(),
        config.path.face_travel
    );
    Ok(())
}

fn run_scene(path: &Path, ticks: Option<u64>, json: bool, draw: bool) -> Result<(), CliError> {
    let config = SceneConfig::from_file(path)?;
    let mut scene = Scene::from_config(&config);
    let ticks = ticks.unwrap_or_else(|| scene.path.total_ticks() + 1);

    let reports = if draw {
        scene.run(ticks, &mut TracingDebugSink)?
    } else {
        scene.run(ticks, &mut ())?
    };

    if json {
        for report in &reports {
            let line =
                serde_json::to_string(report).map_err(|e| CliError::Serialize(e.to_string()))?;
            println!("{}", line);
        }
    } else {
        print_table(&reports);
    }
    Ok(())
}

fn print_table(reports: &[TickReport]) {
    println!(
        "{:>5} {:>9} {:>9} {:>9} {:>3} {:>3} {:>9} {:>9} {:>9}",
        "tick", "x", "y", "z", "R", "L", "right_z", "left_z", "pelvis"
    );
    for r in reports {
        println!(
            "{:>5} {:>9.2} {:>9.2} {:>9.2} {:>3} {:>3} {:>9.3} {:>9.3} {:>9.3}",
            r.tick,
            r.position[0],
            r.position[1],
            r.position[2],
            if r.right_grounded { "Y" } else { "N" },
            if r.left_grounded { "Y" } else { "N" },
            r.foot_offset_right[2],
            r.foot_offset_left[2],
            r.pelvis,
        );
    }
}
