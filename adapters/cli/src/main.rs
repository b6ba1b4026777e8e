#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Pursuit simulations.

mod config;
mod layout_transfer;
mod maze_file;
mod simulation;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use maze_pursuit_core::Position;

use crate::{
    config::{SimulationConfig, TargetMotion},
    maze_file::{MazeLayout, DEFAULT_MAZE},
    simulation::{render_frame, Settings, Simulation, Summary, TickReport},
};

const DEFAULT_TICKS: u64 = 40;
const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Debug, Parser)]
#[command(name = "maze-pursuit", version, about = "Ghosts chasing a target through a maze")]
struct Cli {
    /// Minimum log level; `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Run the pursuit simulation and print every tick.
    Run(RunArgs),
    /// Print the maze in a shareable format.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct MazeSource {
    /// Path to a maze text file.
    #[arg(long, conflicts_with = "layout")]
    maze: Option<PathBuf>,
    /// Layout transfer string produced by `export`.
    #[arg(long)]
    layout: Option<String>,
}

impl MazeSource {
    fn load(&self) -> Result<MazeLayout> {
        if let Some(path) = &self.maze {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read maze file {}", path.display()))?;
            return MazeLayout::parse(&text)
                .with_context(|| format!("failed to parse maze file {}", path.display()));
        }

        if let Some(layout) = &self.layout {
            return layout_transfer::decode(layout).context("failed to decode layout string");
        }

        MazeLayout::parse(DEFAULT_MAZE).context("built-in maze is invalid")
    }
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    source: MazeSource,
    /// TOML file with simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,
    /// Seed for the random-walk target.
    #[arg(long)]
    seed: Option<u64>,
    /// How the target moves between ticks.
    #[arg(long, value_enum)]
    motion: Option<TargetMotion>,
    /// Draw the maze after every tick.
    #[arg(long)]
    render: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    source: MazeSource,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Transfer)]
    format: ExportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// Single-line `maze:v1` string.
    Transfer,
    /// Maze text file with spawn markers.
    Text,
}

/// Entry point for the Maze Pursuit command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    match cli.command {
        CliCommand::Run(args) => run(args),
        CliCommand::Export(args) => export(&args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let layout = args.source.load()?;
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let settings = Settings {
        ticks: args.ticks.or(config.ticks).unwrap_or(DEFAULT_TICKS),
        seed: args.seed.or(config.seed).unwrap_or(DEFAULT_SEED),
        motion: args.motion.unwrap_or(config.target.motion),
        moves: config.target.moves,
        extra_ghosts: config.ghosts,
    };

    let render = args.render;
    let summary = Simulation::new(layout, settings)?.run(|report| print_tick(report, render))?;
    print_summary(&summary);
    Ok(())
}

fn export(args: &ExportArgs) -> Result<()> {
    let layout = args.source.load()?;
    match args.format {
        ExportFormat::Transfer => {
            println!("{}", layout_transfer::encode(&layout)?);
        }
        ExportFormat::Text => println!("{}", layout.to_text()),
    }
    Ok(())
}

fn print_tick(report: &TickReport<'_>, render: bool) {
    let ghosts = report
        .ghosts
        .iter()
        .map(|ghost| format!("ghost {} {}", ghost.id.get(), cell(ghost.position)))
        .collect::<Vec<_>>()
        .join("  ");
    println!(
        "tick {:>4}  target {}  {ghosts}",
        report.tick,
        cell(report.target)
    );

    if render {
        println!("{}\n", render_frame(report.grid, report.target, &report.ghosts));
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "simulated {} tick(s) with {} ghost(s): {} move(s), {} blocked step(s)",
        summary.ticks, summary.ghosts, summary.moves, summary.blocked
    );
    match summary.first_contact {
        Some(tick) => println!("target caught on tick {tick}"),
        None => println!("target evaded capture"),
    }
}

fn cell(position: Position) -> String {
    format!("({},{})", position.x(), position.y())
}
