//! TOML simulation settings loaded by the `run` command.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use maze_pursuit_core::{Direction, Position, Strategy};
use serde::Deserialize;

/// Simulation settings read from a TOML file. Every field is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) ticks: Option<u64>,
    pub(crate) seed: Option<u64>,
    pub(crate) target: TargetConfig,
    pub(crate) ghosts: Vec<GhostConfig>,
}

impl SimulationConfig {
    /// Reads and parses the config file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
        parse(&contents)
            .with_context(|| format!("failed to parse simulation config at {}", path.display()))
    }
}

/// How the target moves between ticks.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TargetConfig {
    pub(crate) motion: TargetMotion,
    pub(crate) moves: Vec<Move>,
}

/// Target movement policies.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum TargetMotion {
    /// The target never moves.
    #[default]
    Stationary,
    /// The target steps to a random open neighbor every tick.
    RandomWalk,
    /// The target replays the configured moves, one per tick.
    Script,
}

/// Single scripted target move.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    pub(crate) const fn direction(self) -> Direction {
        match self {
            Self::Up => Direction::UP,
            Self::Right => Direction::RIGHT,
            Self::Down => Direction::DOWN,
            Self::Left => Direction::LEFT,
        }
    }
}

/// Extra ghost spawned in addition to the maze's `G` markers.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct GhostConfig {
    x: u32,
    y: u32,
    #[serde(default)]
    pub(crate) strategy: Strategy,
}

impl GhostConfig {
    pub(crate) const fn cell(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

fn parse(contents: &str) -> Result<SimulationConfig, toml::de::Error> {
    toml::from_str(contents)
}
