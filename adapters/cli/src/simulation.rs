//! Drives the world through a fixed number of ticks while moving the target.

use std::collections::VecDeque;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use maze_pursuit_core::{Command, Direction, Event, Grid, Position, Strategy};
use maze_pursuit_system_movement::Movement;
use maze_pursuit_world::{
    self as world,
    query::{self, GhostView},
    World,
};
use rand::seq::SliceRandom;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::{
    config::{GhostConfig, Move, TargetMotion},
    maze_file::MazeLayout,
};

const GHOST_GLYPH: char = 'G';
const TARGET_GLYPH: char = 'P';
const CONTACT_GLYPH: char = 'X';

/// Resolved run parameters after merging config file and command-line flags.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) ticks: u64,
    pub(crate) seed: u64,
    pub(crate) motion: TargetMotion,
    pub(crate) moves: Vec<Move>,
    pub(crate) extra_ghosts: Vec<GhostConfig>,
}

/// State observed after every processed tick.
#[derive(Debug)]
pub(crate) struct TickReport<'a> {
    pub(crate) tick: u64,
    pub(crate) target: Position,
    pub(crate) grid: &'a Grid,
    pub(crate) ghosts: GhostView,
}

/// Totals collected over a full run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) ghosts: usize,
    /// Earliest tick after which a ghost shared the target's cell.
    pub(crate) first_contact: Option<u64>,
    pub(crate) moves: u64,
    pub(crate) blocked: u64,
}

/// A configured world plus the policy that moves its target.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    driver: TargetDriver,
    ticks: u64,
}

impl Simulation {
    /// Installs the layout, places the target and spawns every ghost.
    pub(crate) fn new(layout: MazeLayout, settings: Settings) -> Result<Self> {
        let mut world = World::new();
        let mut events = Vec::new();

        world::apply(
            &mut world,
            Command::ConfigureMaze {
                grid: layout.grid,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlaceTarget {
                cell: layout.target,
            },
            &mut events,
        );

        let spawns = layout
            .ghosts
            .into_iter()
            .map(|cell| (cell, Strategy::Pursuit))
            .chain(
                settings
                    .extra_ghosts
                    .iter()
                    .map(|ghost| (ghost.cell(), ghost.strategy)),
            );
        for (cell, strategy) in spawns {
            world::apply(
                &mut world,
                Command::SpawnGhost { cell, strategy },
                &mut events,
            );
        }

        for event in &events {
            match event {
                Event::TargetRejected { cell, reason } => {
                    bail!("target cannot start at {cell:?}: {reason:?}")
                }
                Event::GhostRejected { cell, reason } => {
                    bail!("ghost cannot spawn at {cell:?}: {reason:?}")
                }
                _ => {}
            }
        }

        let mut movement = Movement::new();
        let mut ignored = Vec::new();
        movement.handle(
            &events,
            &query::ghost_view(&world),
            query::grid(&world),
            query::target(&world),
            &mut ignored,
        );

        let driver = TargetDriver::new(settings.motion, settings.seed, settings.moves);
        info!(
            "simulating {} ghost(s) for {} tick(s) with {:?} target",
            query::ghost_view(&world).len(),
            settings.ticks,
            settings.motion
        );

        Ok(Self {
            world,
            movement,
            driver,
            ticks: settings.ticks,
        })
    }

    /// Runs every tick, handing a report to `observer` after each one.
    pub(crate) fn run<F>(mut self, mut observer: F) -> Result<Summary>
    where
        F: FnMut(&TickReport<'_>),
    {
        let mut summary = Summary {
            ghosts: query::ghost_view(&self.world).len(),
            ..Summary::default()
        };
        let mut events = Vec::new();

        for _ in 0..self.ticks {
            events.clear();

            let grid = query::grid(&self.world).context("world lost its maze")?;
            let current = query::target(&self.world).context("world lost its target")?;
            let next = self.driver.next_cell(grid, current);
            if next != current {
                world::apply(&mut self.world, Command::PlaceTarget { cell: next }, &mut events);
            }

            world::apply(&mut self.world, Command::Tick, &mut events);

            let mut steps = Vec::new();
            self.movement.handle(
                &events,
                &query::ghost_view(&self.world),
                query::grid(&self.world),
                query::target(&self.world),
                &mut steps,
            );
            for step in steps {
                world::apply(&mut self.world, step, &mut events);
            }

            for event in &events {
                match event {
                    Event::GhostAdvanced { .. } => summary.moves += 1,
                    Event::GhostBlocked { .. } => summary.blocked += 1,
                    Event::TargetRejected { cell, reason } => {
                        warn!("target stayed put, {cell:?} rejected: {reason:?}");
                    }
                    _ => {}
                }
            }

            let report = TickReport {
                tick: query::tick_index(&self.world),
                target: query::target(&self.world).context("world lost its target")?,
                grid: query::grid(&self.world).context("world lost its maze")?,
                ghosts: query::ghost_view(&self.world),
            };
            summary.ticks = report.tick;
            if summary.first_contact.is_none()
                && report.ghosts.iter().any(|ghost| ghost.position == report.target)
            {
                debug!("first contact on tick {}", report.tick);
                summary.first_contact = Some(report.tick);
            }
            observer(&report);
        }

        Ok(summary)
    }
}

#[derive(Debug)]
enum TargetDriver {
    Stationary,
    RandomWalk(ChaCha8Rng),
    Script(VecDeque<Move>),
}

impl TargetDriver {
    fn new(motion: TargetMotion, seed: u64, moves: Vec<Move>) -> Self {
        match motion {
            TargetMotion::Stationary => Self::Stationary,
            TargetMotion::RandomWalk => Self::RandomWalk(ChaCha8Rng::seed_from_u64(seed)),
            TargetMotion::Script => Self::Script(moves.into()),
        }
    }

    fn next_cell(&mut self, grid: &Grid, current: Position) -> Position {
        match self {
            Self::Stationary => current,
            Self::RandomWalk(rng) => {
                let options: Vec<Position> = open_neighbors(grid, current).collect();
                options.choose(rng).copied().unwrap_or(current)
            }
            Self::Script(moves) => {
                let Some(step) = moves.pop_front() else {
                    return current;
                };
                match current
                    .offset(step.direction())
                    .filter(|cell| grid.is_open(*cell))
                {
                    Some(cell) => cell,
                    None => {
                        debug!("ignoring scripted move {step:?} from {current:?}");
                        current
                    }
                }
            }
        }
    }
}

fn open_neighbors(grid: &Grid, cell: Position) -> impl Iterator<Item = Position> + '_ {
    Direction::CARDINALS
        .into_iter()
        .filter_map(move |direction| cell.offset(direction))
        .filter(|neighbor| grid.is_open(*neighbor))
}

/// Draws the maze with ghosts as `G`, the target as `P` and contact as `X`.
pub(crate) fn render_frame(grid: &Grid, target: Position, ghosts: &GhostView) -> String {
    let mut rows: Vec<Vec<char>> = grid
        .to_rows()
        .into_iter()
        .map(|row| row.chars().collect())
        .collect();

    let mut paint = |cell: Position, glyph: char| {
        let (Ok(x), Ok(y)) = (usize::try_from(cell.x()), usize::try_from(cell.y())) else {
            return;
        };
        if let Some(slot) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = glyph;
        }
    };

    paint(target, TARGET_GLYPH);
    for ghost in ghosts.iter() {
        let glyph = if ghost.position == target {
            CONTACT_GLYPH
        } else {
            GHOST_GLYPH
        };
        paint(ghost.position, glyph);
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
