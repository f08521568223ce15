//! Command-line flags and the optional TOML configuration file.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use maze_trace_core::BoundaryOpenings;
use maze_trace_rendering::SurfacePresentation;
use maze_trace_world::MazeSettings;
use serde::Deserialize;

const DEFAULT_COLUMNS: u32 = 12;
const DEFAULT_ROWS: u32 = 12;
const DEFAULT_SIZE: f32 = 360.0;

/// Generate a maze and trace a path through it with the mouse.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// Number of cell columns
    #[arg(long)]
    pub(crate) columns: Option<u32>,

    /// Number of cell rows
    #[arg(long)]
    pub(crate) rows: Option<u32>,

    /// Width of the maze surface in pixels
    #[arg(long)]
    pub(crate) size: Option<f32>,

    /// Seed for maze generation; a random seed is used when omitted
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Outer wall policy for the start and goal cells
    #[arg(long, value_enum)]
    pub(crate) boundary: Option<BoundaryArg>,

    /// Path to a TOML file providing defaults for the options above
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Print the generated maze as text and exit
    #[arg(long)]
    pub(crate) ascii: bool,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    pub(crate) vsync: bool,
}

/// Outer wall policy accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum BoundaryArg {
    /// Keep every outer wall.
    Closed,
    /// Open the top of the start cell and the bottom of the goal cell.
    EntranceAndExit,
}

impl From<BoundaryArg> for BoundaryOpenings {
    fn from(value: BoundaryArg) -> Self {
        match value {
            BoundaryArg::Closed => BoundaryOpenings::Closed,
            BoundaryArg::EntranceAndExit => BoundaryOpenings::EntranceAndExit,
        }
    }
}

/// Values read from the configuration file. Every key is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) columns: Option<u32>,
    pub(crate) rows: Option<u32>,
    pub(crate) size: Option<f32>,
    pub(crate) seed: Option<u64>,
    pub(crate) boundary: Option<BoundaryOpenings>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Fully resolved launch parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LaunchSettings {
    pub(crate) maze: MazeSettings,
    pub(crate) size: f32,
}

impl LaunchSettings {
    /// Merges flags over file values over built-in defaults.
    pub(crate) fn resolve(args: &Args, file: &FileConfig) -> Result<Self> {
        let columns = args.columns.or(file.columns).unwrap_or(DEFAULT_COLUMNS);
        let rows = args.rows.or(file.rows).unwrap_or(DEFAULT_ROWS);
        let size = args.size.or(file.size).unwrap_or(DEFAULT_SIZE);
        if !size.is_finite() || size <= 0.0 {
            bail!("surface size must be a positive number of pixels (received {size})");
        }
        let openings = args
            .boundary
            .map(BoundaryOpenings::from)
            .or(file.boundary)
            .unwrap_or_default();

        let surface = SurfacePresentation::fitted_to_width(columns, rows, size)
            .context("invalid maze dimensions")?;

        Ok(Self {
            maze: MazeSettings {
                columns,
                rows,
                cell_length: surface.cell_length,
                openings,
                seed: args.seed.or(file.seed),
            },
            size,
        })
    }
}

/// Parses the optional config file named by `args` and resolves launch settings.
pub(crate) fn load(args: &Args) -> Result<LaunchSettings> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    LaunchSettings::resolve(args, &file)
}
