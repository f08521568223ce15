#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze session state for Maze Trace.
//!
//! A [`World`] owns the active [`Grid`], the [`PathTracer`] drawing over it and
//! the random stream used to carve new mazes. Replacing the maze swaps the
//! grid and the tracer together and advances the [`MazeEpoch`], so pointer
//! input captured against an older maze can never be evaluated against the
//! walls of a newer one.

use maze_trace_core::{
    BoundaryOpenings, CellLayout, Command, Event, Grid, MazeEpoch, MazeError, PointerEvent,
    WELCOME_BANNER,
};
use maze_trace_system_generator::MazeGenerator;
use maze_trace_system_tracer::PathTracer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

const DEFAULT_COLUMNS: u32 = 12;
const DEFAULT_ROWS: u32 = 12;
const DEFAULT_CELL_LENGTH: f32 = 30.0;

/// Parameters used to create a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeSettings {
    /// Number of cell columns in the initial maze.
    pub columns: u32,
    /// Number of cell rows in the initial maze.
    pub rows: u32,
    /// Pixels per cell used by the renderer.
    pub cell_length: f32,
    /// Outer wall policy applied to every generated maze.
    pub openings: BoundaryOpenings,
    /// Seed for the maze random stream; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            cell_length: DEFAULT_CELL_LENGTH,
            openings: BoundaryOpenings::default(),
            seed: None,
        }
    }
}

/// Represents the authoritative maze session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    generator: MazeGenerator,
    rng: ChaCha8Rng,
    grid: Grid,
    tracer: PathTracer,
    epoch: MazeEpoch,
}

impl World {
    /// Creates a world holding a freshly generated maze.
    ///
    /// Fails when the settings describe an empty grid or an invalid cell
    /// length; no world exists in that case.
    pub fn new(settings: &MazeSettings) -> Result<Self, MazeError> {
        let mut rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let generator = MazeGenerator::new(settings.openings);
        let (grid, tracer) = build_maze(
            &generator,
            &mut rng,
            settings.columns,
            settings.rows,
            settings.cell_length,
        )?;
        let epoch = MazeEpoch::new(0);
        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            epoch = epoch.get(),
            "maze generated"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            generator,
            rng,
            grid,
            tracer,
            epoch,
        })
    }
}

fn build_maze(
    generator: &MazeGenerator,
    rng: &mut ChaCha8Rng,
    columns: u32,
    rows: u32,
    cell_length: f32,
) -> Result<(Grid, PathTracer), MazeError> {
    let layout = CellLayout::new(cell_length)?;
    let grid = generator.generate(columns, rows, rng)?;
    let tracer = PathTracer::new(&grid, layout)?;
    Ok((grid, tracer))
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateMaze {
            columns,
            rows,
            cell_length,
        } => match build_maze(&world.generator, &mut world.rng, columns, rows, cell_length) {
            Ok((grid, tracer)) => {
                world.grid = grid;
                world.tracer = tracer;
                world.epoch = world.epoch.next();
                info!(columns, rows, epoch = world.epoch.get(), "maze generated");
                out_events.push(Event::MazeGenerated {
                    epoch: world.epoch,
                    columns,
                    rows,
                });
                out_events.push(Event::TraceReset {
                    start: world.grid.start(),
                });
            }
            Err(reason) => {
                warn!(columns, rows, %reason, "maze generation rejected");
                out_events.push(Event::GenerationRejected {
                    columns,
                    rows,
                    reason,
                });
            }
        },
        Command::Pointer { epoch, event } => {
            if epoch != world.epoch {
                debug!(
                    bound = epoch.get(),
                    active = world.epoch.get(),
                    "dropping pointer input bound to a replaced maze"
                );
                return;
            }
            world.tracer.handle(&world.grid, event, out_events);
        }
    }
}

/// Pointer input channel tied to the maze that was active when it was bound.
///
/// Adapters bind once per frame and route every pointer event through the
/// binding. Once the maze is replaced the binding goes stale and the world
/// discards whatever it still carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerBinding {
    epoch: MazeEpoch,
}

impl PointerBinding {
    /// Maze instance the binding routes input to.
    #[must_use]
    pub const fn epoch(&self) -> MazeEpoch {
        self.epoch
    }

    /// Wraps a pointer event into a command addressed to the bound maze.
    #[must_use]
    pub const fn command(&self, event: PointerEvent) -> Command {
        Command::Pointer {
            epoch: self.epoch,
            event,
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{PointerBinding, World};
    use maze_trace_core::{BoundaryOpenings, Grid, MazeEpoch, Stroke};
    use maze_trace_system_tracer::PathTracer;

    /// Retrieves the banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the active maze.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the tracer drawing over the active maze.
    #[must_use]
    pub fn tracer(world: &World) -> &PathTracer {
        &world.tracer
    }

    /// Strokes drawn over the active maze, oldest first.
    #[must_use]
    pub fn strokes(world: &World) -> &[Stroke] {
        world.tracer.strokes()
    }

    /// Identifies the active maze instance.
    #[must_use]
    pub fn epoch(world: &World) -> MazeEpoch {
        world.epoch
    }

    /// Outer wall policy applied to generated mazes.
    #[must_use]
    pub fn openings(world: &World) -> BoundaryOpenings {
        world.generator.openings()
    }

    /// Binds pointer input to the active maze.
    #[must_use]
    pub fn pointer_binding(world: &World) -> PointerBinding {
        PointerBinding { epoch: world.epoch }
    }
}
