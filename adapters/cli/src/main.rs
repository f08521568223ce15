#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Trace experience.

mod ascii;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use maze_trace_core::{Command, Event};
use maze_trace_rendering::{
    FrameInput, Presentation, RenderingBackend, Scene, SceneStyle, SurfacePresentation,
};
use maze_trace_rendering_macroquad::MacroquadBackend;
use maze_trace_world::{self as world, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, LaunchSettings};

/// Entry point for the Maze Trace command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = config::load(&args)?;
    let world = World::new(&settings.maze).context("failed to generate the initial maze")?;

    if args.ascii {
        print!("{}", ascii::render(query::grid(&world)));
        return Ok(());
    }

    let style = SceneStyle::default();
    let scene = build_scene(&world, &style)?;
    info!(
        width = scene.surface.width(),
        height = scene.surface.height(),
        size = settings.size,
        "opening maze window"
    );
    let presentation = Presentation::new(query::welcome_banner(&world), style.background, scene);

    let mut session = Session::new(world, settings, style);
    MacroquadBackend::default()
        .with_vsync(args.vsync)
        .run(presentation, move |input, scene| {
            session.advance(input, scene);
        })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_scene(world: &World, style: &SceneStyle) -> Result<Scene> {
    let grid = query::grid(world);
    let cell_length = query::tracer(world).layout().cell_length();
    let surface = SurfacePresentation::new(grid.columns(), grid.rows(), cell_length)
        .context("invalid maze surface")?;
    Ok(Scene::from_maze(grid, query::strokes(world), surface, style))
}

/// Interactive loop state shared between frames.
#[derive(Debug)]
struct Session {
    world: World,
    settings: LaunchSettings,
    style: SceneStyle,
    events: Vec<Event>,
}

impl Session {
    fn new(world: World, settings: LaunchSettings, style: SceneStyle) -> Self {
        Self {
            world,
            settings,
            style,
            events: Vec::new(),
        }
    }

    /// Applies one frame of input and brings `scene` up to date with the world.
    ///
    /// Pointer input is bound to the maze that was on screen when the frame
    /// started, so a regeneration requested in the same frame strands it.
    fn advance(&mut self, input: FrameInput, scene: &mut Scene) {
        let binding = query::pointer_binding(&self.world);
        self.events.clear();

        if input.regenerate {
            let maze = self.settings.maze;
            world::apply(
                &mut self.world,
                Command::GenerateMaze {
                    columns: maze.columns,
                    rows: maze.rows,
                    cell_length: maze.cell_length,
                },
                &mut self.events,
            );
        }

        for event in input.pointer_events {
            world::apply(&mut self.world, binding.command(event), &mut self.events);
        }

        let regenerated = self
            .events
            .iter()
            .any(|event| matches!(event, Event::MazeGenerated { .. }));
        let traced = self
            .events
            .iter()
            .any(|event| matches!(event, Event::TraceExtended { .. }));

        if regenerated {
            let grid = query::grid(&self.world);
            let strokes = query::strokes(&self.world);
            *scene = Scene::from_maze(grid, strokes, scene.surface, &self.style);
        } else if traced {
            scene.refresh_trace(query::strokes(&self.world));
        }
    }
}
