use maze_trace_core::{
    BoundaryOpenings, CellCoord, CellLayout, Command, Direction, Event, MazeEpoch, MazeError,
    PointerEvent, StrokePhase,
};
use maze_trace_world::{self as world, query, MazeSettings, World};

const CELL_LENGTH: f32 = 20.0;

fn settings(seed: u64) -> MazeSettings {
    MazeSettings {
        columns: 6,
        rows: 5,
        cell_length: CELL_LENGTH,
        openings: BoundaryOpenings::Closed,
        seed: Some(seed),
    }
}

fn center(cell: CellCoord) -> PointerEvent {
    let layout = CellLayout::new(CELL_LENGTH).expect("valid layout");
    PointerEvent::Move(layout.cell_center(cell))
}

fn press(cell: CellCoord) -> PointerEvent {
    let layout = CellLayout::new(CELL_LENGTH).expect("valid layout");
    PointerEvent::Down(layout.cell_center(cell))
}

/// Presses on the start cell and walks through every passage leading out of it.
fn trace_from_start(world: &mut World) -> Vec<Event> {
    let grid = query::grid(world).clone();
    let start = grid.start();
    let binding = query::pointer_binding(world);
    let mut events = Vec::new();

    world::apply(world, binding.command(press(start)), &mut events);
    if let Some(next) = grid.passages(start).next() {
        world::apply(world, binding.command(center(next)), &mut events);
    }
    events
}

#[test]
fn new_world_starts_with_a_fresh_trace() {
    let world = World::new(&settings(1)).expect("valid settings");

    assert_eq!(query::epoch(&world), MazeEpoch::new(0));
    assert_eq!(query::grid(&world).dimensions(), (6, 5));
    assert_eq!(query::tracer(&world).visited_count(), 1);
    assert_eq!(query::tracer(&world).phase(), StrokePhase::Idle);
    assert_eq!(query::openings(&world), BoundaryOpenings::Closed);
    assert!(query::strokes(&world).is_empty());
}

#[test]
fn world_creation_rejects_invalid_settings() {
    let empty = MazeSettings {
        columns: 0,
        ..settings(1)
    };
    assert_eq!(
        World::new(&empty).err(),
        Some(MazeError::InvalidDimension { columns: 0, rows: 5 })
    );

    let flat = MazeSettings {
        cell_length: 0.0,
        ..settings(1)
    };
    assert!(matches!(
        World::new(&flat).err(),
        Some(MazeError::InvalidCellLength { .. })
    ));

    let huge = MazeSettings {
        columns: u32::MAX,
        rows: u32::MAX,
        ..settings(1)
    };
    assert_eq!(
        World::new(&huge).err(),
        Some(MazeError::InvalidDimension {
            columns: u32::MAX,
            rows: u32::MAX,
        }),
        "oversized mazes are reported, not allocated",
    );
}

#[test]
fn regenerating_resets_the_trace_to_the_new_start_cell() {
    let mut world = World::new(&settings(2)).expect("valid settings");
    let traced = trace_from_start(&mut world);
    assert!(traced
        .iter()
        .any(|event| matches!(event, Event::TraceExtended { .. })));
    assert_eq!(query::tracer(&world).visited_count(), 2);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateMaze {
            columns: 9,
            rows: 4,
            cell_length: CELL_LENGTH,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::MazeGenerated {
                epoch: MazeEpoch::new(1),
                columns: 9,
                rows: 4,
            },
            Event::TraceReset {
                start: CellCoord::new(0, 0),
            },
        ]
    );
    let tracer = query::tracer(&world);
    assert_eq!(tracer.dimensions(), (9, 4));
    assert_eq!(tracer.visited_count(), 1);
    assert!(tracer.is_visited(CellCoord::new(0, 0)));
    assert_eq!(tracer.phase(), StrokePhase::Idle);
    assert!(query::strokes(&world).is_empty());
    assert_eq!(query::grid(&world).dimensions(), (9, 4));
}

#[test]
fn rejected_generation_keeps_the_active_maze() {
    let mut world = World::new(&settings(3)).expect("valid settings");
    let _ = trace_from_start(&mut world);
    let grid_before = query::grid(&world).clone();
    let visited_before = query::tracer(&world).visited_count();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateMaze {
            columns: 4,
            rows: 0,
            cell_length: CELL_LENGTH,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::GenerationRejected {
            columns: 4,
            rows: 0,
            reason: MazeError::InvalidDimension { columns: 4, rows: 0 },
        }]
    );
    assert_eq!(query::grid(&world), &grid_before);
    assert_eq!(query::epoch(&world), MazeEpoch::new(0));
    assert_eq!(query::tracer(&world).visited_count(), visited_before);
}

#[test]
fn input_bound_to_a_replaced_maze_is_dropped() {
    let mut world = World::new(&settings(4)).expect("valid settings");
    let stale = query::pointer_binding(&world);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::GenerateMaze {
            columns: 6,
            rows: 5,
            cell_length: CELL_LENGTH,
        },
        &mut events,
    );
    events.clear();

    world::apply(&mut world, stale.command(press(CellCoord::new(0, 0))), &mut events);
    assert!(events.is_empty(), "stale input must not reach the new maze");
    assert_eq!(query::tracer(&world).phase(), StrokePhase::Idle);

    let fresh = query::pointer_binding(&world);
    assert_ne!(fresh.epoch(), stale.epoch());
    world::apply(&mut world, fresh.command(press(CellCoord::new(0, 0))), &mut events);
    assert_eq!(
        events,
        vec![Event::StrokeStarted {
            cell: CellCoord::new(0, 0)
        }]
    );
}

#[test]
fn blocked_moves_never_touch_the_grid() {
    let mut world = World::new(&settings(5)).expect("valid settings");
    let grid = query::grid(&world).clone();
    let start = grid.start();
    let blocked = [Direction::East, Direction::South]
        .into_iter()
        .find(|direction| !grid.wall_open(start, *direction))
        .and_then(|direction| start.neighbor(direction, grid.columns(), grid.rows()));
    let Some(blocked) = blocked else {
        // Start cell has no closed interior wall to push against.
        return;
    };

    let binding = query::pointer_binding(&world);
    let mut events = Vec::new();
    world::apply(&mut world, binding.command(press(start)), &mut events);
    world::apply(&mut world, binding.command(center(blocked)), &mut events);

    assert!(matches!(events.last(), Some(Event::StrokeBlocked { .. })));
    assert_eq!(query::grid(&world), &grid);
    assert!(!query::tracer(&world).is_visited(blocked));
}
