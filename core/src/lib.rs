#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Trace engine.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative world, and the generator and tracer systems.
//! Adapters submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what changed. A generated [`Grid`] is immutable:
//! walls can only be cleared through a [`GridBuilder`] before it is finished.

mod grid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{Cell, Grid, GridBuilder};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Maze Playground";

/// Cardinal directions used for movement and wall addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in `direction` when it lies inside a
    /// grid of the provided dimensions.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (self.column, self.row.checked_sub(1)?),
            Direction::East => (self.column.checked_add(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::West => (self.column.checked_sub(1)?, self.row),
        };

        if column < columns && row < rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }

    /// Direction of a single orthogonal step from `self` to `other`.
    ///
    /// Returns `None` unless the two cells are exactly one step apart.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        if self.manhattan_distance(other) != 1 {
            return None;
        }

        if other.row < self.row {
            Some(Direction::North)
        } else if other.column > self.column {
            Some(Direction::East)
        } else if other.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::West)
        }
    }
}

/// Wall flags surrounding a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl Walls {
    /// Walls with every side present.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }

    /// Whether the wall toward decreasing rows is present.
    #[must_use]
    pub const fn top(&self) -> bool {
        self.top
    }

    /// Whether the wall toward increasing columns is present.
    #[must_use]
    pub const fn right(&self) -> bool {
        self.right
    }

    /// Whether the wall toward increasing rows is present.
    #[must_use]
    pub const fn bottom(&self) -> bool {
        self.bottom
    }

    /// Whether the wall toward decreasing columns is present.
    #[must_use]
    pub const fn left(&self) -> bool {
        self.left
    }

    /// Whether the wall facing `direction` is present.
    #[must_use]
    pub const fn is_closed(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.top,
            Direction::East => self.right,
            Direction::South => self.bottom,
            Direction::West => self.left,
        }
    }

    /// Whether the wall facing `direction` has been removed.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        !self.is_closed(direction)
    }

    pub(crate) fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.top = false,
            Direction::East => self.right = false,
            Direction::South => self.bottom = false,
            Direction::West => self.left = false,
        }
    }
}

/// Dense boolean matrix covering every cell of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMask {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl CellMask {
    /// Creates a mask of the provided dimensions with every cell cleared.
    ///
    /// Fails with [`MazeError::InvalidDimension`] when the mask cannot be
    /// allocated.
    pub fn new(columns: u32, rows: u32) -> Result<Self, MazeError> {
        Ok(Self {
            columns,
            rows,
            cells: allocate_cells(columns, rows, false)?,
        })
    }

    /// Reports whether the cell is set. Cells outside the mask are never set.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Sets the cell, returning `true` when it was not previously set.
    pub fn insert(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        let inserted = !*slot;
        *slot = true;
        inserted
    }

    /// Number of cells currently set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|set| **set).count()
    }

    /// Provides the dimensions of the mask as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell_index(self.columns, self.rows, cell)
    }
}

pub(crate) fn cell_count(columns: u32, rows: u32) -> Option<usize> {
    usize::try_from(columns)
        .ok()?
        .checked_mul(usize::try_from(rows).ok()?)
}

/// Allocates one slot per cell without aborting on oversized grids.
pub(crate) fn allocate_cells<T: Clone>(
    columns: u32,
    rows: u32,
    value: T,
) -> Result<Vec<T>, MazeError> {
    let invalid = MazeError::InvalidDimension { columns, rows };
    let len = cell_count(columns, rows).ok_or(invalid)?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).map_err(|_| invalid)?;
    cells.resize(len, value);
    Ok(cells)
}

pub(crate) fn cell_index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}

/// Position on the drawing surface measured in pixels from its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

impl PointerPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Mapping between surface pixels and grid cells.
///
/// The cell length is supplied by the rendering adapter so that pointer
/// coordinates resolve to exactly the cells that are drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellLayout {
    cell_length: f32,
}

impl CellLayout {
    /// Creates a layout with the provided pixels-per-cell value.
    ///
    /// Returns an error unless `cell_length` is finite and positive.
    pub fn new(cell_length: f32) -> Result<Self, MazeError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(MazeError::InvalidCellLength { cell_length });
        }

        Ok(Self { cell_length })
    }

    /// Side length of a single cell in pixels.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Resolves the cell beneath a pixel position.
    ///
    /// Returns `None` when the position lies outside a grid of the provided
    /// dimensions or is not a finite number.
    #[must_use]
    pub fn cell_at(&self, position: PointerPosition, columns: u32, rows: u32) -> Option<CellCoord> {
        let column = axis_index(position.x, self.cell_length, columns)?;
        let row = axis_index(position.y, self.cell_length, rows)?;
        Some(CellCoord::new(column, row))
    }

    /// Pixel position of the centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> PointerPosition {
        PointerPosition::new(
            (cell.column() as f32 + 0.5) * self.cell_length,
            (cell.row() as f32 + 0.5) * self.cell_length,
        )
    }
}

fn axis_index(pixels: f32, cell_length: f32, cells: u32) -> Option<u32> {
    if !pixels.is_finite() || pixels < 0.0 {
        return None;
    }

    let index = (pixels / cell_length).floor();
    if index >= cells as f32 {
        return None;
    }

    Some(index as u32)
}

/// Pointer input forwarded by the rendering adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed at the provided surface position.
    Down(PointerPosition),
    /// The pointer moved to the provided surface position.
    Move(PointerPosition),
    /// The pointer was released.
    Up,
    /// The pointer left the drawing surface.
    Leave,
    /// The platform cancelled the pointer interaction.
    Cancel,
}

/// Phase of the path tracer's stroke state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrokePhase {
    /// No pointer is held.
    Idle,
    /// The pointer is held but has not touched a legal starting cell.
    Pressed,
    /// The pointer is held and extends the trace from its head cell.
    Drawing,
}

/// One continuous drawn polyline expressed as the cells it passes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stroke {
    cells: Vec<CellCoord>,
}

impl Stroke {
    /// Starts a stroke anchored at `cell`.
    #[must_use]
    pub fn starting_at(cell: CellCoord) -> Self {
        Self { cells: vec![cell] }
    }

    /// Appends a cell to the end of the stroke.
    pub fn push(&mut self, cell: CellCoord) {
        self.cells.push(cell);
    }

    /// Cells visited by the stroke in drawing order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Iterator over the consecutive cell pairs that form visible segments.
    pub fn segments(&self) -> impl Iterator<Item = (CellCoord, CellCoord)> + '_ {
        self.cells.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Policy applied to the outer walls of the start and goal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryOpenings {
    /// Every outer wall stays intact.
    Closed,
    /// The start cell loses its top wall and the goal cell its bottom wall.
    #[default]
    EntranceAndExit,
}

/// Monotonic counter identifying which maze instance is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MazeEpoch(u64);

impl MazeEpoch {
    /// Creates a new epoch with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the epoch.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Epoch that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active maze with a freshly generated one.
    GenerateMaze {
        /// Number of cell columns in the new maze.
        columns: u32,
        /// Number of cell rows in the new maze.
        rows: u32,
        /// Pixels per cell used by the renderer for the new maze.
        cell_length: f32,
    },
    /// Forwards pointer input bound to a specific maze instance.
    Pointer {
        /// Maze instance the input was captured against.
        epoch: MazeEpoch,
        /// Pointer input in surface pixels.
        event: PointerEvent,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new maze replaced the previous one.
    MazeGenerated {
        /// Epoch assigned to the new maze.
        epoch: MazeEpoch,
        /// Number of cell columns in the maze.
        columns: u32,
        /// Number of cell rows in the maze.
        rows: u32,
    },
    /// Reports that a generation request was refused; the previous maze stays active.
    GenerationRejected {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
        /// Specific reason the request failed.
        reason: MazeError,
    },
    /// Confirms that the trace was cleared down to its start cell.
    TraceReset {
        /// Cell from which the new trace may begin.
        start: CellCoord,
    },
    /// Confirms that a stroke began drawing from a visited cell.
    StrokeStarted {
        /// Cell that became the trace head.
        cell: CellCoord,
    },
    /// Confirms that the trace moved through an open wall.
    TraceExtended {
        /// Previous trace head.
        from: CellCoord,
        /// New trace head.
        to: CellCoord,
    },
    /// Reports that a move hit a closed wall and the stroke stopped.
    StrokeBlocked {
        /// Trace head at the time of the attempt.
        from: CellCoord,
        /// Direction of the refused step.
        direction: Direction,
    },
    /// Confirms that an active stroke ended without erasing the trace.
    StrokeEnded {
        /// Trace head when the stroke ended.
        head: CellCoord,
    },
}

/// Errors raised while building mazes or their layouts.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MazeError {
    /// Grid dimensions must be positive and addressable.
    #[error("maze dimensions must be positive (received {columns}x{rows})")]
    InvalidDimension {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Cell length must be a finite positive pixel count.
    #[error("cell length must be a positive number of pixels (received {cell_length})")]
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        BoundaryOpenings, CellCoord, CellLayout, CellMask, Direction, MazeError, PointerPosition,
        Stroke,
    };

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 3, 3), None);
        assert_eq!(corner.neighbor(Direction::West, 3, 3), None);
        assert_eq!(
            corner.neighbor(Direction::East, 3, 3),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            CellCoord::new(2, 2).neighbor(Direction::South, 3, 3),
            None,
            "last row has no southern neighbour"
        );
    }

    #[test]
    fn direction_to_only_accepts_single_steps() {
        let head = CellCoord::new(2, 2);
        assert_eq!(head.direction_to(CellCoord::new(2, 1)), Some(Direction::North));
        assert_eq!(head.direction_to(CellCoord::new(3, 2)), Some(Direction::East));
        assert_eq!(head.direction_to(CellCoord::new(2, 3)), Some(Direction::South));
        assert_eq!(head.direction_to(CellCoord::new(1, 2)), Some(Direction::West));
        assert_eq!(head.direction_to(head), None);
        assert_eq!(head.direction_to(CellCoord::new(3, 3)), None);
        assert_eq!(head.direction_to(CellCoord::new(4, 2)), None);
    }

    #[test]
    fn opposite_directions_pair_up() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn cell_mask_insert_reports_new_cells_only() {
        let mut mask = CellMask::new(2, 2).expect("small mask fits");
        assert!(mask.insert(CellCoord::new(1, 1)));
        assert!(!mask.insert(CellCoord::new(1, 1)));
        assert!(!mask.insert(CellCoord::new(2, 0)), "out-of-bounds insert is refused");
        assert!(mask.contains(CellCoord::new(1, 1)));
        assert!(!mask.contains(CellCoord::new(0, 1)));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn oversized_masks_are_rejected_instead_of_aborting() {
        assert_eq!(
            CellMask::new(u32::MAX, u32::MAX),
            Err(MazeError::InvalidDimension {
                columns: u32::MAX,
                rows: u32::MAX,
            })
        );
    }

    #[test]
    fn layout_rejects_degenerate_cell_lengths() {
        for cell_length in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let error = CellLayout::new(cell_length).expect_err("cell length must be rejected");
            assert!(matches!(error, MazeError::InvalidCellLength { .. }));
        }
    }

    #[test]
    fn layout_floors_pixels_into_cells() {
        let layout = CellLayout::new(30.0).expect("valid layout");
        assert_eq!(
            layout.cell_at(PointerPosition::new(0.0, 0.0), 12, 12),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            layout.cell_at(PointerPosition::new(59.9, 30.0), 12, 12),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(
            layout.cell_at(PointerPosition::new(359.9, 359.9), 12, 12),
            Some(CellCoord::new(11, 11))
        );
    }

    #[test]
    fn layout_ignores_positions_outside_the_grid() {
        let layout = CellLayout::new(30.0).expect("valid layout");
        assert_eq!(layout.cell_at(PointerPosition::new(-0.1, 5.0), 12, 12), None);
        assert_eq!(layout.cell_at(PointerPosition::new(5.0, 360.0), 12, 12), None);
        assert_eq!(layout.cell_at(PointerPosition::new(f32::NAN, 5.0), 12, 12), None);
    }

    #[test]
    fn layout_centers_cells() {
        let layout = CellLayout::new(20.0).expect("valid layout");
        assert_eq!(
            layout.cell_center(CellCoord::new(2, 0)),
            PointerPosition::new(50.0, 10.0)
        );
    }

    #[test]
    fn stroke_segments_pair_consecutive_cells() {
        let mut stroke = Stroke::starting_at(CellCoord::new(0, 0));
        assert_eq!(stroke.segments().count(), 0);
        stroke.push(CellCoord::new(1, 0));
        stroke.push(CellCoord::new(1, 1));
        let segments: Vec<_> = stroke.segments().collect();
        assert_eq!(
            segments,
            vec![
                (CellCoord::new(0, 0), CellCoord::new(1, 0)),
                (CellCoord::new(1, 0), CellCoord::new(1, 1)),
            ]
        );
    }

    #[derive(serde::Deserialize)]
    struct BoundaryConfig {
        boundary: BoundaryOpenings,
    }

    #[test]
    fn boundary_openings_parse_from_kebab_case() {
        let closed: BoundaryConfig = toml::from_str("boundary = \"closed\"").expect("parses");
        assert_eq!(closed.boundary, BoundaryOpenings::Closed);
        let open: BoundaryConfig =
            toml::from_str("boundary = \"entrance-and-exit\"").expect("parses");
        assert_eq!(open.boundary, BoundaryOpenings::EntranceAndExit);
        assert_eq!(BoundaryOpenings::default(), BoundaryOpenings::EntranceAndExit);
    }
}
