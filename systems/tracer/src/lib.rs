#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall-constrained freehand path tracing over a generated maze.
//!
//! The tracer consumes pointer input expressed in surface pixels, resolves it
//! to grid cells through the renderer-supplied [`CellLayout`], and extends the
//! trace only through open walls. Cells touched by the trace stay visited for
//! the lifetime of the tracer; a new tracer is created whenever the maze is
//! replaced.

use maze_trace_core::{
    CellCoord, CellLayout, CellMask, Event, Grid, MazeError, PointerEvent, PointerPosition,
    Stroke, StrokePhase,
};
use tracing::{debug, warn};

/// Stateful pointer handler that maintains the traced path for one maze.
#[derive(Clone, Debug)]
pub struct PathTracer {
    layout: CellLayout,
    visited: CellMask,
    head: CellCoord,
    phase: StrokePhase,
    strokes: Vec<Stroke>,
}

impl PathTracer {
    /// Creates an idle tracer whose only visited cell is the grid's start.
    ///
    /// Fails when the visited set for `grid` cannot be allocated.
    pub fn new(grid: &Grid, layout: CellLayout) -> Result<Self, MazeError> {
        let (columns, rows) = grid.dimensions();
        let start = grid.start();
        let mut visited = CellMask::new(columns, rows)?;
        let _ = visited.insert(start);

        Ok(Self {
            layout,
            visited,
            head: start,
            phase: StrokePhase::Idle,
            strokes: Vec::new(),
        })
    }

    /// Consumes a single pointer event, appending resulting events to `out`.
    ///
    /// `grid` must be the maze this tracer was created for; input against a
    /// grid of different dimensions is discarded.
    pub fn handle(&mut self, grid: &Grid, event: PointerEvent, out: &mut Vec<Event>) {
        let (columns, rows) = self.dimensions();
        if grid.dimensions() != (columns, rows) {
            warn!(
                tracer_columns = columns,
                tracer_rows = rows,
                grid_columns = grid.columns(),
                grid_rows = grid.rows(),
                "pointer input discarded: grid does not match tracer"
            );
            return;
        }

        match event {
            PointerEvent::Down(position) => self.pointer_down(position, out),
            PointerEvent::Move(position) => self.pointer_move(grid, position, out),
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::Cancel => self.end_stroke(out),
        }
    }

    /// Current phase of the stroke state machine.
    #[must_use]
    pub const fn phase(&self) -> StrokePhase {
        self.phase
    }

    /// Most recent cell the trace reached.
    #[must_use]
    pub const fn head(&self) -> CellCoord {
        self.head
    }

    /// Pixel mapping used to resolve pointer positions.
    #[must_use]
    pub const fn layout(&self) -> CellLayout {
        self.layout
    }

    /// Provides the dimensions of the traced grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        self.visited.dimensions()
    }

    /// Reports whether the trace has touched `cell`.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.visited.contains(cell)
    }

    /// Number of cells touched by the trace.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.count()
    }

    /// Strokes drawn so far, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    fn resolve(&self, position: PointerPosition) -> Option<CellCoord> {
        let (columns, rows) = self.dimensions();
        self.layout.cell_at(position, columns, rows)
    }

    fn pointer_down(&mut self, position: PointerPosition, out: &mut Vec<Event>) {
        // A press without an intervening release still closes the open stroke.
        self.end_stroke(out);
        self.phase = StrokePhase::Pressed;

        let Some(cell) = self.resolve(position) else {
            return;
        };
        if self.visited.contains(cell) {
            self.begin_drawing(cell, out);
        }
    }

    fn pointer_move(&mut self, grid: &Grid, position: PointerPosition, out: &mut Vec<Event>) {
        let Some(cell) = self.resolve(position) else {
            return;
        };

        match self.phase {
            StrokePhase::Idle => return,
            StrokePhase::Pressed => {
                if self.visited.contains(cell) {
                    self.begin_drawing(cell, out);
                }
                return;
            }
            StrokePhase::Drawing => {}
        }

        if cell == self.head {
            return;
        }
        // Samples that skip cells are noise, not a break in the stroke.
        let Some(direction) = self.head.direction_to(cell) else {
            return;
        };

        if !grid.wall_open(self.head, direction) {
            debug!(from = ?self.head, ?direction, "stroke blocked by wall");
            self.phase = StrokePhase::Idle;
            out.push(Event::StrokeBlocked {
                from: self.head,
                direction,
            });
            return;
        }

        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(cell);
        }
        let _ = self.visited.insert(cell);
        out.push(Event::TraceExtended {
            from: self.head,
            to: cell,
        });
        self.head = cell;
    }

    fn begin_drawing(&mut self, cell: CellCoord, out: &mut Vec<Event>) {
        debug!(?cell, "stroke started");
        self.phase = StrokePhase::Drawing;
        self.head = cell;
        // Single-cell strokes draw nothing and are replaced.
        if self
            .strokes
            .last()
            .is_some_and(|stroke| stroke.cells().len() == 1)
        {
            let _ = self.strokes.pop();
        }
        self.strokes.push(Stroke::starting_at(cell));
        out.push(Event::StrokeStarted { cell });
    }

    fn end_stroke(&mut self, out: &mut Vec<Event>) {
        if self.phase == StrokePhase::Drawing {
            debug!(head = ?self.head, "stroke ended");
            out.push(Event::StrokeEnded { head: self.head });
        }
        self.phase = StrokePhase::Idle;
    }
}
