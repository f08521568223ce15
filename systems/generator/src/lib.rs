#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze generation.
//!
//! The generator walks the grid with an explicit stack, carving a passage to
//! a uniformly chosen unvisited neighbour at every step and backtracking when
//! a cell has none left. Every cell is discovered exactly once, so the carved
//! passages form a spanning tree: a perfect maze with a single route between
//! any two cells.

use maze_trace_core::{
    BoundaryOpenings, CellCoord, CellMask, Direction, Grid, GridBuilder, MazeError,
};
use rand::Rng;

/// Carves a maze using the default boundary policy.
///
/// This is shorthand for [`MazeGenerator::default`] followed by
/// [`MazeGenerator::generate`].
pub fn generate<R>(columns: u32, rows: u32, rng: &mut R) -> Result<Grid, MazeError>
where
    R: Rng + ?Sized,
{
    MazeGenerator::default().generate(columns, rows, rng)
}

/// Backtracking maze generator configured with a boundary opening policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MazeGenerator {
    openings: BoundaryOpenings,
}

impl MazeGenerator {
    /// Creates a generator that applies the provided boundary policy.
    #[must_use]
    pub const fn new(openings: BoundaryOpenings) -> Self {
        Self { openings }
    }

    /// Boundary policy applied after carving.
    #[must_use]
    pub const fn openings(&self) -> BoundaryOpenings {
        self.openings
    }

    /// Generates a perfect maze of the requested dimensions.
    ///
    /// `rng` is consulted only to pick among the unvisited neighbours of the
    /// current cell, so identical random streams yield identical grids.
    /// Fails with [`MazeError::InvalidDimension`] when either dimension is
    /// zero or the grid is too large to allocate; no partial grid is produced
    /// in that case.
    pub fn generate<R>(&self, columns: u32, rows: u32, rng: &mut R) -> Result<Grid, MazeError>
    where
        R: Rng + ?Sized,
    {
        let mut builder = GridBuilder::new(columns, rows)?;
        let mut visited = CellMask::new(columns, rows)?;
        let start = CellCoord::new(0, 0);
        let _ = visited.insert(start);

        let mut stack = vec![start];
        let mut candidates = Vec::with_capacity(Direction::ALL.len());

        while let Some(current) = stack.pop() {
            candidates.clear();
            candidates.extend(
                Direction::ALL
                    .into_iter()
                    .filter_map(|direction| current.neighbor(direction, columns, rows))
                    .filter(|neighbor| !visited.contains(*neighbor)),
            );

            if candidates.is_empty() {
                continue;
            }

            stack.push(current);
            let next = candidates[rng.gen_range(0..candidates.len())];
            let carved = builder.carve(current, next);
            debug_assert!(carved, "neighbours are always adjacent and in bounds");
            let _ = visited.insert(next);
            stack.push(next);
        }

        builder.apply_openings(self.openings);
        Ok(builder.finish())
    }
}
