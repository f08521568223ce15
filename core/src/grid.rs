//! Immutable maze grid and the builder that carves it.

use crate::{
    allocate_cells, cell_index, BoundaryOpenings, CellCoord, Direction, MazeError, Walls,
};

/// Snapshot of a single cell and the walls around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    coord: CellCoord,
    walls: Walls,
}

impl Cell {
    /// Location of the cell inside its grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags surrounding the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }
}

/// Rectangular maze whose wall layout never changes once built.
///
/// Cells are stored row-major so that `(column, row)` addresses
/// `walls[row * columns + column]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    walls: Vec<Walls>,
}

impl Grid {
    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell where traces begin.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Cell diagonally opposite the start.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        CellCoord::new(
            self.columns.saturating_sub(1),
            self.rows.saturating_sub(1),
        )
    }

    /// Returns the cell at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<Cell> {
        let index = cell_index(self.columns, self.rows, coord)?;
        self.walls.get(index).map(|walls| Cell {
            coord,
            walls: *walls,
        })
    }

    /// Reports whether the wall of `coord` facing `direction` is absent.
    ///
    /// Cells outside the grid are treated as fully walled.
    #[must_use]
    pub fn wall_open(&self, coord: CellCoord, direction: Direction) -> bool {
        self.cell_at(coord)
            .is_some_and(|cell| cell.walls.is_open(direction))
    }

    /// Neighbouring cells reachable from `coord` through open walls.
    pub fn passages(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.wall_open(coord, *direction))
            .filter_map(move |direction| coord.neighbor(direction, self.columns, self.rows))
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let columns = self.columns.max(1);
        self.walls.iter().enumerate().map(move |(index, walls)| {
            let index = index as u64;
            let columns = u64::from(columns);
            Cell {
                coord: CellCoord::new((index % columns) as u32, (index / columns) as u32),
                walls: *walls,
            }
        })
    }
}

/// Mutable staging area used while a maze is being carved.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    columns: u32,
    rows: u32,
    walls: Vec<Walls>,
}

impl GridBuilder {
    /// Creates a builder whose cells have every wall present.
    ///
    /// Returns an error when either dimension is zero or the cell count cannot be indexed.
    pub fn new(columns: u32, rows: u32) -> Result<Self, MazeError> {
        if columns == 0 || rows == 0 {
            return Err(MazeError::InvalidDimension { columns, rows });
        }

        Ok(Self {
            columns,
            rows,
            walls: allocate_cells(columns, rows, Walls::closed())?,
        })
    }

    /// Clears the wall pair between two adjacent cells.
    ///
    /// Returns `false`, leaving every wall untouched, unless both cells are in
    /// bounds and exactly one step apart.
    pub fn carve(&mut self, from: CellCoord, to: CellCoord) -> bool {
        let Some(direction) = from.direction_to(to) else {
            return false;
        };
        let (Some(from_index), Some(to_index)) = (
            cell_index(self.columns, self.rows, from),
            cell_index(self.columns, self.rows, to),
        ) else {
            return false;
        };

        self.walls[from_index].open(direction);
        self.walls[to_index].open(direction.opposite());
        true
    }

    /// Clears a single outer wall of a boundary cell.
    ///
    /// Returns `false` when `direction` points at another cell of the grid or
    /// `cell` lies outside it; interior walls are only removed in pairs.
    pub fn open_boundary(&mut self, cell: CellCoord, direction: Direction) -> bool {
        if cell.neighbor(direction, self.columns, self.rows).is_some() {
            return false;
        }
        let Some(index) = cell_index(self.columns, self.rows, cell) else {
            return false;
        };

        self.walls[index].open(direction);
        true
    }

    /// Applies the entrance and exit policy to the start and goal cells.
    pub fn apply_openings(&mut self, openings: BoundaryOpenings) {
        match openings {
            BoundaryOpenings::Closed => {}
            BoundaryOpenings::EntranceAndExit => {
                let goal = CellCoord::new(self.columns - 1, self.rows - 1);
                let _ = self.open_boundary(CellCoord::new(0, 0), Direction::North);
                let _ = self.open_boundary(goal, Direction::South);
            }
        }
    }

    /// Freezes the carved walls into an immutable grid.
    #[must_use]
    pub fn finish(self) -> Grid {
        Grid {
            columns: self.columns,
            rows: self.rows,
            walls: self.walls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GridBuilder;
    use crate::{BoundaryOpenings, CellCoord, Direction, MazeError};

    #[test]
    fn builder_rejects_zero_dimensions() {
        for (columns, rows) in [(0, 4), (4, 0), (0, 0)] {
            let error = GridBuilder::new(columns, rows).expect_err("zero dimension must fail");
            assert_eq!(error, MazeError::InvalidDimension { columns, rows });
        }
    }

    #[test]
    fn builder_rejects_grids_too_large_to_allocate() {
        for (columns, rows) in [(u32::MAX, u32::MAX), (1 << 31, 1 << 31)] {
            let error = GridBuilder::new(columns, rows).expect_err("oversized grid must fail");
            assert_eq!(error, MazeError::InvalidDimension { columns, rows });
        }
    }

    #[test]
    fn carve_opens_both_sides_of_the_wall() {
        let mut builder = GridBuilder::new(2, 2).expect("valid dimensions");
        assert!(builder.carve(CellCoord::new(0, 1), CellCoord::new(1, 1)));
        let grid = builder.finish();

        assert!(grid.wall_open(CellCoord::new(0, 1), Direction::East));
        assert!(grid.wall_open(CellCoord::new(1, 1), Direction::West));
        assert!(!grid.wall_open(CellCoord::new(0, 0), Direction::East));
        assert!(!grid.wall_open(CellCoord::new(0, 1), Direction::North));
    }

    #[test]
    fn carve_refuses_non_adjacent_and_out_of_bounds_cells() {
        let mut builder = GridBuilder::new(3, 3).expect("valid dimensions");
        assert!(!builder.carve(CellCoord::new(0, 0), CellCoord::new(2, 0)));
        assert!(!builder.carve(CellCoord::new(0, 0), CellCoord::new(1, 1)));
        assert!(!builder.carve(CellCoord::new(2, 2), CellCoord::new(3, 2)));
        let grid = builder.finish();
        assert!(grid.cells().all(|cell| Direction::ALL
            .into_iter()
            .all(|direction| cell.walls().is_closed(direction))));
    }

    #[test]
    fn open_boundary_only_touches_outer_walls() {
        let mut builder = GridBuilder::new(2, 2).expect("valid dimensions");
        assert!(!builder.open_boundary(CellCoord::new(0, 0), Direction::East));
        assert!(builder.open_boundary(CellCoord::new(0, 0), Direction::West));
        let grid = builder.finish();
        assert!(grid.wall_open(CellCoord::new(0, 0), Direction::West));
        assert!(!grid.wall_open(CellCoord::new(0, 0), Direction::East));
    }

    #[test]
    fn entrance_and_exit_open_start_top_and_goal_bottom() {
        let mut builder = GridBuilder::new(3, 2).expect("valid dimensions");
        builder.apply_openings(BoundaryOpenings::EntranceAndExit);
        let grid = builder.finish();
        assert!(grid.cell_at(grid.start()).is_some_and(|cell| !cell.walls().top()));
        assert!(grid.cell_at(grid.goal()).is_some_and(|cell| !cell.walls().bottom()));
        assert_eq!(grid.goal(), CellCoord::new(2, 1));
    }

    #[test]
    fn passages_skip_boundary_openings() {
        let mut builder = GridBuilder::new(2, 1).expect("valid dimensions");
        builder.apply_openings(BoundaryOpenings::EntranceAndExit);
        assert!(builder.carve(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        let grid = builder.finish();
        let passages: Vec<_> = grid.passages(grid.start()).collect();
        assert_eq!(passages, vec![CellCoord::new(1, 0)]);
    }

    #[test]
    fn cells_iterate_in_row_major_order() {
        let grid = GridBuilder::new(3, 2).expect("valid dimensions").finish();
        let coords: Vec<_> = grid.cells().map(|cell| cell.coord()).collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], CellCoord::new(0, 0));
        assert_eq!(coords[2], CellCoord::new(2, 0));
        assert_eq!(coords[3], CellCoord::new(0, 1));
        assert!(grid.cell_at(CellCoord::new(3, 0)).is_none());
        assert!(!grid.wall_open(CellCoord::new(3, 0), Direction::West));
    }
}
