//! Plain-text rendering of a maze for headless use.

use maze_trace_core::{CellCoord, Direction, Grid};

/// Draws `grid` with `+`, `--` and `|` characters, one text block per cell.
pub(crate) fn render(grid: &Grid) -> String {
    let (columns, rows) = grid.dimensions();
    let mut out = String::new();

    for row in 0..rows {
        for column in 0..columns {
            out.push('+');
            let closed = !grid.wall_open(CellCoord::new(column, row), Direction::North);
            out.push_str(if closed { "--" } else { "  " });
        }
        out.push_str("+\n");

        for column in 0..columns {
            let closed = !grid.wall_open(CellCoord::new(column, row), Direction::West);
            out.push(if closed { '|' } else { ' ' });
            out.push_str("  ");
        }
        let last = CellCoord::new(columns - 1, row);
        out.push(if grid.wall_open(last, Direction::East) {
            ' '
        } else {
            '|'
        });
        out.push('\n');
    }

    for column in 0..columns {
        out.push('+');
        let closed = !grid.wall_open(CellCoord::new(column, rows - 1), Direction::South);
        out.push_str(if closed { "--" } else { "  " });
    }
    out.push_str("+\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_trace_core::{BoundaryOpenings, GridBuilder};

    #[test]
    fn corridor_renders_with_entrance_and_exit() {
        let mut builder = GridBuilder::new(3, 1).expect("valid dimensions");
        assert!(builder.carve(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(builder.carve(CellCoord::new(1, 0), CellCoord::new(2, 0)));
        builder.apply_openings(BoundaryOpenings::EntranceAndExit);
        let grid = builder.finish();

        assert_eq!(render(&grid), "+  +--+--+\n|        |\n+--+--+  +\n");
    }

    #[test]
    fn closed_walls_between_rows_are_drawn() {
        let mut builder = GridBuilder::new(2, 2).expect("valid dimensions");
        assert!(builder.carve(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(builder.carve(CellCoord::new(1, 0), CellCoord::new(1, 1)));
        assert!(builder.carve(CellCoord::new(1, 1), CellCoord::new(0, 1)));
        let grid = builder.finish();

        assert_eq!(
            render(&grid),
            "+--+--+\n|     |\n+--+  +\n|     |\n+--+--+\n"
        );
    }
}
