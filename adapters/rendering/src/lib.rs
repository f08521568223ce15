#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Trace adapters.
//!
//! Scenes are expressed in surface pixels: the top-left corner of the maze is
//! the origin and every cell spans [`SurfacePresentation::cell_length`]
//! pixels. Backends scale and offset the scene as they see fit but must report
//! pointer input back in these same surface pixels.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_trace_core::{CellCoord, Grid, PointerEvent, Stroke};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer events observed this frame, in surface pixels and arrival order.
    pub pointer_events: Vec<PointerEvent>,
    /// Whether the adapter detected a request to carve a new maze.
    pub regenerate: bool,
}

/// Geometry of the drawing surface that hosts the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePresentation {
    /// Number of cell columns drawn.
    pub columns: u32,
    /// Number of cell rows drawn.
    pub rows: u32,
    /// Side length of a single cell in pixels.
    pub cell_length: f32,
}

impl SurfacePresentation {
    /// Creates a new surface descriptor.
    ///
    /// Returns an error when the grid is empty or the cell length is not a
    /// finite positive number.
    pub fn new(columns: u32, rows: u32, cell_length: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::InvalidDimensions { columns, rows });
        }
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
        })
    }

    /// Creates a surface whose width spans `size` pixels.
    ///
    /// The cell length is `size / columns`, so tall grids extend below `size`.
    pub fn fitted_to_width(columns: u32, rows: u32, size: f32) -> Result<Self, RenderingError> {
        if columns == 0 {
            return Err(RenderingError::InvalidDimensions { columns, rows });
        }
        Self::new(columns, rows, size / columns as f32)
    }

    /// Total width of the surface in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the surface in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Top-left corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }

    /// Centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_length * 0.5)
    }

    /// Reports whether a surface position lies on the maze.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.width()
            && position.y < self.height()
    }
}

/// Straight wall piece between two surface positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// First endpoint in surface pixels.
    pub from: Vec2,
    /// Second endpoint in surface pixels.
    pub to: Vec2,
}

/// Collects one segment per closed wall of `grid`.
///
/// Every cell contributes its top and left walls; the last column adds its
/// right walls and the last row its bottom walls. Shared walls are therefore
/// emitted once.
#[must_use]
pub fn wall_segments(grid: &Grid, surface: &SurfacePresentation) -> Vec<WallSegment> {
    let length = surface.cell_length;
    let last_column = grid.columns().saturating_sub(1);
    let last_row = grid.rows().saturating_sub(1);
    let mut segments = Vec::new();

    for cell in grid.cells() {
        let walls = cell.walls();
        let coord = cell.coord();
        let top_left = surface.cell_origin(coord);
        let top_right = top_left + Vec2::new(length, 0.0);
        let bottom_left = top_left + Vec2::new(0.0, length);
        let bottom_right = top_left + Vec2::splat(length);

        if walls.top() {
            segments.push(WallSegment {
                from: top_left,
                to: top_right,
            });
        }
        if walls.left() {
            segments.push(WallSegment {
                from: bottom_left,
                to: top_left,
            });
        }
        if coord.column() == last_column && walls.right() {
            segments.push(WallSegment {
                from: top_right,
                to: bottom_right,
            });
        }
        if coord.row() == last_row && walls.bottom() {
            segments.push(WallSegment {
                from: bottom_right,
                to: bottom_left,
            });
        }
    }

    segments
}

/// Walls drawn over the maze surface.
#[derive(Clone, Debug, PartialEq)]
pub struct WallPresentation {
    /// Stroke width of the walls in pixels.
    pub thickness: f32,
    /// Color used for the walls.
    pub color: Color,
    /// Closed wall pieces.
    pub segments: Vec<WallSegment>,
}

/// Highlighted cell such as the start or the goal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPresentation {
    /// Cell filled by the marker.
    pub cell: CellCoord,
    /// Fill color of the cell.
    pub fill: Color,
    /// Single-character label centred in the cell.
    pub label: char,
    /// Color of the label.
    pub label_color: Color,
}

/// Freehand trace drawn over the maze.
#[derive(Clone, Debug, PartialEq)]
pub struct TracePresentation {
    /// Stroke width in pixels.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
    /// Polylines through cell centres; each holds at least two points.
    pub polylines: Vec<Vec<Vec2>>,
}

impl TracePresentation {
    /// Converts drawn strokes into surface polylines.
    #[must_use]
    pub fn from_strokes(strokes: &[Stroke], surface: &SurfacePresentation, color: Color) -> Self {
        let polylines = strokes
            .iter()
            .filter(|stroke| stroke.cells().len() > 1)
            .map(|stroke| {
                stroke
                    .cells()
                    .iter()
                    .map(|cell| surface.cell_center(*cell))
                    .collect()
            })
            .collect();

        Self {
            width: surface.cell_length * 0.5,
            color,
            polylines,
        }
    }
}

/// Palette and stroke widths applied when building scenes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    /// Color used to clear the surface.
    pub background: Color,
    /// Color of the maze walls.
    pub wall_color: Color,
    /// Stroke width of the maze walls in pixels.
    pub wall_thickness: f32,
    /// Fill of the start cell.
    pub start_color: Color,
    /// Fill of the goal cell.
    pub goal_color: Color,
    /// Color of the start and goal labels.
    pub label_color: Color,
    /// Color of the freehand trace.
    pub trace_color: Color,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0xff, 0xff, 0xff),
            wall_color: Color::from_rgb_u8(0x1f, 0x29, 0x37),
            wall_thickness: 2.0,
            start_color: Color::from_rgb_u8(0x22, 0xc5, 0x5e),
            goal_color: Color::from_rgb_u8(0xef, 0x44, 0x44),
            label_color: Color::from_rgb_u8(0xff, 0xff, 0xff),
            trace_color: Color::from_rgb_u8(0x3b, 0x82, 0xf6),
        }
    }
}

/// Scene description combining the surface, walls, markers and trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Surface geometry the scene is laid out on.
    pub surface: SurfacePresentation,
    /// Maze walls.
    pub walls: WallPresentation,
    /// Start and goal markers, drawn beneath the walls.
    pub markers: Vec<MarkerPresentation>,
    /// Freehand trace, drawn on top of everything else.
    pub trace: TracePresentation,
}

impl Scene {
    /// Builds a scene for `grid` with the provided strokes already drawn.
    #[must_use]
    pub fn from_maze(
        grid: &Grid,
        strokes: &[Stroke],
        surface: SurfacePresentation,
        style: &SceneStyle,
    ) -> Self {
        let markers = vec![
            MarkerPresentation {
                cell: grid.start(),
                fill: style.start_color,
                label: 'S',
                label_color: style.label_color,
            },
            MarkerPresentation {
                cell: grid.goal(),
                fill: style.goal_color,
                label: 'G',
                label_color: style.label_color,
            },
        ];

        Self {
            walls: WallPresentation {
                thickness: style.wall_thickness,
                color: style.wall_color,
                segments: wall_segments(grid, &surface),
            },
            markers,
            trace: TracePresentation::from_strokes(strokes, &surface, style.trace_color),
            surface,
        }
    }

    /// Replaces the trace layer, leaving walls and markers untouched.
    pub fn refresh_trace(&mut self, strokes: &[Stroke]) {
        self.trace = TracePresentation::from_strokes(strokes, &self.surface, self.trace.color);
    }

    /// Font size for marker labels.
    #[must_use]
    pub fn label_size(&self) -> f32 {
        self.surface.cell_length * 0.6
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Trace scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter for the frame and may replace or mutate the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Surfaces must hold at least one cell.
    #[error("surface must contain at least one cell (received {columns}x{rows})")]
    InvalidDimensions {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Cells must have a positive size to be drawn and hit-tested.
    #[error("cell length must be a positive number of pixels (received {cell_length})")]
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}
