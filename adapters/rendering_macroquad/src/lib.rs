#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Trace.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use maze_trace_core::{PointerEvent, PointerPosition};
use maze_trace_rendering::{
    Color, FrameInput, MarkerPresentation, Presentation, RenderingBackend, Scene,
    SurfacePresentation, TracePresentation, WallPresentation,
};

const WINDOW_MARGIN: f32 = 24.0;

/// Converts polled mouse state into the pointer event stream a canvas would
/// deliver.
///
/// A press or release is reported only while the cursor is over the surface.
/// Leaving the surface is reported once, so a stroke dragged off the maze ends
/// there even if the button is released elsewhere.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    last_position: Option<Vec2>,
    inside: bool,
    button_down: bool,
}

impl PointerTracker {
    /// Records one frame of mouse state expressed in surface pixels.
    pub fn observe(
        &mut self,
        position: Vec2,
        button_down: bool,
        surface: &SurfacePresentation,
        events: &mut Vec<PointerEvent>,
    ) {
        let inside = surface.contains(position);
        let pointer = PointerPosition::new(position.x, position.y);

        if self.inside && !inside {
            events.push(PointerEvent::Leave);
        }

        if inside {
            if !self.inside || self.last_position != Some(position) {
                events.push(PointerEvent::Move(pointer));
            }
            if button_down && !self.button_down {
                events.push(PointerEvent::Down(pointer));
            }
            if !button_down && self.button_down {
                events.push(PointerEvent::Up);
            }
        }

        self.inside = inside;
        self.button_down = button_down;
        self.last_position = Some(position);
    }

    /// Reports whether the cursor was over the surface at the last observation.
    #[must_use]
    pub const fn is_inside(&self) -> bool {
        self.inside
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `R` or `Space` carves a new maze.
    regenerate: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let regenerate = is_key_pressed(KeyCode::R) || is_key_pressed(KeyCode::Space);

        Self {
            quit_requested,
            regenerate,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or present frames as soon as they are ready.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self { swap_interval } = self;
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (scene.surface.width() + WINDOW_MARGIN * 2.0).ceil() as i32,
            window_height: (scene.surface.height() + WINDOW_MARGIN * 2.0).ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut pointer = PointerTracker::default();
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics_before =
                    SceneMetrics::from_surface(&scene.surface, screen_width, screen_height);

                let (cursor_x, cursor_y) = mouse_position();
                let mut pointer_events = Vec::new();
                pointer.observe(
                    metrics_before.to_surface(Vec2::new(cursor_x, cursor_y)),
                    is_mouse_button_down(MouseButton::Left),
                    &scene.surface,
                    &mut pointer_events,
                );

                update_scene(
                    FrameInput {
                        pointer_events,
                        regenerate: keyboard.regenerate,
                    },
                    &mut scene,
                );

                let metrics =
                    SceneMetrics::from_surface(&scene.surface, screen_width, screen_height);
                macroquad::window::clear_background(background);
                draw_markers(&scene, &metrics);
                draw_walls(&scene.walls, &metrics);
                draw_trace(&scene.trace, &metrics);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps surface pixels onto the window, keeping the maze centred and uniformly scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_surface(surface: &SurfacePresentation, screen_width: f32, screen_height: f32) -> Self {
        let world_width = surface.width() + WINDOW_MARGIN * 2.0;
        let world_height = surface.height() + WINDOW_MARGIN * 2.0;
        let scale = if screen_width <= f32::EPSILON || screen_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let offset = Vec2::new(
            (screen_width - surface.width() * scale) * 0.5,
            (screen_height - surface.height() * scale) * 0.5,
        );

        Self { scale, offset }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    fn to_surface(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale
    }
}

fn draw_markers(scene: &Scene, metrics: &SceneMetrics) {
    let side = scene.surface.cell_length * metrics.scale;
    let font_size = (scene.label_size() * metrics.scale).max(1.0) as u16;

    for marker in &scene.markers {
        draw_marker(marker, scene.surface.cell_origin(marker.cell), side, font_size, metrics);
    }
}

fn draw_marker(
    marker: &MarkerPresentation,
    surface_origin: Vec2,
    side: f32,
    font_size: u16,
    metrics: &SceneMetrics,
) {
    let origin = metrics.to_screen(surface_origin);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        side,
        side,
        to_macroquad_color(marker.fill),
    );

    let mut buffer = [0_u8; 4];
    let label = marker.label.encode_utf8(&mut buffer);
    let dimensions = macroquad::text::measure_text(label, None, font_size, 1.0);
    let center = origin + Vec2::splat(side * 0.5);
    let _ = macroquad::text::draw_text(
        label,
        center.x - dimensions.width * 0.5,
        center.y + dimensions.height * 0.5,
        f32::from(font_size),
        to_macroquad_color(marker.label_color),
    );
}

fn draw_walls(walls: &WallPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(walls.color);
    let thickness = (walls.thickness * metrics.scale).max(1.0);

    for segment in &walls.segments {
        let from = metrics.to_screen(segment.from);
        let to = metrics.to_screen(segment.to);
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }
}

fn draw_trace(trace: &TracePresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(trace.color);
    let width = trace.width * metrics.scale;
    let radius = width * 0.5;

    for polyline in &trace.polylines {
        for pair in polyline.windows(2) {
            let from = metrics.to_screen(pair[0]);
            let to = metrics.to_screen(pair[1]);
            macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, width, color);
        }
        // Round caps and joins.
        for point in polyline {
            let center = metrics.to_screen(*point);
            macroquad::shapes::draw_circle(center.x, center.y, radius, color);
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
