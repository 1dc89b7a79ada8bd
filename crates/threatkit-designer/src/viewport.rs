//! Camera state and screen/canvas projection.
//!
//! Screen coordinates are renderer pixels (0,0 at the top-left of the
//! canvas widget). Canvas coordinates are the diagram's own space. Both
//! axes point the same way, so the transform is a scale plus an offset:
//!
//! ```text
//! screen = canvas * zoom + pan
//! canvas = (screen - pan) / zoom
//! ```
//!
//! The renderer reports every camera move through
//! [`Viewport::camera_moved`]; the cached values are what a save persists.

use std::fmt;

use threatkit_core::constants::{MAX_ZOOM, MIN_ZOOM};

use crate::geometry::{Bounds, Point};
use crate::model::ViewportState;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a viewport at the canonical default camera.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        let default = ViewportState::default();
        Self {
            zoom: default.zoom,
            pan_x: default.x,
            pan_y: default.y,
            canvas_width,
            canvas_height,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the widget size (typically called when the window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Records a camera move reported by the renderer.
    pub fn camera_moved(&mut self, x: f64, y: f64, zoom: f64) {
        if x.is_finite() && y.is_finite() {
            self.set_pan(x, y);
        }
        self.set_zoom(zoom);
    }

    /// Projects a screen point into canvas space.
    pub fn screen_to_canvas(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.pan_x) / self.zoom,
            (screen_y - self.pan_y) / self.zoom,
        )
    }

    /// Projects a canvas point onto the screen.
    pub fn canvas_to_screen(&self, point: Point) -> (f64, f64) {
        (
            point.x * self.zoom + self.pan_x,
            point.y * self.zoom + self.pan_y,
        )
    }

    /// Zooms while keeping `canvas_point` fixed on screen.
    pub fn zoom_to_point(&mut self, canvas_point: Point, new_zoom: f64) {
        let (screen_x, screen_y) = self.canvas_to_screen(canvas_point);
        self.set_zoom(new_zoom);
        self.pan_x = screen_x - canvas_point.x * self.zoom;
        self.pan_y = screen_y - canvas_point.y * self.zoom;
    }

    /// Fits `bounds` into the widget, reserving `padding` (0.0 - 0.5) of
    /// each dimension as margin.
    pub fn fit_to_bounds(&mut self, bounds: Bounds, padding: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }

        let padding_factor = 1.0 - padding.clamp(0.0, 0.45) * 2.0;
        let zoom_x = self.canvas_width * padding_factor / bounds.width();
        let zoom_y = self.canvas_height * padding_factor / bounds.height();
        self.set_zoom(zoom_x.min(zoom_y));

        let center = bounds.center();
        self.pan_x = self.canvas_width / 2.0 - center.x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - center.y * self.zoom;
    }

    /// Camera values to persist.
    pub fn state(&self) -> ViewportState {
        ViewportState {
            x: self.pan_x,
            y: self.pan_y,
            zoom: self.zoom,
        }
    }

    /// Restores a persisted camera. Unusable values fall back to the
    /// canonical default.
    pub fn restore(&mut self, state: &ViewportState) {
        let usable = state.x.is_finite()
            && state.y.is_finite()
            && state.zoom.is_finite()
            && state.zoom > 0.0;
        if !usable {
            tracing::warn!(?state, "Ignoring unusable viewport, using default");
            self.reset();
            return;
        }
        self.pan_x = state.x;
        self.pan_y = state.y;
        self.set_zoom(state.zoom);
    }

    /// Resets the camera to `{x: 0, y: 0, zoom: 1}`.
    pub fn reset(&mut self) {
        let default = ViewportState::default();
        self.zoom = default.zoom;
        self.pan_x = default.x;
        self.pan_y = default.y;
    }

    pub fn is_default(&self) -> bool {
        self.state() == ViewportState::default()
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
