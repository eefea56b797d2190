// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-render shared state.
//!
//! A [`RenderContext`] is created when a project is rendered and lives until
//! the render is disposed. It carries the two values every container and
//! transition routine reads: the canvas-to-viewport scale and whether an
//! interactive drag is in progress.

use kurbo::{Point, Size};

/// The fixed canvas resolution scenes are authored at.
pub const DEFAULT_CANVAS: Size = Size::new(1920.0, 1080.0);

/// Canvas scale and drag state for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    canvas: Size,
    viewport: Size,
    scale: f64,
    dragging: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::fit(DEFAULT_CANVAS, DEFAULT_CANVAS)
    }
}

impl RenderContext {
    /// Creates a context scaling `canvas` uniformly into `viewport`.
    #[must_use]
    pub fn fit(canvas: Size, viewport: Size) -> Self {
        Self {
            canvas,
            viewport,
            scale: fit_scale(canvas, viewport),
            dragging: false,
        }
    }

    /// Recomputes the scale for a new viewport.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scale = fit_scale(self.canvas, viewport);
    }

    /// Canvas resolution.
    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Size of the hosting surface.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Viewport pixels per canvas pixel.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Converts a viewport point (e.g. a pointer position) to canvas space.
    #[must_use]
    pub fn to_canvas(&self, point: Point) -> Point {
        Point::new(point.x / self.scale, point.y / self.scale)
    }

    /// Converts a canvas point to viewport space.
    #[must_use]
    pub fn to_viewport(&self, point: Point) -> Point {
        Point::new(point.x * self.scale, point.y * self.scale)
    }

    /// Returns `true` while an interactive drag is in progress. Ticks are
    /// deferred for the whole drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Sets the drag flag.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}

fn fit_scale(canvas: Size, viewport: Size) -> f64 {
    let scale = (viewport.width / canvas.width).min(viewport.height / canvas.height);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
