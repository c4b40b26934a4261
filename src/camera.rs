//! Canvas camera: pan and a bounded zoom about the canvas center.
//!
//! World to screen: `screen = center + zoom * (world - center + pan)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest allowed zoom.
pub const MAX_ZOOM: f32 = 1.3;
/// Zoom change per control-panel button press.
pub const ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in world units.
    pub pan: Vec2,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped into `[MIN_ZOOM, MAX_ZOOM]`. Returns the result.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        self.zoom
    }

    /// Multiply the zoom by `factor` (wheel input).
    pub fn zoom_by(&mut self, factor: f32) -> f32 {
        self.set_zoom(self.zoom * factor)
    }

    /// Zoom in by one button step.
    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Zoom out by one button step.
    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.pan += screen_delta / self.zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn world_to_screen(&self, world: Vec2, extents: Vec2) -> Vec2 {
        let center = extents * 0.5;
        center + (world - center + self.pan) * self.zoom
    }

    pub fn screen_to_world(&self, screen: Vec2, extents: Vec2) -> Vec2 {
        let center = extents * 0.5;
        (screen - center) / self.zoom + center - self.pan
    }

    /// Length in screen pixels of a world-space length.
    pub fn scale(&self, world_len: f32) -> f32 {
        world_len * self.zoom
    }
}
