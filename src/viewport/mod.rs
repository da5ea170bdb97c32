//! Zoom/pan state and the screen to model coordinate transform.
//!
//! The renderer draws the surface with `scale(zoom_factor)` about its center
//! followed by `translate(-pan)`. Pan is expressed in model (raster) pixels.

use crate::geometry::{ImageBounds, Point, SurfaceGeometry};
use thiserror::Error;

pub const MAX_ZOOM_STEP: u8 = 40;
pub const ZOOM_STEP_INCREMENT: f64 = 0.1;

const ZOOM_PERCENT_BASE: u16 = 100;
const ZOOM_PERCENT_PER_STEP: u16 = 10;
const MODEL_EDGE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("surface has no displayable area")]
    DegenerateSurface,
    #[error("pointer is outside the surface")]
    OutsideSurface,
}

pub type TransformResult<T> = std::result::Result<T, TransformError>;

pub fn zoom_factor(zoom_step: u8) -> f64 {
    1.0 + f64::from(zoom_step.min(MAX_ZOOM_STEP)) * ZOOM_STEP_INCREMENT
}

pub fn zoom_percent(zoom_step: u8) -> u16 {
    ZOOM_PERCENT_BASE + u16::from(zoom_step.min(MAX_ZOOM_STEP)) * ZOOM_PERCENT_PER_STEP
}

fn display_scale(surface: &SurfaceGeometry, intrinsic: ImageBounds) -> TransformResult<Point> {
    if surface.display.is_degenerate() || intrinsic.is_empty() {
        return Err(TransformError::DegenerateSurface);
    }
    Ok(Point::new(
        f64::from(intrinsic.width) / surface.display.width,
        f64::from(intrinsic.height) / surface.display.height,
    ))
}

fn clamp_half_open(value: f64, extent: u32) -> f64 {
    let max = (f64::from(extent) - MODEL_EDGE_EPSILON).max(0.0);
    value.clamp(0.0, max)
}

/// Maps a screen position to raster coordinates, clamped to `[0, w) x [0, h)`.
pub fn to_model(
    screen: Point,
    surface: &SurfaceGeometry,
    intrinsic: ImageBounds,
    zoom_step: u8,
    pan: Point,
) -> TransformResult<Point> {
    let scale = display_scale(surface, intrinsic)?;
    if !surface.contains(screen) {
        return Err(TransformError::OutsideSurface);
    }

    let unzoomed = Point::new(
        (screen.x - surface.origin.x) * scale.x,
        (screen.y - surface.origin.y) * scale.y,
    );
    let center = intrinsic.size().center();
    let factor = zoom_factor(zoom_step);
    let model = Point::new(
        center.x + (unzoomed.x - center.x) / factor + pan.x,
        center.y + (unzoomed.y - center.y) / factor + pan.y,
    );

    Ok(Point::new(
        clamp_half_open(model.x, intrinsic.width),
        clamp_half_open(model.y, intrinsic.height),
    ))
}

/// Inverse of [`to_model`] for points inside the image. Not clamped.
pub fn to_screen(
    model: Point,
    surface: &SurfaceGeometry,
    intrinsic: ImageBounds,
    zoom_step: u8,
    pan: Point,
) -> TransformResult<Point> {
    let scale = display_scale(surface, intrinsic)?;
    let center = intrinsic.size().center();
    let factor = zoom_factor(zoom_step);
    let unzoomed = Point::new(
        center.x + (model.x - pan.x - center.x) * factor,
        center.y + (model.y - pan.y - center.y) * factor,
    );
    Ok(Point::new(
        surface.origin.x + unzoomed.x / scale.x,
        surface.origin.y + unzoomed.y / scale.y,
    ))
}

/// Largest pan offset that keeps the zoomed view inside the image.
pub fn max_pan(intrinsic: ImageBounds, zoom_step: u8) -> Point {
    let factor = zoom_factor(zoom_step);
    let size = intrinsic.size();
    Point::new(
        size.width * (factor - 1.0) / (2.0 * factor),
        size.height * (factor - 1.0) / (2.0 * factor),
    )
}

pub fn clamp_pan(pan: Point, intrinsic: ImageBounds, zoom_step: u8) -> Point {
    let limit = max_pan(intrinsic, zoom_step);
    Point::new(
        pan.x.clamp(-limit.x, limit.x),
        pan.y.clamp(-limit.y, limit.y),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom_step: u8,
    pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub const fn new() -> Self {
        Self {
            zoom_step: 0,
            pan: Point::ORIGIN,
        }
    }

    pub const fn zoom_step(&self) -> u8 {
        self.zoom_step
    }

    pub const fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom_percent(&self) -> u16 {
        zoom_percent(self.zoom_step)
    }

    pub fn zoom_factor(&self) -> f64 {
        zoom_factor(self.zoom_step)
    }

    pub fn reset(&mut self) {
        self.zoom_step = 0;
        self.pan = Point::ORIGIN;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_step = self.zoom_step.saturating_add(1).min(MAX_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, bounds: ImageBounds) {
        self.set_zoom_step(self.zoom_step.saturating_sub(1), bounds);
    }

    pub fn set_zoom_step(&mut self, zoom_step: u8, bounds: ImageBounds) {
        self.zoom_step = zoom_step.min(MAX_ZOOM_STEP);
        if self.zoom_step == 0 {
            self.pan = Point::ORIGIN;
        } else {
            self.pan = clamp_pan(self.pan, bounds, self.zoom_step);
        }
    }

    pub fn set_pan(&mut self, pan: Point, bounds: ImageBounds) {
        self.pan = clamp_pan(pan, bounds, self.zoom_step);
    }

    /// Drag the view by a screen-space delta; content follows the pointer.
    pub fn pan_by_screen_delta(
        &mut self,
        delta_x: f64,
        delta_y: f64,
        surface: &SurfaceGeometry,
        bounds: ImageBounds,
    ) -> TransformResult<()> {
        let scale = display_scale(surface, bounds)?;
        let factor = self.zoom_factor();
        let pan = Point::new(
            self.pan.x - delta_x * scale.x / factor,
            self.pan.y - delta_y * scale.y / factor,
        );
        self.set_pan(pan, bounds);
        Ok(())
    }

    pub fn to_model(
        &self,
        screen: Point,
        surface: &SurfaceGeometry,
        bounds: ImageBounds,
    ) -> TransformResult<Point> {
        to_model(screen, surface, bounds, self.zoom_step, self.pan)
    }

    pub fn to_screen(
        &self,
        model: Point,
        surface: &SurfaceGeometry,
        bounds: ImageBounds,
    ) -> TransformResult<Point> {
        to_screen(model, surface, bounds, self.zoom_step, self.pan)
    }
}
