//! The persistent mask layer and the stroke/backup bookkeeping around it.

pub mod brush;

use crate::geometry::{Color, ImageBounds, Point};
use image::{GrayImage, Luma, Rgba, RgbaImage};

pub use brush::{
    stamp_line, stamp_point, BrushOptions, BRUSH_RADIUS_DEFAULT, BRUSH_RADIUS_MAX,
    BRUSH_RADIUS_MIN, BRUSH_RADIUS_STEP,
};

/// Alpha written by the brush; roughly 30% coverage on the overlay.
pub const MASK_MARKER_ALPHA: u8 = 77;
pub const MASK_OVERLAY_COLOR: Color = Color::new(255, 0, 0);

const BINARIZED_MARKED: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BINARIZED_CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Alpha plane with the same dimensions as the edited image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskLayer {
    alpha: GrayImage,
}

impl MaskLayer {
    pub fn new(bounds: ImageBounds) -> Self {
        Self {
            alpha: GrayImage::new(bounds.width, bounds.height),
        }
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::new(self.alpha.width(), self.alpha.height())
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.alpha
            .get_pixel_checked(x, y)
            .map_or(0, |pixel| pixel.0[0])
    }

    pub fn is_marked(&self, x: u32, y: u32) -> bool {
        self.alpha_at(x, y) > 0
    }

    pub(crate) fn mark(&mut self, x: u32, y: u32) -> bool {
        match self.alpha.get_pixel_mut_checked(x, y) {
            Some(pixel) if pixel.0[0] < MASK_MARKER_ALPHA => {
                *pixel = Luma([MASK_MARKER_ALPHA]);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.alpha.pixels_mut() {
            *pixel = Luma([0]);
        }
    }

    /// Single pass over the layer looking for any marked pixel.
    pub fn has_content(&self) -> bool {
        self.alpha.as_raw().iter().any(|&alpha| alpha > 0)
    }

    pub fn marked_pixel_count(&self) -> usize {
        self.alpha.as_raw().iter().filter(|&&alpha| alpha > 0).count()
    }

    /// Any marked pixel becomes opaque white; everything else stays transparent.
    pub fn binarized(&self) -> RgbaImage {
        RgbaImage::from_fn(self.alpha.width(), self.alpha.height(), |x, y| {
            if self.alpha.get_pixel(x, y).0[0] > 0 {
                BINARIZED_MARKED
            } else {
                BINARIZED_CLEAR
            }
        })
    }

    /// Colored overlay for the mask rendering surface.
    pub fn overlay(&self) -> RgbaImage {
        RgbaImage::from_fn(self.alpha.width(), self.alpha.height(), |x, y| {
            Rgba(MASK_OVERLAY_COLOR.with_alpha(self.alpha.get_pixel(x, y).0[0]))
        })
    }
}

#[derive(Debug, Clone)]
pub struct MaskState {
    layer: MaskLayer,
    has_drawn_content: bool,
    backup: Option<MaskLayer>,
}

impl MaskState {
    pub fn new(bounds: ImageBounds) -> Self {
        Self {
            layer: MaskLayer::new(bounds),
            has_drawn_content: false,
            backup: None,
        }
    }

    pub fn layer(&self) -> &MaskLayer {
        &self.layer
    }

    pub fn bounds(&self) -> ImageBounds {
        self.layer.bounds()
    }

    pub const fn has_drawn_content(&self) -> bool {
        self.has_drawn_content
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    pub fn stamp_point(&mut self, center: Point, brush: BrushOptions) -> usize {
        self.has_drawn_content = true;
        stamp_point(&mut self.layer, center, f64::from(brush.radius()))
    }

    pub fn stamp_line(&mut self, from: Point, to: Point, brush: BrushOptions) -> usize {
        self.has_drawn_content = true;
        stamp_line(&mut self.layer, from, to, f64::from(brush.radius()))
    }

    pub fn has_content(&self) -> bool {
        self.layer.has_content()
    }

    pub fn clear_dirty(&mut self) {
        self.has_drawn_content = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.has_drawn_content = true;
    }

    /// Wipes strokes, dirty flag and any backup.
    pub fn clear(&mut self) {
        self.layer.clear();
        self.has_drawn_content = false;
        self.backup = None;
    }

    /// Replaces the layer with an empty one sized for a new source image.
    pub fn reset(&mut self, bounds: ImageBounds) {
        *self = Self::new(bounds);
    }

    pub fn backup(&mut self) {
        self.backup = Some(self.layer.clone());
    }

    pub fn restore_backup(&mut self) -> bool {
        match self.backup.take() {
            Some(backup) => {
                self.layer = backup;
                true
            }
            None => false,
        }
    }
}
