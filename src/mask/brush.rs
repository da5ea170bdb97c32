use super::MaskLayer;
use crate::geometry::Point;

pub const BRUSH_RADIUS_MIN: u8 = 1;
pub const BRUSH_RADIUS_MAX: u8 = 50;
pub const BRUSH_RADIUS_STEP: u8 = 5;
pub const BRUSH_RADIUS_DEFAULT: u8 = 20;

// Fast pointer motion is resampled at most this far apart, and never further
// apart than the brush radius.
const MAX_SAMPLE_SPACING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushOptions {
    radius: u8,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            radius: BRUSH_RADIUS_DEFAULT,
        }
    }
}

impl BrushOptions {
    pub const fn new(radius: u8) -> Self {
        Self {
            radius: clamp_u8_range(radius, BRUSH_RADIUS_MIN, BRUSH_RADIUS_MAX),
        }
    }

    pub const fn radius(&self) -> u8 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u8) {
        self.radius = clamp_u8_range(radius, BRUSH_RADIUS_MIN, BRUSH_RADIUS_MAX);
    }

    pub fn grow(&mut self) {
        self.set_radius(self.radius.saturating_add(BRUSH_RADIUS_STEP));
    }

    pub fn shrink(&mut self) {
        self.set_radius(self.radius.saturating_sub(BRUSH_RADIUS_STEP));
    }

    /// Scrolling up grows the brush, scrolling down shrinks it.
    pub fn adjust_by_scroll(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.grow();
        } else if delta_y > 0.0 {
            self.shrink();
        }
    }
}

const fn clamp_u8_range(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Fills a disk centered at `center`. Returns the number of newly marked pixels.
pub fn stamp_point(mask: &mut MaskLayer, center: Point, radius: f64) -> usize {
    if !(center.x.is_finite() && center.y.is_finite()) || radius <= 0.0 {
        return 0;
    }
    let bounds = mask.bounds();
    let max_x = i64::from(bounds.width) - 1;
    let max_y = i64::from(bounds.height) - 1;
    let left = ((center.x - radius).floor() as i64).max(0);
    let right = ((center.x + radius).ceil() as i64).min(max_x);
    let top = ((center.y - radius).floor() as i64).max(0);
    let bottom = ((center.y + radius).ceil() as i64).min(max_y);
    if left > right || top > bottom {
        return 0;
    }

    let radius_sq = radius * radius;
    let mut marked = 0;
    for y in top..=bottom {
        let dy = y as f64 + 0.5 - center.y;
        for x in left..=right {
            let dx = x as f64 + 0.5 - center.x;
            if dx * dx + dy * dy <= radius_sq && mask.mark(x as u32, y as u32) {
                marked += 1;
            }
        }
    }
    marked
}

/// Stamps disks along the segment so that fast motion leaves no gaps.
pub fn stamp_line(mask: &mut MaskLayer, from: Point, to: Point, radius: f64) -> usize {
    if radius <= 0.0 {
        return 0;
    }
    let distance = from.distance_to(to);
    if !distance.is_finite() {
        return 0;
    }
    let spacing = radius.min(MAX_SAMPLE_SPACING);
    let steps = ((distance / spacing).ceil() as usize).max(1);

    (0..=steps)
        .map(|step| from.lerp(to, step as f64 / steps as f64))
        .map(|sample| stamp_point(mask, sample, radius))
        .sum()
}
