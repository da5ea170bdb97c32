//! Shared geometric primitives used by the viewport, brush and input layers.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Pixel dimensions of the raster being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where the mask surface sits on screen, before any zoom is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub origin: Point,
    pub display: Size,
}

impl SurfaceGeometry {
    pub const fn new(origin: Point, display: Size) -> Self {
        Self { origin, display }
    }

    /// Surface displayed at its intrinsic size with its corner at the screen origin.
    pub fn unscaled(bounds: ImageBounds) -> Self {
        Self::new(Point::ORIGIN, bounds.size())
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x <= self.origin.x + self.display.width
            && point.y <= self.origin.y + self.display.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sizes_are_detected() {
        assert!(Size::new(0.0, 10.0).is_degenerate());
        assert!(Size::new(10.0, -1.0).is_degenerate());
        assert!(Size::new(f64::NAN, 10.0).is_degenerate());
        assert!(!Size::new(1.0, 1.0).is_degenerate());
    }

    #[test]
    fn surface_contains_its_edges() {
        let surface = SurfaceGeometry::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        assert!(surface.contains(Point::new(10.0, 20.0)));
        assert!(surface.contains(Point::new(110.0, 70.0)));
        assert!(!surface.contains(Point::new(9.9, 30.0)));
        assert!(!surface.contains(Point::new(50.0, 70.1)));
    }

    #[test]
    fn lerp_walks_the_segment() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, -4.0);
        assert_eq!(start.lerp(end, 0.5), Point::new(5.0, -2.0));
        assert_eq!(start.distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
