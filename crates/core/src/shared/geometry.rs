/// Pixel size of an image or drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest size with the same aspect ratio that fits inside `max`.
    ///
    /// Never scales up: an image already inside `max` keeps its size.
    pub fn fit_within(self, max: Dimensions) -> Dimensions {
        if self.width == 0 || self.height == 0 {
            return Dimensions::new(self.width.min(max.width), self.height.min(max.height));
        }
        let sx = max.width as f64 / self.width as f64;
        let sy = max.height as f64 / self.height as f64;
        let scale = sx.min(sy).min(1.0);
        Dimensions::new(
            ((self.width as f64 * scale).round() as u32).clamp(1, max.width.max(1)),
            ((self.height as f64 * scale).round() as u32).clamp(1, max.height.max(1)),
        )
    }
}

/// Axis-aligned box in pixel coordinates, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, (x2 - x1).max(0.0), (y2 - y1).max(0.0))
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn scale(&self, sx: f32, sy: f32) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Intersection with the `(0, 0, dims)` rectangle.
    pub fn clamp_to(&self, dims: Dimensions) -> Self {
        let (w, h) = (dims.width as f32, dims.height as f32);
        Self::from_corners(
            self.x.clamp(0.0, w),
            self.y.clamp(0.0, h),
            self.right().clamp(0.0, w),
            self.bottom().clamp(0.0, h),
        )
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}
