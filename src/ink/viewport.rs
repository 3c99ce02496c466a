use crate::ink::geometry::PointF;

/// Maps window pixels (origin top-left, Y down) to the renderer's normalized
/// space (origin at the center, Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn normalize(&self, point: PointF) -> PointF {
        PointF::new(
            (point.x - self.width / 2.0) / self.width,
            (self.height / 2.0 - point.y) / self.height,
        )
    }

    pub fn denormalize(&self, point: PointF) -> PointF {
        PointF::new(
            point.x * self.width + self.width / 2.0,
            self.height / 2.0 - point.y * self.height,
        )
    }

    /// Normalized position as a vertex with `z = 0`.
    pub fn vertex(&self, point: PointF) -> [f32; 3] {
        let n = self.normalize(point);
        [n.x, n.y, 0.0]
    }

    /// Converts a pixel length along X into normalized units.
    pub fn normalize_length(&self, length: f32) -> f32 {
        length / self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1920, 1080)
    }
}
