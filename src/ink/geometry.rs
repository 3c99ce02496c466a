use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_i32(point: (i32, i32)) -> Self {
        Self::new(point.0 as f32, point.1 as f32)
    }

    pub fn midpoint(self, other: PointF) -> PointF {
        (self + other) / 2.0
    }

    pub fn manhattan_length(self) -> f32 {
        self.x.abs() + self.y.abs()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(self, other: PointF) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product z component of the two vectors.
    pub fn cross(self, other: PointF) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction, or `None` for (near) zero vectors.
    pub fn normalized(self) -> Option<PointF> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(self / len)
    }

    pub fn scaled(self, factor: f32) -> PointF {
        self * factor
    }
}

impl Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointF {
    type Output = PointF;

    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for PointF {
    type Output = PointF;

    fn mul(self, rhs: f32) -> PointF {
        PointF::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for PointF {
    type Output = PointF;

    fn div(self, rhs: f32) -> PointF {
        PointF::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for PointF {
    type Output = PointF;

    fn neg(self) -> PointF {
        PointF::new(-self.x, -self.y)
    }
}

/// Integer rectangle in canvas pixels. `width`/`height` of zero means empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn from_points<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.0, first.1, first.0, first.1);
        for (x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Rect {
            x: min_x,
            y: min_y,
            width: span(min_x, max_x),
            height: span(min_y, max_y),
        })
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Grows the rect by `pad` on every side.
    pub fn padded(self, pad: i32) -> Rect {
        let grow = pad.saturating_mul(2);
        Rect {
            x: self.x.saturating_sub(pad),
            y: self.y.saturating_sub(pad),
            width: self.width.saturating_add(grow),
            height: self.height.saturating_add(grow),
        }
    }

    pub fn center(self) -> PointF {
        PointF::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn intersects(self, other: Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Distance from `min` to `max`, clamped to what an `i32` extent can hold.
fn span(min: i32, max: i32) -> i32 {
    (max as i64 - min as i64).clamp(0, i32::MAX as i64) as i32
}
