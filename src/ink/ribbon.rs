use crate::ink::geometry::PointF;
use crate::ink::model::InkStroke;
use crate::ink::smooth::Subdivider;
use crate::ink::viewport::Viewport;

/// Direction substituted for zero-length segments.
const DEFAULT_DIRECTION: PointF = PointF::new(1.0, 0.0);

/// Four corners of a thick segment, ordered `A, B, C, D`:
/// `A`/`B` flank the start point, `C`/`D` flank the end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [PointF; 4],
}

impl Quad {
    /// Shoelace area; positive when the corners run counter-clockwise in a
    /// Y-up space.
    pub fn signed_area(&self) -> f32 {
        let c = &self.corners;
        let mut twice = 0.0;
        for i in 0..4 {
            twice += c[i].cross(c[(i + 1) % 4]);
        }
        twice / 2.0
    }

    pub fn center(&self) -> PointF {
        let sum = self.corners.iter().fold(PointF::default(), |acc, p| acc + *p);
        sum / 4.0
    }

    pub fn normalized(&self, viewport: &Viewport) -> Quad {
        Quad {
            corners: self.corners.map(|p| viewport.normalize(p)),
        }
    }
}

/// Builds the quad covering `start -> end` at the given full width.
///
/// Zero-length segments fall back to the X axis and are stretched by half the
/// width in both directions, producing a `width x width` square.
pub fn quad(width: f32, start: PointF, end: PointF) -> Quad {
    let half = if width.is_finite() { width.max(0.0) / 2.0 } else { 0.0 };
    let (direction, start, end) = match (end - start).normalized() {
        Some(direction) => (direction, start, end),
        None => {
            let reach = DEFAULT_DIRECTION * half;
            (DEFAULT_DIRECTION, start - reach, end + reach)
        }
    };
    let normal = PointF::new(direction.y, -direction.x) * half;

    let a = start + normal;
    let b = start - normal;
    let c = end - normal;
    let d = end + normal;
    Quad {
        corners: [a, b, c, d],
    }
}

/// Ribbon geometry for one stroke. `chords` holds one quad per consecutive
/// pair of samples; `joins` holds the smoothed curve around interior samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeRibbon {
    pub chords: Vec<Quad>,
    pub joins: Vec<Quad>,
}

impl StrokeRibbon {
    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.chords.iter().chain(self.joins.iter())
    }

    pub fn quad_count(&self) -> usize {
        self.chords.len() + self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quad_count() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonBuilder {
    subdivider: Subdivider,
    smooth_joins: bool,
}

impl Default for RibbonBuilder {
    fn default() -> Self {
        Self::new(Subdivider::default(), true)
    }
}

impl RibbonBuilder {
    pub fn new(subdivider: Subdivider, smooth_joins: bool) -> Self {
        Self {
            subdivider,
            smooth_joins,
        }
    }

    pub fn smooth_joins(&self) -> bool {
        self.smooth_joins
    }

    pub fn ribbon(&self, stroke: &InkStroke) -> StrokeRibbon {
        let points = stroke.points();
        let mut ribbon = StrokeRibbon::default();
        if points.is_empty() {
            return ribbon;
        }

        if stroke.is_dot() {
            let center = stroke
                .points_bounds()
                .map(|rect| rect.center())
                .unwrap_or_else(|| points[0].position_f());
            ribbon
                .chords
                .push(quad(stroke.mean_width() as f32, center, center));
            return ribbon;
        }

        let last = points.len() - 1;
        ribbon.chords.reserve(last);
        for i in 1..=last {
            let width = if i == 1 || i == last {
                (points[i - 1].width + points[i].width) / 2.0
            } else {
                points[i].width
            };
            ribbon.chords.push(quad(
                width as f32,
                points[i - 1].position_f(),
                points[i].position_f(),
            ));
        }

        if self.smooth_joins {
            for i in 1..last {
                let width = points[i].width as f32;
                let joins = &mut ribbon.joins;
                self.subdivider.refine(
                    points[i - 1].position_f(),
                    points[i].position_f(),
                    points[i + 1].position_f(),
                    &mut |start, end| joins.push(quad(width, start, end)),
                );
            }
        }

        ribbon
    }
}
