//! Round-capped line segments for vector backends (printing, export).

use crate::ink::geometry::PointF;
use crate::ink::model::{Color, InkStroke};
use crate::ink::smooth::Subdivider;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOptions {
    /// Paint everything black.
    pub mono: bool,
    /// Multiplies positions and widths.
    pub scale: f32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            mono: false,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: PointF,
    pub end: PointF,
    pub width: f32,
    pub color: Color,
}

impl LineSegment {
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

pub fn stroke_segments(stroke: &InkStroke, options: SegmentOptions) -> Vec<LineSegment> {
    stroke_segments_with(stroke, options, &Subdivider::default())
}

pub fn stroke_segments_with(
    stroke: &InkStroke,
    options: SegmentOptions,
    subdivider: &Subdivider,
) -> Vec<LineSegment> {
    let points = stroke.points();
    if points.is_empty() {
        return Vec::new();
    }
    let color = if options.mono { Color::BLACK } else { stroke.color() };
    let scale = if options.scale.is_finite() && options.scale > 0.0 {
        options.scale
    } else {
        1.0
    };
    let segment = |start: PointF, end: PointF, width: f64| LineSegment {
        start: start * scale,
        end: end * scale,
        width: width as f32 * scale,
        color,
    };

    if stroke.is_dot() {
        let center = stroke
            .points_bounds()
            .map(|rect| rect.center())
            .unwrap_or_else(|| points[0].position_f());
        return vec![segment(center, center, stroke.mean_width())];
    }

    let last = points.len() - 1;
    let mut segments = Vec::with_capacity(points.len() * 2);

    let first_width = (points[0].width + points[1].width) / 2.0;
    let start = points[0].position_f();
    segments.push(segment(start, start.midpoint(points[1].position_f()), first_width));

    for i in 1..last {
        let width = points[i].width;
        subdivider.refine(
            points[i - 1].position_f(),
            points[i].position_f(),
            points[i + 1].position_f(),
            &mut |a, b| segments.push(segment(a, b, width)),
        );
    }

    let last_width = (points[last - 1].width + points[last].width) / 2.0;
    let end = points[last].position_f();
    segments.push(segment(points[last - 1].position_f().midpoint(end), end, last_width));
    segments
}
