use crate::ink::model::InkStroke;
use std::collections::HashMap;

/// Largest stamp radius in pixels. Wider decoded pens are drawn at this size.
pub const MAX_STAMP_RADIUS: i32 = 1024;

/// Upper bound on the up-front allocation for one raster line.
const MAX_RESERVED_STEPS: usize = 1 << 16;

/// Horizontal run of covered pixels, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
}

impl Span {
    pub fn len(&self) -> i32 {
        self.x_end - self.x_start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampedDisc {
    pub center: (i32, i32),
    pub radius: i32,
}

/// Every raster position of the Bresenham line from `start` to `end`,
/// endpoints included.
pub fn bresenham_line(start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    // Stepping in i64 keeps the error terms exact for any pair of i32 points.
    let (mut x0, mut y0) = (start.0 as i64, start.1 as i64);
    let (x1, y1) = (end.0 as i64, end.1 as i64);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let steps = usize::try_from(dx - dy + 1).unwrap_or(usize::MAX);
    let mut points = Vec::with_capacity(steps.min(MAX_RESERVED_STEPS));

    loop {
        // Every visited coordinate lies between the two i32 endpoints.
        points.push((x0 as i32, y0 as i32));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    points
}

/// Stamps a disc at every raster step between `start` and `end`.
pub fn stamp_line(start: (i32, i32), end: (i32, i32), radius: i32) -> Vec<StampedDisc> {
    bresenham_line(start, end)
        .into_iter()
        .map(|center| StampedDisc { center, radius })
        .collect()
}

/// Per-row half widths of a filled disc, indexed by `dy + radius`.
fn disc_half_widths(radius: i32) -> Vec<i32> {
    let r = radius.clamp(0, MAX_STAMP_RADIUS);
    let rows = (r as usize).checked_mul(2).and_then(|v| v.checked_add(1)).unwrap_or(1);
    let mut half = vec![-1; rows];
    if r == 0 {
        half[0] = 0;
        return half;
    }

    let mut widen = |dy: i32, reach: i32| {
        let slot = &mut half[(dy + r) as usize];
        *slot = (*slot).max(reach);
    };

    let mut x = -r;
    let mut y = 0;
    let mut err = 2 - 2 * r;
    loop {
        widen(y, -x);
        widen(-y, -x);
        widen(x, y);
        widen(-x, y);

        let e = err;
        if e <= y {
            y += 1;
            err += y * 2 + 1;
        }
        if e > x || err > y {
            x += 1;
            err += x * 2 + 1;
        }
        if x >= 0 {
            break;
        }
    }
    half
}

/// Fills a disc with the midpoint circle iteration, one span per row.
pub fn rasterize_disc(center: (i32, i32), radius: i32) -> Vec<Span> {
    let r = radius.clamp(0, MAX_STAMP_RADIUS);
    disc_half_widths(r)
        .into_iter()
        .enumerate()
        .filter(|(_, reach)| *reach >= 0)
        .map(|(row, reach)| Span {
            y: center.1.saturating_add(row as i32 - r),
            x_start: center.0.saturating_sub(reach),
            x_end: center.0.saturating_add(reach),
        })
        .collect()
}

/// Stamp radius for a pen width, between one pixel and [`MAX_STAMP_RADIUS`].
pub fn radius_for_width(width: f64) -> i32 {
    if width.is_nan() {
        return 1;
    }
    let radius = (width / 2.0).round().clamp(1.0, MAX_STAMP_RADIUS as f64);
    radius as i32
}

/// Discs covering a whole stroke. Consecutive segments share their joint
/// sample, so it is stamped only once.
pub fn stamp_stroke(stroke: &InkStroke) -> Vec<StampedDisc> {
    let points = stroke.points();
    match points {
        [] => Vec::new(),
        [only] => vec![StampedDisc {
            center: only.position(),
            radius: radius_for_width(only.width),
        }],
        _ => {
            let mut discs = Vec::new();
            for (i, pair) in points.windows(2).enumerate() {
                let radius = radius_for_width((pair[0].width + pair[1].width) / 2.0);
                let skip = usize::from(i > 0);
                discs.extend(
                    stamp_line(pair[0].position(), pair[1].position(), radius)
                        .into_iter()
                        .skip(skip),
                );
            }
            discs
        }
    }
}

/// Rasterizes stamped discs into spans, reusing the disc shape per radius.
pub fn discs_to_spans(discs: &[StampedDisc]) -> Vec<Span> {
    let mut masks: HashMap<i32, Vec<Span>> = HashMap::new();
    let mut spans = Vec::new();
    for disc in discs {
        let mask = masks
            .entry(disc.radius)
            .or_insert_with(|| rasterize_disc((0, 0), disc.radius));
        spans.extend(mask.iter().map(|span| Span {
            y: span.y.saturating_add(disc.center.1),
            x_start: span.x_start.saturating_add(disc.center.0),
            x_end: span.x_end.saturating_add(disc.center.0),
        }));
    }
    spans
}
