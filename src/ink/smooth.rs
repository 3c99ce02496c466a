//! Adaptive smoothing of raw pen samples.
//!
//! Every interior sample is replaced by a curve between the midpoints of its
//! two neighbouring chords. The curve is refined by repeated midpoint
//! averaging until the corner it bends around is flatter than the threshold.

use crate::ink::geometry::PointF;

pub const DEFAULT_SMOOTHNESS_THRESHOLD: f32 = 1.0;
pub const DEFAULT_MAX_DEPTH: u32 = 12;

/// Intermediate points of one refinement step over `(prev, point, next)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    pub c1: PointF,
    pub c2: PointF,
    pub cc: PointF,
    pub adjust: PointF,
}

impl Refinement {
    pub fn of(prev: PointF, point: PointF, next: PointF) -> Self {
        let c1 = prev.midpoint(point);
        let c2 = next.midpoint(point);
        let cc = c1.midpoint(c2);
        let adjust = point.midpoint(cc);
        Self { c1, c2, cc, adjust }
    }

    /// Manhattan distance between the bent point and the flat chord midpoint.
    pub fn deviation(&self) -> f32 {
        (self.adjust - self.cc).manhattan_length()
    }

    /// The triple refined on the next level.
    pub fn next_triple(&self) -> (PointF, PointF, PointF) {
        (self.c1, self.adjust, self.c2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subdivider {
    threshold: f32,
    max_depth: u32,
}

impl Default for Subdivider {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHNESS_THRESHOLD, DEFAULT_MAX_DEPTH)
    }
}

impl Subdivider {
    pub fn new(threshold: f32, max_depth: u32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            max_depth,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Emits the smoothed curve around `point` as consecutive segments and
    /// returns the deepest refinement level reached.
    pub fn refine<F>(&self, prev: PointF, point: PointF, next: PointF, emit: &mut F) -> u32
    where
        F: FnMut(PointF, PointF),
    {
        self.refine_at(prev, point, next, 0, emit)
    }

    pub fn refine_to_vec(&self, prev: PointF, point: PointF, next: PointF) -> Vec<(PointF, PointF)> {
        let mut segments = Vec::new();
        self.refine(prev, point, next, &mut |start, end| segments.push((start, end)));
        segments
    }

    fn refine_at<F>(&self, prev: PointF, point: PointF, next: PointF, depth: u32, emit: &mut F) -> u32
    where
        F: FnMut(PointF, PointF),
    {
        let step = Refinement::of(prev, point, next);
        let deviation = step.deviation();

        // NaN deviations terminate too.
        if deviation > self.threshold && depth < self.max_depth {
            emit(step.c1, step.c1.midpoint(step.adjust));
            let reached = self.refine_at(step.c1, step.adjust, step.c2, depth + 1, emit);
            emit(step.c2.midpoint(step.adjust), step.c2);
            reached
        } else {
            emit(step.c1, step.adjust);
            emit(step.adjust, step.c2);
            depth
        }
    }
}
