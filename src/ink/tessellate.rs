use crate::ink::adjacency::{build_stroke_mesh, AdjacencyThickness};
use crate::ink::geometry::PointF;
use crate::ink::model::{Color, InkStroke};
use crate::ink::ribbon::{Quad, RibbonBuilder};
use crate::ink::settings::InkSettings;
use crate::ink::smooth::Subdivider;
use crate::ink::stamp::{discs_to_spans, stamp_stroke};
use crate::ink::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Vertices reserved per expected stroke sample when sizing a buffer.
pub const VERTICES_PER_POINT_HINT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TessellationStrategy {
    Ribbon,
    Dots,
    Adjacency,
}

impl TessellationStrategy {
    pub fn primitive(self) -> PrimitiveKind {
        match self {
            TessellationStrategy::Ribbon => PrimitiveKind::Quads,
            TessellationStrategy::Dots => PrimitiveKind::Lines,
            TessellationStrategy::Adjacency => PrimitiveKind::LinesAdjacency,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            TessellationStrategy::Ribbon => "ribbon",
            TessellationStrategy::Dots => "dots",
            TessellationStrategy::Adjacency => "adjacency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Four vertices per primitive, no indices.
    Quads,
    /// Two vertices per primitive, no indices.
    Lines,
    /// Four indices per primitive.
    LinesAdjacency,
}

/// What the render target can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderCapabilities {
    pub line_adjacency: bool,
    pub geometry_expansion: bool,
}

/// Falls back to the ribbon when adjacency primitives cannot be expanded.
pub fn select_strategy(
    preferred: TessellationStrategy,
    capabilities: RenderCapabilities,
) -> TessellationStrategy {
    match preferred {
        TessellationStrategy::Adjacency
            if !(capabilities.line_adjacency && capabilities.geometry_expansion) =>
        {
            TessellationStrategy::Ribbon
        }
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub viewport: Viewport,
    /// Render every stroke black.
    pub mono: bool,
}

impl FrameContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            mono: false,
        }
    }

    pub fn color_for(&self, stroke: &InkStroke) -> [f32; 4] {
        if self.mono {
            Color::BLACK.to_rgba_f32()
        } else {
            stroke.color().to_rgba_f32()
        }
    }
}

/// Renderable output: normalized positions with a matching color per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    primitive: PrimitiveKind,
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    widths: Vec<f32>,
    uniform_width: Option<f32>,
    indices: Vec<u32>,
}

impl GeometryBuffer {
    pub fn new(primitive: PrimitiveKind) -> Self {
        Self {
            primitive,
            positions: Vec::new(),
            colors: Vec::new(),
            widths: Vec::new(),
            uniform_width: None,
            indices: Vec::new(),
        }
    }

    pub fn with_capacity_for_points(primitive: PrimitiveKind, expected_points: usize) -> Self {
        let mut buffer = Self::new(primitive);
        buffer.reserve_for_points(expected_points);
        buffer
    }

    /// Grows the buffers for roughly `expected_points` more stroke samples.
    pub fn reserve_for_points(&mut self, expected_points: usize) {
        let vertices = expected_points.saturating_mul(VERTICES_PER_POINT_HINT);
        self.positions.reserve(vertices);
        self.colors.reserve(vertices);
        if self.primitive == PrimitiveKind::LinesAdjacency {
            self.indices.reserve(expected_points.saturating_mul(4));
        }
    }

    pub fn vertex_capacity(&self) -> usize {
        self.positions.capacity()
    }

    pub fn primitive(&self) -> PrimitiveKind {
        self.primitive
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Per-vertex thickness in normalized units. Empty unless the adjacency
    /// strategy carries pressure widths.
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    /// Normalized line thickness for the whole buffer, set when the adjacency
    /// strategy runs with a uniform thickness. The renderer binds it as the
    /// expansion stage's thickness constant.
    pub fn uniform_width(&self) -> Option<f32> {
        self.uniform_width
    }

    pub fn set_uniform_width(&mut self, width: Option<f32>) {
        self.uniform_width = width;
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn primitive_count(&self) -> usize {
        match self.primitive {
            PrimitiveKind::Quads => self.positions.len() / 4,
            PrimitiveKind::Lines => self.positions.len() / 2,
            PrimitiveKind::LinesAdjacency => self.indices.len() / 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.widths.clear();
        self.uniform_width = None;
        self.indices.clear();
    }

    pub fn reset(&mut self, primitive: PrimitiveKind) {
        self.clear();
        self.primitive = primitive;
    }

    /// Appends another buffer of the same primitive kind, rebasing indices.
    pub fn append(&mut self, other: &GeometryBuffer) {
        debug_assert_eq!(self.primitive, other.primitive);
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.colors.extend_from_slice(&other.colors);
        self.widths.extend_from_slice(&other.widths);
        if self.uniform_width.is_none() {
            self.uniform_width = other.uniform_width;
        }
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn push_vertex(&mut self, position: [f32; 3], color: [f32; 4]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.colors.push(color);
        index
    }

    pub fn push_quad(&mut self, quad: &Quad, viewport: &Viewport, color: [f32; 4]) {
        for corner in quad.corners {
            self.push_vertex(viewport.vertex(corner), color);
        }
    }

    pub fn push_line(&mut self, start: PointF, end: PointF, viewport: &Viewport, color: [f32; 4]) {
        self.push_vertex(viewport.vertex(start), color);
        self.push_vertex(viewport.vertex(end), color);
    }

    pub fn push_width(&mut self, width: f32) {
        self.widths.push(width);
    }

    pub fn push_index(&mut self, index: u32) {
        self.indices.push(index);
    }
}

/// One of the interchangeable ways to turn a stroke into geometry.
pub trait Tessellate {
    fn strategy(&self) -> TessellationStrategy;

    fn primitive(&self) -> PrimitiveKind {
        self.strategy().primitive()
    }

    /// Appends the stroke's geometry to `out`.
    fn tessellate(&self, stroke: &InkStroke, frame: &FrameContext, out: &mut GeometryBuffer);
}

impl Tessellate for RibbonBuilder {
    fn strategy(&self) -> TessellationStrategy {
        TessellationStrategy::Ribbon
    }

    fn tessellate(&self, stroke: &InkStroke, frame: &FrameContext, out: &mut GeometryBuffer) {
        let color = frame.color_for(stroke);
        for quad in self.ribbon(stroke).quads() {
            out.push_quad(quad, &frame.viewport, color);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DotStamper;

impl Tessellate for DotStamper {
    fn strategy(&self) -> TessellationStrategy {
        TessellationStrategy::Dots
    }

    fn tessellate(&self, stroke: &InkStroke, frame: &FrameContext, out: &mut GeometryBuffer) {
        let color = frame.color_for(stroke);
        for span in discs_to_spans(&stamp_stroke(stroke)) {
            let y = span.y as f32;
            out.push_line(
                PointF::new(span.x_start as f32, y),
                PointF::new((span.x_end + 1) as f32, y),
                &frame.viewport,
                color,
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacencyMeshBuilder {
    thickness: AdjacencyThickness,
}

impl AdjacencyMeshBuilder {
    pub fn new(thickness: AdjacencyThickness) -> Self {
        Self { thickness }
    }

    pub fn thickness(&self) -> AdjacencyThickness {
        self.thickness
    }
}

impl Tessellate for AdjacencyMeshBuilder {
    fn strategy(&self) -> TessellationStrategy {
        TessellationStrategy::Adjacency
    }

    fn tessellate(&self, stroke: &InkStroke, frame: &FrameContext, out: &mut GeometryBuffer) {
        if let AdjacencyThickness::Uniform { thickness } = self.thickness {
            out.set_uniform_width(Some(frame.viewport.normalize_length(thickness)));
        }
        let mesh = build_stroke_mesh(stroke, self.thickness);
        if mesh.is_empty() {
            return;
        }
        let color = frame.color_for(stroke);
        let base = out.vertex_count() as u32;
        for vertex in &mesh.vertices {
            out.push_vertex(frame.viewport.vertex(*vertex), color);
        }
        if let Some(widths) = &mesh.widths {
            for width in widths {
                out.push_width(frame.viewport.normalize_length(*width));
            }
        }
        for index in &mesh.indices {
            out.push_index(base + index);
        }
    }
}

pub fn tessellator_for(strategy: TessellationStrategy, settings: &InkSettings) -> Box<dyn Tessellate> {
    match strategy {
        TessellationStrategy::Ribbon => Box::new(RibbonBuilder::new(
            Subdivider::new(settings.smoothness_threshold, settings.max_subdivision_depth),
            settings.smooth_joins,
        )),
        TessellationStrategy::Dots => Box::new(DotStamper),
        TessellationStrategy::Adjacency => {
            Box::new(AdjacencyMeshBuilder::new(settings.adjacency_thickness))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> InkStroke {
        let mut stroke = InkStroke::new(Color::rgb(255, 0, 0));
        for (x, y) in [(100, 100), (140, 100), (140, 160)] {
            stroke.add_point((x, y), 4.0);
        }
        stroke
    }

    #[test]
    fn adjacency_falls_back_without_expansion_stage() {
        let partial = RenderCapabilities {
            line_adjacency: true,
            geometry_expansion: false,
        };
        let full = RenderCapabilities {
            line_adjacency: true,
            geometry_expansion: true,
        };
        assert_eq!(
            select_strategy(TessellationStrategy::Adjacency, partial),
            TessellationStrategy::Ribbon
        );
        assert_eq!(
            select_strategy(TessellationStrategy::Adjacency, full),
            TessellationStrategy::Adjacency
        );
        assert_eq!(
            select_strategy(TessellationStrategy::Dots, RenderCapabilities::default()),
            TessellationStrategy::Dots
        );
    }

    #[test]
    fn ribbon_emits_four_vertices_per_quad_with_stroke_color() {
        let frame = FrameContext::new(Viewport::new(400, 400));
        let mut out = GeometryBuffer::new(PrimitiveKind::Quads);
        RibbonBuilder::default().tessellate(&stroke(), &frame, &mut out);
        assert_eq!(out.vertex_count(), out.primitive_count() * 4);
        assert!(out.primitive_count() >= 2);
        assert!(out.colors().iter().all(|c| *c == [1.0, 0.0, 0.0, 1.0]));
        assert!(out.indices().is_empty());
    }

    #[test]
    fn mono_frames_render_black() {
        let frame = FrameContext {
            viewport: Viewport::new(400, 400),
            mono: true,
        };
        let mut out = GeometryBuffer::new(PrimitiveKind::Lines);
        DotStamper.tessellate(&stroke(), &frame, &mut out);
        assert!(!out.is_empty());
        assert_eq!(out.vertex_count() % 2, 0);
        assert!(out.colors().iter().all(|c| *c == [0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn adjacency_indices_are_rebased_per_stroke() {
        let frame = FrameContext::new(Viewport::new(400, 400));
        let builder = AdjacencyMeshBuilder::new(AdjacencyThickness::PerVertex);
        let mut out = GeometryBuffer::new(PrimitiveKind::LinesAdjacency);
        builder.tessellate(&stroke(), &frame, &mut out);
        builder.tessellate(&stroke(), &frame, &mut out);

        assert_eq!(out.vertex_count(), 10);
        assert_eq!(out.widths().len(), 10);
        assert_eq!(out.primitive_count(), 4);
        assert_eq!(&out.indices()[8..12], &[5, 6, 7, 8]);
        assert!((out.widths()[0] - 0.01).abs() < 1e-6);
    }

    #[test]
    fn append_rebases_indices() {
        let frame = FrameContext::new(Viewport::new(400, 400));
        let builder = AdjacencyMeshBuilder::new(AdjacencyThickness::Uniform { thickness: 2.0 });
        let mut a = GeometryBuffer::new(PrimitiveKind::LinesAdjacency);
        builder.tessellate(&stroke(), &frame, &mut a);
        let mut combined = a.clone();
        combined.append(&a);
        assert_eq!(combined.indices()[8], 5);
        assert!(combined.widths().is_empty());
    }

    #[test]
    fn uniform_adjacency_thickness_reaches_the_buffer() {
        let frame = FrameContext::new(Viewport::new(400, 400));
        let settings = InkSettings {
            adjacency_thickness: AdjacencyThickness::Uniform { thickness: 8.0 },
            ..InkSettings::default()
        };
        let tessellator = tessellator_for(TessellationStrategy::Adjacency, &settings);
        let mut out = GeometryBuffer::new(PrimitiveKind::LinesAdjacency);
        tessellator.tessellate(&stroke(), &frame, &mut out);
        assert_eq!(out.uniform_width(), Some(0.02));

        let mut per_vertex = GeometryBuffer::new(PrimitiveKind::LinesAdjacency);
        AdjacencyMeshBuilder::new(AdjacencyThickness::PerVertex).tessellate(&stroke(), &frame, &mut per_vertex);
        assert_eq!(per_vertex.uniform_width(), None);

        out.clear();
        assert_eq!(out.uniform_width(), None);
    }

    #[test]
    fn capacity_is_reserved_per_expected_point() {
        let buffer = GeometryBuffer::with_capacity_for_points(PrimitiveKind::Quads, 50);
        assert!(buffer.vertex_capacity() >= 50 * VERTICES_PER_POINT_HINT);
        assert!(buffer.is_empty());
    }

    #[test]
    fn factory_respects_strategy() {
        let settings = InkSettings::default();
        for strategy in [
            TessellationStrategy::Ribbon,
            TessellationStrategy::Dots,
            TessellationStrategy::Adjacency,
        ] {
            let tessellator = tessellator_for(strategy, &settings);
            assert_eq!(tessellator.strategy(), strategy);
            assert_eq!(tessellator.primitive(), strategy.primitive());
        }
    }
}
