//! Vertex/index streams for line expansion with adjacency.
//!
//! Each drawn segment is a 4-tuple `(before, start, end, after)` so the
//! expansion stage can miter joins without knowing about stroke ends. The
//! real endpoints get synthetic neighbours by linear extrapolation.

use crate::ink::geometry::PointF;
use crate::ink::model::InkStroke;
use crate::ink::ribbon::{quad, Quad};
use serde::{Deserialize, Serialize};

/// Miters longer than this multiple of the half width are clamped.
pub const MITER_LIMIT: f32 = 4.0;

/// How the expansion stage learns the line thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjacencyThickness {
    /// One thickness for the whole draw call; pressure widths are dropped.
    Uniform { thickness: f32 },
    /// Pressure widths travel with every vertex.
    PerVertex,
}

impl Default for AdjacencyThickness {
    fn default() -> Self {
        AdjacencyThickness::PerVertex
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdjacencyMesh {
    pub vertices: Vec<PointF>,
    pub widths: Option<Vec<f32>>,
    pub indices: Vec<u32>,
}

impl AdjacencyMesh {
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn primitives(&self) -> impl Iterator<Item = [PointF; 4]> + '_ {
        self.indices.chunks_exact(4).map(|ids| {
            [
                self.vertices[ids[0] as usize],
                self.vertices[ids[1] as usize],
                self.vertices[ids[2] as usize],
                self.vertices[ids[3] as usize],
            ]
        })
    }
}

/// Builds the adjacency stream for a polyline. Fewer than two points yield an
/// empty mesh.
pub fn build_mesh(points: &[PointF]) -> AdjacencyMesh {
    let n = points.len();
    if n < 2 {
        return AdjacencyMesh::default();
    }

    let mut vertices = Vec::with_capacity(n + 2);
    vertices.push(points[0] * 2.0 - points[1]);
    vertices.extend_from_slice(points);
    vertices.push(points[n - 1] * 2.0 - points[n - 2]);

    let mut indices = Vec::with_capacity((n - 1) * 4);
    for i in 0..(n - 1) as u32 {
        indices.extend_from_slice(&[i, i + 1, i + 2, i + 3]);
    }

    AdjacencyMesh {
        vertices,
        widths: None,
        indices,
    }
}

pub fn build_stroke_mesh(stroke: &InkStroke, thickness: AdjacencyThickness) -> AdjacencyMesh {
    let points: Vec<PointF> = stroke.points().iter().map(|p| p.position_f()).collect();
    let mut mesh = build_mesh(&points);
    if mesh.is_empty() {
        return mesh;
    }

    if thickness == AdjacencyThickness::PerVertex {
        let pts = stroke.points();
        let mut widths = Vec::with_capacity(pts.len() + 2);
        widths.push(pts[0].width as f32);
        widths.extend(pts.iter().map(|p| p.width as f32));
        widths.push(pts[pts.len() - 1].width as f32);
        mesh.widths = Some(widths);
    }
    mesh
}

fn miter_offset(tangent: PointF, normal: PointF, half: f32) -> PointF {
    let miter = PointF::new(tangent.y, -tangent.x);
    let cos = miter.dot(normal);
    if cos.abs() < 1.0 / MITER_LIMIT {
        return normal * half;
    }
    miter * (half / cos)
}

fn join_tangent(incoming: PointF, line: PointF) -> PointF {
    incoming
        .normalized()
        .and_then(|dir| (dir + line).normalized())
        .unwrap_or(line)
}

/// CPU version of the expansion stage: one mitered quad per adjacency
/// primitive, corners in the same order as [`quad`].
pub fn expand_segment(primitive: [PointF; 4], start_width: f32, end_width: f32) -> Quad {
    let [before, start, end, after] = primitive;
    let Some(line) = (end - start).normalized() else {
        return quad(start_width.max(end_width), start, end);
    };
    let normal = PointF::new(line.y, -line.x);
    let start_tangent = join_tangent(start - before, line);
    let end_tangent = join_tangent(after - end, line);

    let a_off = miter_offset(start_tangent, normal, start_width.max(0.0) / 2.0);
    let d_off = miter_offset(end_tangent, normal, end_width.max(0.0) / 2.0);
    Quad {
        corners: [start + a_off, start - a_off, end - d_off, end + d_off],
    }
}

/// Expands a whole mesh; `uniform` is used when the mesh has no widths.
pub fn expand_mesh(mesh: &AdjacencyMesh, uniform: f32) -> Vec<Quad> {
    mesh.indices
        .chunks_exact(4)
        .map(|ids| {
            let primitive = [
                mesh.vertices[ids[0] as usize],
                mesh.vertices[ids[1] as usize],
                mesh.vertices[ids[2] as usize],
                mesh.vertices[ids[3] as usize],
            ];
            let (start_width, end_width) = match &mesh.widths {
                Some(widths) => (widths[ids[1] as usize], widths[ids[2] as usize]),
                None => (uniform, uniform),
            };
            expand_segment(primitive, start_width, end_width)
        })
        .collect()
}
