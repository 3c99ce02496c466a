use crate::ink::document::InkDocument;
use crate::ink::tessellate::{FrameContext, GeometryBuffer, PrimitiveKind, Tessellate, TessellationStrategy};

#[derive(Debug, Clone, Copy, PartialEq)]
struct CommittedKey {
    document: u64,
    revision: u64,
    strategy: TessellationStrategy,
    frame: FrameContext,
}

/// Keeps committed-stroke geometry between repaints and composes it with the
/// in-progress stroke, which is tessellated fresh every frame.
#[derive(Debug)]
pub struct LayeredTessellator {
    committed: GeometryBuffer,
    composed: GeometryBuffer,
    committed_key: Option<CommittedKey>,
    committed_len: usize,
    committed_rebuild_count: usize,
    committed_append_count: usize,
}

impl Default for LayeredTessellator {
    fn default() -> Self {
        Self {
            committed: GeometryBuffer::new(PrimitiveKind::Quads),
            composed: GeometryBuffer::new(PrimitiveKind::Quads),
            committed_key: None,
            committed_len: 0,
            committed_rebuild_count: 0,
            committed_append_count: 0,
        }
    }
}

impl LayeredTessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the frame geometry for `document`. Committed strokes are only
    /// re-tessellated when the document, its revision, the strategy or the
    /// frame context changed since the previous call.
    pub fn frame(
        &mut self,
        document: &InkDocument,
        tessellator: &dyn Tessellate,
        frame: &FrameContext,
    ) -> &GeometryBuffer {
        let key = CommittedKey {
            document: document.id(),
            revision: document.revision(),
            strategy: tessellator.strategy(),
            frame: *frame,
        };
        let strokes = document.strokes();

        if self.committed_key != Some(key) || strokes.len() < self.committed_len {
            self.committed.reset(tessellator.primitive());
            self.committed
                .reserve_for_points(strokes.iter().map(|s| s.point_count()).sum());
            for stroke in strokes {
                tessellator.tessellate(stroke, frame, &mut self.committed);
            }
            self.committed_key = Some(key);
            self.committed_len = strokes.len();
            self.committed_rebuild_count += 1;
            tracing::debug!(
                strokes = strokes.len(),
                strategy = key.strategy.as_label(),
                vertices = self.committed.vertex_count(),
                "rebuilt committed ink geometry"
            );
        } else if strokes.len() > self.committed_len {
            for stroke in &strokes[self.committed_len..] {
                tessellator.tessellate(stroke, frame, &mut self.committed);
            }
            self.committed_len = strokes.len();
            self.committed_append_count += 1;
        }

        let current = document.current_stroke();
        self.composed.reset(tessellator.primitive());
        self.composed.reserve_for_points(current.point_count());
        self.composed.append(&self.committed);
        if !current.is_empty() {
            tessellator.tessellate(current, frame, &mut self.composed);
        }
        &self.composed
    }

    /// Geometry of the committed strokes only, as of the last frame.
    pub fn committed(&self) -> &GeometryBuffer {
        &self.committed
    }

    /// Forces the next frame to rebuild the committed layer.
    pub fn invalidate(&mut self) {
        self.committed_key = None;
    }

    pub fn committed_rebuild_count(&self) -> usize {
        self.committed_rebuild_count
    }

    pub fn committed_append_count(&self) -> usize {
        self.committed_append_count
    }
}
