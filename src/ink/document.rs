use crate::ink::geometry::Rect;
use crate::ink::model::InkStroke;
use anyhow::{ensure, Context, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_document_id() -> u64 {
    NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)
}

pub const DEFAULT_CANVAS_SIZE: CanvasSize = CanvasSize {
    width: 1920,
    height: 1080,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        DEFAULT_CANVAS_SIZE
    }
}

/// Change notifications, queued in mutation order until the owner drains them.
#[derive(Debug, Clone, PartialEq)]
pub enum InkEvent {
    StrokeAdded { index: Option<usize> },
    StrokeRemoved { index: usize, stroke: InkStroke },
    StrokeInserted { index: usize },
    Cleared,
    CanvasSizeChanged { size: CanvasSize },
}

/// Immutable copy of a document handed to other threads or renderers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InkSnapshot {
    pub strokes: Vec<InkStroke>,
    pub current: InkStroke,
    pub canvas_size: CanvasSize,
}

#[derive(Debug)]
pub struct InkDocument {
    id: u64,
    strokes: Vec<InkStroke>,
    current: InkStroke,
    canvas_size: CanvasSize,
    save_strokes: bool,
    revision: u64,
    events: VecDeque<InkEvent>,
}

impl Default for InkDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone is a separate document: it gets its own id so caches keyed on
/// `(id, revision)` never confuse it with the original.
impl Clone for InkDocument {
    fn clone(&self) -> Self {
        Self {
            id: next_document_id(),
            strokes: self.strokes.clone(),
            current: self.current.clone(),
            canvas_size: self.canvas_size,
            save_strokes: self.save_strokes,
            revision: self.revision,
            events: self.events.clone(),
        }
    }
}

/// Content equality; identity and pending events are ignored.
impl PartialEq for InkDocument {
    fn eq(&self, other: &Self) -> bool {
        self.strokes == other.strokes
            && self.current == other.current
            && self.canvas_size == other.canvas_size
            && self.save_strokes == other.save_strokes
    }
}

impl InkDocument {
    pub fn new() -> Self {
        Self {
            id: next_document_id(),
            strokes: Vec::new(),
            current: InkStroke::default(),
            canvas_size: CanvasSize::default(),
            save_strokes: true,
            revision: 0,
            events: VecDeque::new(),
        }
    }

    /// Builds a document from serialized strokes. Invalid input yields an
    /// empty document; the failure is only reported through the `warn!` log
    /// emitted by [`InkDocument::from_json_string`]. Use that method or
    /// [`parse_strokes`] when the caller needs to react to it.
    pub fn from_json(json: &str) -> Self {
        let mut document = Self::new();
        let _ = document.from_json_string(json);
        document
    }

    /// Process-unique identity. Together with [`InkDocument::revision`] it
    /// names one exact state of one document.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn strokes(&self) -> &[InkStroke] {
        &self.strokes
    }

    pub fn stroke(&self, index: usize) -> Option<&InkStroke> {
        self.strokes.get(index)
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn current_stroke(&self) -> &InkStroke {
        &self.current
    }

    pub fn current_stroke_mut(&mut self) -> &mut InkStroke {
        &mut self.current
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if self.canvas_size != size {
            self.canvas_size = size;
            self.events.push_back(InkEvent::CanvasSizeChanged { size });
        }
    }

    pub fn save_strokes(&self) -> bool {
        self.save_strokes
    }

    /// When disabled, committed strokes are dropped instead of kept.
    pub fn set_save_strokes(&mut self, save: bool) {
        self.save_strokes = save;
    }

    /// Bumped by every mutation except appending a committed stroke. Geometry
    /// caches use it to decide between an incremental append and a rebuild.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Moves the in-progress stroke into the committed list and starts a new
    /// empty one. Does nothing while the current stroke has no points.
    pub fn add_current_stroke(&mut self, notify: bool) {
        if self.current.is_empty() {
            return;
        }
        let color = self.current.color();
        let stroke = std::mem::replace(&mut self.current, InkStroke::new(color));
        let index = if self.save_strokes {
            self.strokes.push(stroke);
            Some(self.strokes.len() - 1)
        } else {
            None
        };
        tracing::debug!(?index, strokes = self.strokes.len(), "ink stroke committed");
        if notify {
            self.events.push_back(InkEvent::StrokeAdded { index });
        }
    }

    pub fn insert_stroke(&mut self, index: usize, stroke: InkStroke, notify: bool) -> Result<()> {
        ensure!(
            index <= self.strokes.len(),
            "insert index {index} out of range for {} strokes",
            self.strokes.len()
        );
        self.strokes.insert(index, stroke);
        self.revision += 1;
        if notify {
            self.events.push_back(InkEvent::StrokeInserted { index });
        }
        Ok(())
    }

    pub fn remove_stroke(&mut self, index: usize, notify: bool) -> Result<InkStroke> {
        ensure!(
            index < self.strokes.len(),
            "remove index {index} out of range for {} strokes",
            self.strokes.len()
        );
        let stroke = self.strokes.remove(index);
        self.revision += 1;
        if notify {
            self.events.push_back(InkEvent::StrokeRemoved {
                index,
                stroke: stroke.clone(),
            });
        }
        Ok(stroke)
    }

    /// Drops every committed stroke. The in-progress stroke is untouched.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.revision += 1;
        self.events.push_back(InkEvent::Cleared);
    }

    pub fn merge(&mut self, other: &InkDocument) {
        self.strokes.extend(other.strokes.iter().cloned());
        self.revision += 1;
    }

    pub fn clone_from_document(&mut self, other: &InkDocument) {
        self.strokes = other.strokes.clone();
        self.revision += 1;
    }

    pub fn same_strokes(&self, other: &InkDocument) -> bool {
        self.strokes == other.strokes
    }

    pub fn snapshot(&self) -> InkSnapshot {
        InkSnapshot {
            strokes: self.strokes.clone(),
            current: self.current.clone(),
            canvas_size: self.canvas_size,
        }
    }

    /// Indices of committed strokes whose padded bounds touch `clip`.
    pub fn strokes_intersecting(&self, clip: Rect) -> Vec<usize> {
        self.strokes
            .iter()
            .enumerate()
            .filter(|(_, stroke)| stroke.bound_rect().intersects(clip))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn to_json_string(&self) -> String {
        let array: Vec<serde_json::Value> = self.strokes.iter().map(InkStroke::to_json).collect();
        serde_json::Value::Array(array).to_string()
    }

    /// Replaces the committed strokes with the serialized ones. On failure
    /// the document is left cleared and `false` is returned.
    pub fn from_json_string(&mut self, json: &str) -> bool {
        self.clear();
        match parse_strokes(json) {
            Ok(strokes) => {
                self.strokes = strokes;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected serialized ink document");
                false
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<InkEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Decodes a serialized stroke array. Only input that is not a JSON array is
/// an error; elements that are not stroke records are skipped with a warning
/// and unreadable colors fall back to the default.
pub fn parse_strokes(json: &str) -> Result<Vec<InkStroke>> {
    let value: serde_json::Value = serde_json::from_str(json).context("parse ink json")?;
    let serde_json::Value::Array(items) = value else {
        anyhow::bail!("ink document must be a json array");
    };
    let mut strokes = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<InkStroke>(item) {
            Ok(stroke) => strokes.push(stroke),
            Err(err) => tracing::warn!(index, error = %err, "skipped unreadable stroke"),
        }
    }
    Ok(strokes)
}
