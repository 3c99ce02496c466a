//! Stroke capture, storage and tessellation for the ink overlay.

pub mod adjacency;
pub mod capture;
pub mod document;
pub mod geometry;
pub mod layers;
pub mod model;
pub mod ribbon;
pub mod segments;
pub mod settings;
pub mod settings_store;
pub mod smooth;
pub mod stamp;
pub mod tessellate;
pub mod viewport;

pub use capture::{erase_near, CaptureEvent, CaptureMode, InkCapture, PenFlags, PenSample};
pub use document::{CanvasSize, InkDocument, InkEvent, InkSnapshot};
pub use geometry::{PointF, Rect};
pub use layers::LayeredTessellator;
pub use model::{Color, InkPoint, InkStroke};
pub use segments::{stroke_segments, LineSegment, SegmentOptions};
pub use settings::InkSettings;
pub use tessellate::{
    select_strategy, tessellator_for, FrameContext, GeometryBuffer, PrimitiveKind,
    RenderCapabilities, Tessellate, TessellationStrategy,
};
pub use viewport::Viewport;
