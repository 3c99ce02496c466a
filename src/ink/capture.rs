use crate::ink::document::InkDocument;
use crate::ink::geometry::Rect;
use crate::ink::model::Color;
use crate::ink::settings::InkSettings;
use crate::ink::settings_store;
use anyhow::Result;
use std::path::Path;

/// Mouse input has no pressure; it draws as if pressed this many times the
/// reference pressure.
pub const MOUSE_PRESSURE_FACTOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PenFlags {
    pub eraser: bool,
    pub inverted: bool,
    pub barrel: bool,
}

impl PenFlags {
    pub fn erasing(self) -> bool {
        self.eraser || self.inverted
    }
}

/// One normalized sample from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenSample {
    pub position: (i32, i32),
    pub pressure: u32,
    pub flags: PenFlags,
}

impl PenSample {
    pub fn new(position: (i32, i32), pressure: u32) -> Self {
        Self {
            position,
            pressure,
            flags: PenFlags::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    PointAdded { position: (i32, i32), width: f64 },
    StrokeCommitted { bounds: Rect },
    /// Emitted for every eraser sample; `removed` holds the bounds of the
    /// strokes that were deleted so the caller can repaint them.
    Erasing { position: (i32, i32), removed: Vec<Rect> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Draw,
    Eraser,
}

/// Removes every committed stroke with a sample closer than `radius`
/// (Manhattan) to `position`. Strokes are scanned newest first and each
/// stroke's scan stops at its first hit.
pub fn erase_near(document: &mut InkDocument, position: (i32, i32), radius: u32) -> Vec<Rect> {
    let mut removed = Vec::new();
    for index in (0..document.stroke_count()).rev() {
        let hit = document.stroke(index).is_some_and(|stroke| {
            stroke
                .points()
                .iter()
                .any(|point| point.manhattan_distance(position) < radius as i64)
        });
        if !hit {
            continue;
        }
        match document.remove_stroke(index, true) {
            Ok(stroke) => removed.push(stroke.bound_rect()),
            Err(err) => tracing::warn!(error = %err, "erase skipped stroke"),
        }
    }
    removed
}

/// Pen state machine feeding an [`InkDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct InkCapture {
    base_pen_width: u32,
    reference_pressure: u32,
    eraser_radius: u32,
    enable_pressure: bool,
    color: Color,
    mode: CaptureMode,
    pen_eraser_active: bool,
    drawing: bool,
    pen_enabled: bool,
    remove_enabled: bool,
}

impl Default for InkCapture {
    fn default() -> Self {
        Self::from_settings(&InkSettings::default())
    }
}

impl InkCapture {
    pub fn from_settings(settings: &InkSettings) -> Self {
        Self {
            base_pen_width: settings.base_pen_width.max(1),
            reference_pressure: settings.reference_pressure.max(1),
            eraser_radius: settings.eraser_radius,
            enable_pressure: settings.enable_pressure,
            color: settings.pen_color,
            mode: CaptureMode::Draw,
            pen_eraser_active: false,
            drawing: false,
            pen_enabled: true,
            remove_enabled: true,
        }
    }

    /// Reads pen settings from `path`; a missing file means defaults.
    pub fn from_settings_path(path: &Path) -> Result<Self> {
        let settings = settings_store::load_from_path(path)?.unwrap_or_default();
        Ok(Self::from_settings(&settings))
    }

    /// Same as [`InkCapture::from_settings_path`] for the file next to the
    /// executable.
    pub fn from_stored_settings() -> Result<Self> {
        Ok(Self::from_settings(&settings_store::load()?))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Applies a textual color; unparsable input keeps the current color.
    pub fn set_color_str(&mut self, text: &str) -> bool {
        match Color::parse(text) {
            Some(color) => {
                self.color = color;
                true
            }
            None => {
                tracing::debug!(text, "ignored invalid pen color");
                false
            }
        }
    }

    pub fn base_pen_width(&self) -> u32 {
        self.base_pen_width
    }

    pub fn set_base_pen_width(&mut self, width: u32) {
        self.base_pen_width = width.max(1);
    }

    pub fn eraser_radius(&self) -> u32 {
        self.eraser_radius
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn enter_eraser_mode(&mut self) {
        self.mode = CaptureMode::Eraser;
    }

    pub fn enter_draw_mode(&mut self) {
        self.mode = CaptureMode::Draw;
    }

    pub fn set_pen_enabled(&mut self, enabled: bool) {
        self.pen_enabled = enabled;
    }

    /// When disabled, eraser samples are reported but no stroke is removed.
    pub fn set_remove_enabled(&mut self, enabled: bool) {
        self.remove_enabled = enabled;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn pen_width(&self, pressure: u32) -> f64 {
        if !self.enable_pressure {
            return self.base_pen_width as f64;
        }
        self.base_pen_width as f64 * pressure as f64 / self.reference_pressure as f64
    }

    /// Seals any stroke left open by an interrupted gesture.
    pub fn begin_stroke(&mut self, document: &mut InkDocument) -> Option<CaptureEvent> {
        self.end_stroke(document)
    }

    pub fn extend_stroke(
        &mut self,
        document: &mut InkDocument,
        position: (i32, i32),
        pressure: u32,
    ) -> Option<CaptureEvent> {
        let width = self.pen_width(pressure);
        if width.is_nan() || width <= 0.0 {
            return None;
        }
        let stroke = document.current_stroke_mut();
        stroke.add_point(position, width);
        stroke.set_color(self.color);
        Some(CaptureEvent::PointAdded { position, width })
    }

    pub fn end_stroke(&mut self, document: &mut InkDocument) -> Option<CaptureEvent> {
        if document.current_stroke().is_empty() {
            return None;
        }
        let bounds = document.current_stroke().bound_rect();
        document.add_current_stroke(true);
        Some(CaptureEvent::StrokeCommitted { bounds })
    }

    pub fn erase_near(&mut self, document: &mut InkDocument, position: (i32, i32)) -> CaptureEvent {
        let removed = if self.remove_enabled {
            erase_near(document, position, self.eraser_radius)
        } else {
            Vec::new()
        };
        CaptureEvent::Erasing { position, removed }
    }

    pub fn pen_down(&mut self, document: &mut InkDocument, sample: PenSample) -> Vec<CaptureEvent> {
        if !self.pen_enabled || sample.pressure == 0 {
            return Vec::new();
        }
        self.drawing = true;

        let mut events: Vec<CaptureEvent> = self.begin_stroke(document).into_iter().collect();
        if self.mode == CaptureMode::Eraser {
            events.push(self.erase_near(document, sample.position));
        } else if sample.flags.erasing() {
            self.pen_eraser_active = true;
            events.push(self.erase_near(document, sample.position));
        } else if !sample.flags.barrel {
            events.extend(self.extend_stroke(document, sample.position, sample.pressure));
        }
        events
    }

    pub fn pen_move(&mut self, document: &mut InkDocument, sample: PenSample) -> Vec<CaptureEvent> {
        if !self.pen_enabled || sample.pressure == 0 || !self.drawing {
            return Vec::new();
        }
        if self.pen_eraser_active || self.mode == CaptureMode::Eraser {
            vec![self.erase_near(document, sample.position)]
        } else {
            self.extend_stroke(document, sample.position, sample.pressure)
                .into_iter()
                .collect()
        }
    }

    pub fn pen_up(&mut self, document: &mut InkDocument) -> Vec<CaptureEvent> {
        if !self.drawing {
            return Vec::new();
        }
        self.drawing = false;
        if self.pen_eraser_active {
            self.pen_eraser_active = false;
            return Vec::new();
        }
        self.end_stroke(document).into_iter().collect()
    }

    fn mouse_sample(&self, position: (i32, i32)) -> PenSample {
        PenSample::new(position, self.reference_pressure * MOUSE_PRESSURE_FACTOR)
    }

    pub fn mouse_press(&mut self, document: &mut InkDocument, position: (i32, i32)) -> Vec<CaptureEvent> {
        let sample = self.mouse_sample(position);
        self.pen_down(document, sample)
    }

    pub fn mouse_move(&mut self, document: &mut InkDocument, position: (i32, i32)) -> Vec<CaptureEvent> {
        let sample = self.mouse_sample(position);
        self.pen_move(document, sample)
    }

    pub fn mouse_release(&mut self, document: &mut InkDocument) -> Vec<CaptureEvent> {
        self.pen_up(document)
    }
}
