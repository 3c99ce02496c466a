use crate::ink::adjacency::AdjacencyThickness;
use crate::ink::model::Color;
use crate::ink::smooth::{DEFAULT_MAX_DEPTH, DEFAULT_SMOOTHNESS_THRESHOLD};
use crate::ink::tessellate::TessellationStrategy;
use serde::{Deserialize, Serialize};

/// Pressure reported for a half-pressed pen; pen widths are relative to it.
pub const DEFAULT_REFERENCE_PRESSURE: u32 = 1024 / 2;
const MAX_SUBDIVISION_DEPTH_LIMIT: u32 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InkSettings {
    #[serde(default = "default_base_pen_width")]
    pub base_pen_width: u32,
    #[serde(default = "default_eraser_radius")]
    pub eraser_radius: u32,
    #[serde(default = "default_reference_pressure")]
    pub reference_pressure: u32,
    #[serde(default = "default_enable_pressure")]
    pub enable_pressure: bool,
    #[serde(default = "default_pen_color")]
    pub pen_color: Color,
    #[serde(default = "default_smoothness_threshold")]
    pub smoothness_threshold: f32,
    #[serde(default = "default_max_subdivision_depth")]
    pub max_subdivision_depth: u32,
    #[serde(default = "default_smooth_joins")]
    pub smooth_joins: bool,
    #[serde(default = "default_strategy")]
    pub strategy: TessellationStrategy,
    #[serde(default)]
    pub adjacency_thickness: AdjacencyThickness,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_base_pen_width() -> u32 {
    10
}

fn default_eraser_radius() -> u32 {
    30
}

fn default_reference_pressure() -> u32 {
    DEFAULT_REFERENCE_PRESSURE
}

fn default_enable_pressure() -> bool {
    true
}

fn default_pen_color() -> Color {
    Color::YELLOW
}

fn default_smoothness_threshold() -> f32 {
    DEFAULT_SMOOTHNESS_THRESHOLD
}

fn default_max_subdivision_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_smooth_joins() -> bool {
    true
}

fn default_strategy() -> TessellationStrategy {
    TessellationStrategy::Ribbon
}

fn default_canvas_width() -> u32 {
    1920
}

fn default_canvas_height() -> u32 {
    1080
}

impl Default for InkSettings {
    fn default() -> Self {
        Self {
            base_pen_width: default_base_pen_width(),
            eraser_radius: default_eraser_radius(),
            reference_pressure: default_reference_pressure(),
            enable_pressure: default_enable_pressure(),
            pen_color: default_pen_color(),
            smoothness_threshold: default_smoothness_threshold(),
            max_subdivision_depth: default_max_subdivision_depth(),
            smooth_joins: default_smooth_joins(),
            strategy: default_strategy(),
            adjacency_thickness: AdjacencyThickness::default(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            debug_logging: false,
        }
    }
}

impl InkSettings {
    /// Pulls out-of-range values back to something usable. Returns whether
    /// anything changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();
        self.base_pen_width = self.base_pen_width.max(1);
        self.eraser_radius = self.eraser_radius.max(1);
        self.reference_pressure = self.reference_pressure.max(1);
        if !self.smoothness_threshold.is_finite() || self.smoothness_threshold < 0.0 {
            self.smoothness_threshold = default_smoothness_threshold();
        }
        self.max_subdivision_depth = self.max_subdivision_depth.min(MAX_SUBDIVISION_DEPTH_LIMIT);
        if let AdjacencyThickness::Uniform { thickness } = self.adjacency_thickness {
            if !thickness.is_finite() || thickness <= 0.0 {
                self.adjacency_thickness = AdjacencyThickness::Uniform {
                    thickness: self.base_pen_width as f32,
                };
            }
        }
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        *self != before
    }
}
