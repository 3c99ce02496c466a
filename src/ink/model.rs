use crate::ink::geometry::{PointF, Rect};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Padding applied around a stroke's points so the rect covers pen thickness
/// and eraser reach.
pub const BOUND_RECT_PADDING: i32 = 30;

/// Strokes whose points fit in a box smaller than this (in both directions)
/// are rendered as a single dot.
pub const DOT_STROKE_EXTENT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const YELLOW: Color = Color::rgba(255, 255, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parses `#rgb`, `#rrggbb`, `#aarrggbb` or one of a few color names.
    /// Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Color> {
        let text = text.trim();
        let Some(hex) = text.strip_prefix('#') else {
            return Self::named(text);
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }

    fn named(name: &str) -> Option<Color> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "yellow" => Some(Color::YELLOW),
            "red" => Some(Color::rgb(255, 0, 0)),
            "green" => Some(Color::rgb(0, 128, 0)),
            "blue" => Some(Color::rgb(0, 0, 255)),
            "transparent" => Some(Color::rgba(0, 0, 0, 0)),
            _ => None,
        }
    }

    /// `#rrggbb` for opaque colors, `#aarrggbb` otherwise.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }

    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text).ok_or_else(|| de::Error::custom(format!("invalid color `{text}`")))
    }
}

/// One pen sample: canvas position plus the pressure-scaled pen width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkPoint {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "w")]
    pub width: f64,
}

impl InkPoint {
    pub const fn new(position: (i32, i32), width: f64) -> Self {
        Self {
            x: position.0,
            y: position.1,
            width,
        }
    }

    pub fn position(self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn position_f(self) -> PointF {
        PointF::from_i32(self.position())
    }

    pub fn manhattan_distance(self, position: (i32, i32)) -> i64 {
        (position.0 as i64 - self.x as i64).abs() + (position.1 as i64 - self.y as i64).abs()
    }
}

/// Stored strokes keep loading when their color is missing or unreadable;
/// they fall back to the default color.
fn deserialize_stroke_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value.as_str().and_then(Color::parse) {
        Some(color) => Ok(color),
        None => {
            tracing::warn!(%value, "invalid stroke color, using default");
            Ok(Color::default())
        }
    }
}

/// A single pen-down to pen-up gesture. Points keep drawing order and are
/// only ever appended.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InkStroke {
    #[serde(default, deserialize_with = "deserialize_stroke_color")]
    color: Color,
    #[serde(default)]
    points: Vec<InkPoint>,
}

impl InkStroke {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            points: Vec::new(),
        }
    }

    pub fn with_points(color: Color, points: Vec<InkPoint>) -> Self {
        Self { color, points }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn add_point(&mut self, position: (i32, i32), width: f64) {
        self.points.push(InkPoint::new(position, width));
    }

    pub fn points(&self) -> &[InkPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<InkPoint> {
        self.points.get(index).copied()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the raw sample positions, without padding.
    pub fn points_bounds(&self) -> Option<Rect> {
        Rect::from_points(self.points.iter().map(|p| p.position()))
    }

    /// Bounding box padded by [`BOUND_RECT_PADDING`]. Empty for a stroke with
    /// no points.
    pub fn bound_rect(&self) -> Rect {
        self.points_bounds()
            .map(|rect| rect.padded(BOUND_RECT_PADDING))
            .unwrap_or_default()
    }

    pub fn mean_width(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.width).sum::<f64>() / self.points.len() as f64
    }

    /// True for strokes that should render as a single dot: fewer than two
    /// points, or all points within a tiny box.
    pub fn is_dot(&self) -> bool {
        if self.points.len() < 2 {
            return true;
        }
        self.points_bounds().is_some_and(|rect| {
            rect.width < DOT_STROKE_EXTENT && rect.height < DOT_STROKE_EXTENT
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "color": self.color.to_hex(),
            "points": self.points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stroke() -> InkStroke {
        let mut stroke = InkStroke::new(Color::BLACK);
        for (x, y, w) in [(0, 0, 2.0), (10, 0, 3.0), (10, 10, 2.0), (20, 10, 4.0), (20, 20, 2.0)] {
            stroke.add_point((x, y), w);
        }
        stroke
    }

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::parse("#f80"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::parse("#80ff0000"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(Color::parse("Yellow"), Some(Color::YELLOW));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gg0000"), None);
        assert_eq!(Color::parse("mauve-ish"), None);
    }

    #[test]
    fn hex_keeps_alpha_only_when_translucent() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        let translucent = Color::rgba(1, 2, 3, 4);
        assert_eq!(translucent.to_hex(), "#04010203");
        assert_eq!(Color::parse(&translucent.to_hex()), Some(translucent));
    }

    #[test]
    fn bound_rect_pads_points_by_thirty() {
        let rect = sample_stroke().bound_rect();
        assert_eq!(
            rect,
            Rect {
                x: -30,
                y: -30,
                width: 80,
                height: 80
            }
        );
        assert_eq!(InkStroke::default().bound_rect(), Rect::default());
    }

    #[test]
    fn dot_detection_covers_tiny_and_single_point_strokes() {
        let mut stroke = InkStroke::default();
        assert!(stroke.is_dot());
        stroke.add_point((100, 100), 4.0);
        assert!(stroke.is_dot());
        stroke.add_point((105, 103), 4.0);
        assert!(stroke.is_dot());
        stroke.add_point((125, 103), 4.0);
        assert!(!stroke.is_dot());
        assert!(!sample_stroke().is_dot());
    }

    #[test]
    fn stroke_json_uses_short_point_keys() {
        let value = sample_stroke().to_json();
        assert_eq!(value["color"], "#000000");
        assert_eq!(value["points"][1], serde_json::json!({"x": 10, "y": 0, "w": 3.0}));
        let decoded: InkStroke = serde_json::from_value(value).expect("decode stroke");
        assert_eq!(decoded, sample_stroke());
    }

    #[test]
    fn unreadable_stroke_color_falls_back_to_default() {
        for value in [
            serde_json::json!({"color": "", "points": []}),
            serde_json::json!({"color": "not-a-color", "points": []}),
            serde_json::json!({"color": 12, "points": []}),
            serde_json::json!({"points": []}),
        ] {
            let stroke: InkStroke = serde_json::from_value(value).expect("lenient color");
            assert_eq!(stroke.color(), Color::default());
        }
    }

    #[test]
    fn mean_width_averages_all_points() {
        assert_eq!(sample_stroke().mean_width(), 2.6);
        assert_eq!(InkStroke::default().mean_width(), 0.0);
    }
}
