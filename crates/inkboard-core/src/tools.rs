//! Tool selection and per-gesture tool configuration.

use crate::color::RgbColor;
use crate::config::ConfigError;
use crate::geometry::ShapeKind;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted stroke width.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Largest accepted stroke width.
pub const MAX_STROKE_WIDTH: f64 = 50.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Square,
    Circle,
    Triangle,
    Arrow,
    Line,
    Hexagon,
    Pentagon,
    /// Drawable, but not offered in the tool palette.
    Rectangle,
}

impl ToolKind {
    /// Tools offered in the palette, in display order.
    pub const SELECTABLE: [ToolKind; 9] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Arrow,
        ToolKind::Line,
        ToolKind::Hexagon,
        ToolKind::Pentagon,
    ];

    /// Tools that stream points instead of previewing a shape.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }

    /// The shape a parametric tool draws.
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Brush | ToolKind::Eraser => None,
            ToolKind::Square => Some(ShapeKind::Square),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Arrow => Some(ShapeKind::Arrow),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Hexagon => Some(ShapeKind::Hexagon),
            ToolKind::Pentagon => Some(ShapeKind::Pentagon),
        }
    }

    pub fn is_selectable(self) -> bool {
        Self::SELECTABLE.contains(&self)
    }

    /// Stable lowercase identifier.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Arrow => "arrow",
            ToolKind::Line => "line",
            ToolKind::Hexagon => "hexagon",
            ToolKind::Pentagon => "pentagon",
            ToolKind::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::SELECTABLE
            .iter()
            .chain(std::iter::once(&ToolKind::Rectangle))
            .copied()
            .find(|tool| tool.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| ConfigError::UnknownTool(s.to_string()))
    }
}

/// Settings applied to the next stroke or shape.
///
/// Captured when a gesture starts; changing it mid-gesture affects only the
/// following gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub tool: ToolKind,
    pub color: RgbColor,
    pub stroke_width: f64,
    pub fill_enabled: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: RgbColor::BLACK,
            stroke_width: 5.0,
            fill_enabled: false,
        }
    }
}

impl ToolConfig {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_fill(mut self, fill_enabled: bool) -> Self {
        self.fill_enabled = fill_enabled;
        self
    }

    /// Check the stroke width is within the accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_stroke_width(self.stroke_width)
    }

    /// Stroke color for this tool. The eraser paints with `background`.
    pub fn stroke_color(&self, background: Color) -> Color {
        if self.tool == ToolKind::Eraser {
            background
        } else {
            self.color.into()
        }
    }

    /// Whether `shape` should be filled under this configuration.
    pub fn fills(&self, shape: ShapeKind) -> bool {
        self.fill_enabled && shape.is_closed()
    }
}

pub(crate) fn validate_stroke_width(width: f64) -> Result<(), ConfigError> {
    if (MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(ConfigError::StrokeWidthOutOfRange(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectable_tools() {
        assert_eq!(ToolKind::SELECTABLE.len(), 9);
        assert!(!ToolKind::Rectangle.is_selectable());
        assert!(ToolKind::Pentagon.is_selectable());
    }

    #[test]
    fn test_parse_tool_ids() {
        assert_eq!("brush".parse::<ToolKind>().unwrap(), ToolKind::Brush);
        assert_eq!("Hexagon".parse::<ToolKind>().unwrap(), ToolKind::Hexagon);
        assert_eq!("rectangle".parse::<ToolKind>().unwrap(), ToolKind::Rectangle);
        assert!(matches!("lasso".parse::<ToolKind>(), Err(ConfigError::UnknownTool(_))));
    }

    #[test]
    fn test_serde_ids_match_display() {
        for tool in ToolKind::SELECTABLE {
            let json = serde_json::to_string(&tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool));
        }
    }

    #[test]
    fn test_freehand_tools_have_no_shape() {
        assert!(ToolKind::Brush.is_freehand());
        assert!(ToolKind::Eraser.shape().is_none());
        assert_eq!(ToolKind::Arrow.shape(), Some(ShapeKind::Arrow));
    }

    #[test]
    fn test_eraser_uses_background() {
        let background = Color::from_rgba8(250, 250, 250, 255);
        let config = ToolConfig::new(ToolKind::Eraser).with_color(RgbColor::new(255, 0, 0));
        let rgba = config.stroke_color(background).to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (250, 250, 250));

        let brush = ToolConfig::new(ToolKind::Brush).with_color(RgbColor::new(255, 0, 0));
        let rgba = brush.stroke_color(background).to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (255, 0, 0));
    }

    #[test]
    fn test_fill_excludes_open_shapes() {
        let config = ToolConfig::new(ToolKind::Line).with_fill(true);
        assert!(!config.fills(ShapeKind::Line));
        assert!(!config.fills(ShapeKind::Arrow));
        assert!(config.fills(ShapeKind::Circle));
        assert!(!config.with_fill(false).fills(ShapeKind::Circle));
    }

    #[test]
    fn test_stroke_width_range() {
        assert!(ToolConfig::default().validate().is_ok());
        assert!(ToolConfig::default().with_stroke_width(50.0).validate().is_ok());
        assert!(ToolConfig::default().with_stroke_width(0.5).validate().is_err());
        assert!(ToolConfig::default().with_stroke_width(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: ToolConfig =
            serde_json::from_str(r##"{"tool":"pentagon","color":"#00ff00","fill_enabled":true}"##).unwrap();
        assert_eq!(config.tool, ToolKind::Pentagon);
        assert_eq!(config.color, RgbColor::new(0, 255, 0));
        assert!(config.fill_enabled);
        assert!((config.stroke_width - 5.0).abs() < f64::EPSILON);
    }
}
