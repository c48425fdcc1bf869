//! Gesture scripts: a JSON description of a board and the input it receives.

use inkboard_core::{BoardConfig, BoardError, ConfigError, ContainerBox, ToolKind};
use inkboard_render::PixmapBoard;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Usage: inkboard <script.json> <output.png>")]
    Usage,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Command {index} ({op}) failed: {source}")]
    Command {
        index: usize,
        op: &'static str,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// One input event or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Command {
    Tool { tool: ToolKind },
    Color { color: String },
    Width { width: f64 },
    Fill { enabled: bool },
    /// Queue a container resize; applied on the next `frame`.
    Resize { width: f64, height: f64 },
    Frame,
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Undo,
    Redo,
    Clear,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Tool { .. } => "tool",
            Command::Color { .. } => "color",
            Command::Width { .. } => "width",
            Command::Fill { .. } => "fill",
            Command::Resize { .. } => "resize",
            Command::Frame => "frame",
            Command::Down { .. } => "down",
            Command::Move { .. } => "move",
            Command::Up => "up",
            Command::Leave => "leave",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Clear => "clear",
        }
    }
}

/// A board description plus the commands to replay against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureScript {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_ratio")]
    pub device_pixel_ratio: f64,
    #[serde(default)]
    pub config: BoardConfig,
    pub commands: Vec<Command>,
}

fn default_ratio() -> f64 {
    1.0
}

impl GestureScript {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

/// Build the board described by `script` and feed it every command.
pub fn replay(script: &GestureScript) -> Result<PixmapBoard, AppError> {
    let container = ContainerBox::sized(script.width, script.height);
    let mut board = PixmapBoard::try_new(container, script.device_pixel_ratio, script.config.clone())?;

    for (index, command) in script.commands.iter().enumerate() {
        let wrap = |source| AppError::Command {
            index,
            op: command.name(),
            source,
        };
        match command {
            Command::Tool { tool } => board.set_tool(*tool),
            Command::Color { color } => board.set_color(color).map_err(wrap)?,
            Command::Width { width } => board.set_stroke_width(*width).map_err(wrap)?,
            Command::Fill { enabled } => board.set_fill_enabled(*enabled),
            Command::Resize { width, height } => {
                board.request_resize(ContainerBox::sized(*width, *height));
            }
            Command::Frame => {
                if let Some(Err(e)) = board.animation_frame() {
                    log::warn!("Resize at command {} not applied: {}", index, e);
                }
            }
            Command::Down { x, y } => {
                board.pointer_down(Point::new(*x, *y));
            }
            Command::Move { x, y } => {
                board.pointer_move(Point::new(*x, *y));
            }
            Command::Up => {
                board.pointer_up();
            }
            Command::Leave => {
                board.pointer_leave();
            }
            Command::Undo => {
                if !board.undo() {
                    log::debug!("Nothing to undo at command {}", index);
                }
            }
            Command::Redo => {
                if !board.redo() {
                    log::debug!("Nothing to redo at command {}", index);
                }
            }
            Command::Clear => {
                board.clear();
            }
        }
    }

    log::info!(
        "Replayed {} commands, history at {}/{}",
        script.commands.len(),
        board.history().cursor() + 1,
        board.history().len()
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::PhysicalSize;
    use tempfile::tempdir;

    const SCRIPT: &str = r##"{
        "width": 60,
        "height": 40,
        "device_pixel_ratio": 2,
        "commands": [
            {"op": "color", "color": "#ff0000"},
            {"op": "down", "x": 5, "y": 20},
            {"op": "move", "x": 30, "y": 20},
            {"op": "move", "x": 55, "y": 20},
            {"op": "up"},
            {"op": "tool", "tool": "circle"},
            {"op": "fill", "enabled": true},
            {"op": "down", "x": 30, "y": 20},
            {"op": "move", "x": 40, "y": 20},
            {"op": "leave"},
            {"op": "undo"}
        ]
    }"##;

    #[test]
    fn test_parse_script() {
        let script = GestureScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.commands.len(), 11);
        assert_eq!(script.commands[5], Command::Tool { tool: ToolKind::Circle });
        assert_eq!(script.commands[4], Command::Up);
    }

    #[test]
    fn test_load_script_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gesture.json");
        fs::write(&path, SCRIPT).unwrap();

        let script = GestureScript::load(&path).unwrap();
        assert_eq!(script.width, 60.0);
        assert_eq!(script.device_pixel_ratio, 2.0);
        assert_eq!(script.commands.len(), 11);
    }

    #[test]
    fn test_load_missing_script() {
        let dir = tempdir().unwrap();
        let result = GestureScript::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_replay_script() {
        let script = GestureScript::from_json(SCRIPT).unwrap();
        let board = replay(&script).unwrap();
        assert_eq!(board.physical_size(), Some(PhysicalSize::new(120, 80)));
        assert_eq!(board.history().len(), 3);
        assert!(board.can_redo());
        let pixels = board.pixels().unwrap();
        assert_eq!(pixels.pixel(60, 40), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_resize_applies_on_frame() {
        let script = GestureScript::from_json(
            r#"{"width": 10, "height": 10, "commands": [
                {"op": "resize", "width": 30, "height": 20},
                {"op": "resize", "width": 0, "height": 20},
                {"op": "frame"}
            ]}"#,
        )
        .unwrap();
        let board = replay(&script).unwrap();
        assert_eq!(board.physical_size(), Some(PhysicalSize::new(10, 10)));
    }

    #[test]
    fn test_bad_color_reports_command() {
        let script = GestureScript::from_json(
            r#"{"width": 10, "height": 10, "commands": [{"op": "up"}, {"op": "color", "color": "blue"}]}"#,
        )
        .unwrap();
        let err = replay(&script).unwrap_err();
        assert!(matches!(err, AppError::Command { index: 1, op: "color", .. }));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result = GestureScript::from_json(r#"{"width": 1, "height": 1, "commands": [{"op": "spin"}]}"#);
        assert!(matches!(result, Err(AppError::Script(_))));
    }

    #[test]
    fn test_degenerate_board_fails() {
        let script = GestureScript::from_json(r#"{"width": 0, "height": 10, "commands": []}"#).unwrap();
        assert!(matches!(replay(&script), Err(AppError::Board(BoardError::DegenerateResize { .. }))));
    }
}
