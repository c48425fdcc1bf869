//! Inkboard Core Library
//!
//! Platform-agnostic drawing engine: coordinate mapping, shape geometry,
//! snapshot history and the pointer interaction state machine.

pub mod board;
pub mod color;
pub mod config;
pub mod export;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod surface;
pub mod tools;
pub mod viewport;

#[cfg(test)]
pub(crate) mod testing;

pub use board::{BoardError, DrawingBoard};
pub use color::RgbColor;
pub use config::{BoardConfig, ConfigError};
pub use export::{ExportError, encode_png};
pub use geometry::{Outline, ShapeKind, outline};
pub use history::HistoryStore;
pub use interaction::{DrawSession, InteractionController, InteractionState, PaintContext};
pub use surface::{LineCap, LineJoin, PixelBuffer, RasterSurface, StrokeStyle, SurfaceError};
pub use tools::{ToolConfig, ToolKind};
pub use viewport::{ContainerBox, LogicalSize, PhysicalSize, ResizeScheduler, SurfaceLayout};
