//! Inkboard Render Library
//!
//! CPU raster surface for the Inkboard drawing engine, built on tiny-skia.

mod pixmap;

pub use pixmap::PixmapSurface;

/// A drawing board rendering into an in-memory pixmap.
pub type PixmapBoard = inkboard_core::DrawingBoard<PixmapSurface>;
