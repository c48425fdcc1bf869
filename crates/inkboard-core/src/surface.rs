//! Raster surface abstraction.
//!
//! The engine draws through [`RasterSurface`] so the interaction logic stays
//! independent of the rasterizer backing it.

use crate::viewport::PhysicalSize;
use kurbo::BezPath;
use peniko::Color;
use std::fmt;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface allocation failed for {width}x{height}")]
    AllocationFailed { width: u32, height: u32 },
    #[error("Pixel buffer is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("Pixel data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
}

impl SurfaceError {
    pub fn size_mismatch(expected: PhysicalSize, actual: PhysicalSize) -> Self {
        SurfaceError::SizeMismatch {
            expected_width: expected.width,
            expected_height: expected.height,
            actual_width: actual.width,
            actual_height: actual.height,
        }
    }
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Stroke corner join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Stroke state that a surface keeps between draw calls.
///
/// Reallocating a surface resets it, so it is reapplied after every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeStyle {
    pub cap: LineCap,
    pub join: LineJoin,
}

/// A full copy of a surface's pixels: row-major premultiplied RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: PhysicalSize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw premultiplied RGBA8 data.
    pub fn new(size: PhysicalSize, data: Vec<u8>) -> Result<Self, SurfaceError> {
        if data.len() != size.byte_len() {
            return Err(SurfaceError::DataLength {
                expected: size.byte_len(),
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// Wrap raw premultiplied RGBA8 data, zero-padding or truncating it to
    /// exactly fit `size`.
    pub fn from_raw(size: PhysicalSize, mut data: Vec<u8>) -> Self {
        data.resize(size.byte_len(), 0);
        Self { size, data }
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(size: PhysicalSize, color: Color) -> Self {
        let pixel = premultiply(color);
        let data = pixel.iter().copied().cycle().take(size.byte_len()).collect();
        Self { size, data }
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn premultiply(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    let scale = |c: u8| ((c as u16 * rgba.a as u16 + 127) / 255) as u8;
    [scale(rgba.r), scale(rgba.g), scale(rgba.b), rgba.a]
}

/// Trait for raster backends the engine draws into.
///
/// Coordinates are physical pixels with no transform applied.
pub trait RasterSurface {
    /// Allocate a surface of `size`, filled with `background`.
    fn allocate(size: PhysicalSize, background: Color) -> Result<Self, SurfaceError>
    where
        Self: Sized;

    fn size(&self) -> PhysicalSize;

    /// Set the cap/join state used by subsequent strokes.
    fn apply_stroke_style(&mut self, style: StrokeStyle);

    /// Copy the current pixels.
    fn snapshot(&self) -> PixelBuffer;

    /// Overwrite the pixels with `buffer`, which must match the surface size.
    fn restore(&mut self, buffer: &PixelBuffer) -> Result<(), SurfaceError>;

    /// Stroke `path` with the given color and width in physical pixels.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);

    /// Fill the interior of `path` (non-zero winding).
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Paint every pixel with `color`.
    fn fill_all(&mut self, color: Color);
}
