//! In-memory surface that records draw calls.

use crate::surface::{PixelBuffer, RasterSurface, StrokeStyle, SurfaceError};
use crate::viewport::PhysicalSize;
use kurbo::{BezPath, Shape as KurboShape};
use peniko::Color;

/// Largest side the recording surface agrees to allocate.
pub const MAX_SIDE: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Stroke { width: f64, color: [u8; 4] },
    Fill { color: [u8; 4] },
    FillAll { color: [u8; 4] },
    Restore,
}

fn rgba(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// Records every call and marks one pixel per draw so snapshots differ.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: PhysicalSize,
    pixels: Vec<u8>,
    pub ops: Vec<DrawOp>,
    pub stroke_style: Option<StrokeStyle>,
}

impl RecordingSurface {
    pub fn strokes(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke { .. })).count()
    }

    pub fn fills(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Fill { .. })).count()
    }

    fn mark(&mut self, path: &BezPath, color: [u8; 4]) {
        let bounds = path.bounding_box();
        let clamp = |v: f64, max: u32| (v.max(0.0) as u32).min(max - 1);
        let x = clamp(bounds.x1, self.size.width);
        let y = clamp(bounds.y1, self.size.height);
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }
}

impl RasterSurface for RecordingSurface {
    fn allocate(size: PhysicalSize, background: Color) -> Result<Self, SurfaceError> {
        if size.is_empty() || size.width > MAX_SIDE || size.height > MAX_SIDE {
            return Err(SurfaceError::AllocationFailed {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            pixels: PixelBuffer::filled(size, background).into_data(),
            ops: Vec::new(),
            stroke_style: None,
        })
    }

    fn size(&self) -> PhysicalSize {
        self.size
    }

    fn apply_stroke_style(&mut self, style: StrokeStyle) {
        self.stroke_style = Some(style);
    }

    fn snapshot(&self) -> PixelBuffer {
        PixelBuffer::new(self.size, self.pixels.clone()).unwrap()
    }

    fn restore(&mut self, buffer: &PixelBuffer) -> Result<(), SurfaceError> {
        if buffer.size() != self.size {
            return Err(SurfaceError::size_mismatch(self.size, buffer.size()));
        }
        self.pixels.copy_from_slice(buffer.data());
        self.ops.push(DrawOp::Restore);
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        let color = rgba(color);
        self.ops.push(DrawOp::Stroke { width, color });
        self.mark(path, color);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let color = rgba(color);
        self.ops.push(DrawOp::Fill { color });
        self.mark(path, color);
    }

    fn fill_all(&mut self, color: Color) {
        let color = rgba(color);
        self.ops.push(DrawOp::FillAll { color });
        self.pixels = PixelBuffer::filled(self.size, Color::from_rgba8(color[0], color[1], color[2], color[3])).into_data();
    }
}
