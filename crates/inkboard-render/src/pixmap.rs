//! CPU raster surface backed by a tiny-skia [`Pixmap`].

use inkboard_core::{LineCap, LineJoin, PhysicalSize, PixelBuffer, RasterSurface, StrokeStyle, SurfaceError};
use kurbo::{BezPath, PathEl};
use peniko::Color;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Raster surface drawing into an in-memory premultiplied RGBA8 pixmap.
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
    stroke_style: StrokeStyle,
}

impl PixmapSurface {
    fn stroke(&self, width: f64) -> Stroke {
        Stroke {
            width: width as f32,
            line_cap: match self.stroke_style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.stroke_style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Stroke::default()
        }
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn paint(color: Color) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

/// Convert a kurbo path into a tiny-skia path.
///
/// Returns `None` for paths tiny-skia cannot represent (empty or with
/// non-finite bounds).
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

impl RasterSurface for PixmapSurface {
    fn allocate(size: PhysicalSize, background: Color) -> Result<Self, SurfaceError> {
        let mut pixmap = Pixmap::new(size.width, size.height).ok_or(SurfaceError::AllocationFailed {
            width: size.width,
            height: size.height,
        })?;
        pixmap.fill(skia_color(background));
        Ok(Self {
            pixmap,
            stroke_style: StrokeStyle::default(),
        })
    }

    fn size(&self) -> PhysicalSize {
        PhysicalSize::new(self.pixmap.width(), self.pixmap.height())
    }

    fn apply_stroke_style(&mut self, style: StrokeStyle) {
        self.stroke_style = style;
    }

    fn snapshot(&self) -> PixelBuffer {
        PixelBuffer::from_raw(self.size(), self.pixmap.data().to_vec())
    }

    fn restore(&mut self, buffer: &PixelBuffer) -> Result<(), SurfaceError> {
        let size = self.size();
        if buffer.size() != size {
            return Err(SurfaceError::size_mismatch(size, buffer.size()));
        }
        self.pixmap.data_mut().copy_from_slice(buffer.data());
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        let Some(skia_path) = to_skia_path(path) else {
            log::debug!("Skipping stroke of an empty path");
            return;
        };
        let stroke = self.stroke(width);
        self.pixmap
            .stroke_path(&skia_path, &paint(color), &stroke, Transform::identity(), None);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let Some(skia_path) = to_skia_path(path) else {
            log::debug!("Skipping fill of an empty path");
            return;
        };
        self.pixmap
            .fill_path(&skia_path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }

    fn fill_all(&mut self, color: Color) {
        self.pixmap.fill(skia_color(color));
    }
}
