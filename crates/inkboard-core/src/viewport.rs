//! Mapping between client input coordinates, logical layout size and
//! physical raster pixels.
//!
//! Input positions arrive in client coordinates (the same space as the
//! element's on-screen bounding box). The raster lives in physical pixels,
//! which differ from layout units by the device pixel ratio.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Size in layout (CSS-like) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size that cannot back a surface (zero, negative or non-finite).
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// Size of the raster backing buffer in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Derive physical dimensions: `ceil(logical * ratio)` per axis.
    pub fn from_logical(logical: LogicalSize, device_pixel_ratio: f64) -> Self {
        let scale = |v: f64| {
            let scaled = (v * device_pixel_ratio).ceil();
            if scaled.is_finite() && scaled > 0.0 {
                scaled.min(u32::MAX as f64) as u32
            } else {
                0
            }
        };
        Self::new(scale(logical.width), scale(logical.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of an RGBA8 buffer of this size.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * 4
    }
}

/// The drawing element's on-screen layout box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBox {
    /// Top-left corner of the bounding box in client coordinates.
    pub origin: Point,
    /// Layout size of the element.
    pub size: LogicalSize,
}

impl ContainerBox {
    pub fn new(origin: Point, size: LogicalSize) -> Self {
        Self { origin, size }
    }

    /// A container positioned at the client origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(Point::ZERO, LogicalSize::new(width, height))
    }

    /// Bounding box in client coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, (self.size.width, self.size.height))
    }
}

/// Map a client-space point into physical pixel space.
///
/// `x = (client.x - bounds.x0) * (physical.width / bounds.width())`, likewise
/// for `y`. The ratio is taken from the actual buffer and layout sizes rather
/// than the nominal device pixel ratio, so the mapping stays correct after
/// rounding and CSS-driven scaling. Empty bounds map with unit scale.
pub fn to_surface_point(client: Point, bounds: Rect, physical: PhysicalSize) -> Point {
    let scale = |physical: u32, css: f64| {
        if css > 0.0 { physical as f64 / css } else { 1.0 }
    };
    Point::new(
        (client.x - bounds.x0) * scale(physical.width, bounds.width()),
        (client.y - bounds.y0) * scale(physical.height, bounds.height()),
    )
}

/// Resolved geometry of a live surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub container: ContainerBox,
    pub device_pixel_ratio: f64,
    pub physical: PhysicalSize,
}

impl SurfaceLayout {
    /// Resolve a layout, or `None` if the container cannot back a surface.
    pub fn new(container: ContainerBox, device_pixel_ratio: f64) -> Option<Self> {
        if container.size.is_degenerate() {
            return None;
        }
        let device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
        let physical = PhysicalSize::from_logical(container.size, device_pixel_ratio);
        if physical.is_empty() {
            return None;
        }
        Some(Self {
            container,
            device_pixel_ratio,
            physical,
        })
    }

    pub fn logical(&self) -> LogicalSize {
        self.container.size
    }

    /// Map a client-space point into this layout's physical pixels.
    pub fn to_surface_point(&self, client: Point) -> Point {
        to_surface_point(client, self.container.bounds(), self.physical)
    }
}

/// Clamp a reported device pixel ratio to something usable.
pub fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        log::warn!("Ignoring invalid device pixel ratio {}, using 1.0", ratio);
        1.0
    }
}

/// Coalesces bursts of resize notifications into one reallocation per
/// animation frame. Only the most recent request survives.
#[derive(Debug, Clone, Default)]
pub struct ResizeScheduler {
    pending: Option<ContainerBox>,
}

impl ResizeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resize request.
    ///
    /// Returns `true` when this is the first request since the last frame,
    /// i.e. the caller should schedule an animation frame.
    pub fn request(&mut self, container: ContainerBox) -> bool {
        let first = self.pending.is_none();
        self.pending = Some(container);
        first
    }

    /// Take the pending request at the start of an animation frame.
    pub fn take(&mut self) -> Option<ContainerBox> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_rounds_up() {
        let size = PhysicalSize::from_logical(LogicalSize::new(333.0, 100.0), 1.25);
        assert_eq!(size, PhysicalSize::new(417, 125));
    }

    #[test]
    fn test_physical_size_of_zero() {
        let size = PhysicalSize::from_logical(LogicalSize::new(0.0, 300.0), 2.0);
        assert!(size.is_empty());
    }

    #[test]
    fn test_mapping_corners_at_double_density() {
        let layout = SurfaceLayout::new(ContainerBox::sized(300.0, 300.0), 2.0).unwrap();
        assert_eq!(layout.physical, PhysicalSize::new(600, 600));

        let top_left = layout.to_surface_point(Point::new(0.0, 0.0));
        assert!(top_left.x.abs() < f64::EPSILON);
        assert!(top_left.y.abs() < f64::EPSILON);

        let bottom_right = layout.to_surface_point(Point::new(300.0, 300.0));
        assert!((bottom_right.x - 600.0).abs() < f64::EPSILON);
        assert!((bottom_right.y - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mapping_with_offset_container() {
        let container = ContainerBox::new(Point::new(40.0, 25.0), LogicalSize::new(200.0, 100.0));
        let layout = SurfaceLayout::new(container, 1.5).unwrap();

        let p = layout.to_surface_point(Point::new(140.0, 75.0));
        assert!((p.x - 150.0).abs() < 1e-9);
        assert!((p.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_mapping_with_empty_bounds() {
        let p = to_surface_point(Point::new(5.0, 7.0), Rect::ZERO, PhysicalSize::new(10, 10));
        assert!((p.x - 5.0).abs() < f64::EPSILON);
        assert!((p.y - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate_layout() {
        assert!(SurfaceLayout::new(ContainerBox::sized(0.0, 300.0), 2.0).is_none());
        assert!(SurfaceLayout::new(ContainerBox::sized(300.0, 0.0), 2.0).is_none());
        assert!(SurfaceLayout::new(ContainerBox::sized(f64::NAN, 10.0), 1.0).is_none());
    }

    #[test]
    fn test_invalid_ratio_falls_back() {
        let layout = SurfaceLayout::new(ContainerBox::sized(10.0, 10.0), 0.0).unwrap();
        assert!((layout.device_pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(layout.physical, PhysicalSize::new(10, 10));
    }

    #[test]
    fn test_resize_scheduler_coalesces() {
        let mut scheduler = ResizeScheduler::new();
        assert!(scheduler.request(ContainerBox::sized(100.0, 100.0)));
        assert!(!scheduler.request(ContainerBox::sized(120.0, 100.0)));
        assert!(!scheduler.request(ContainerBox::sized(140.0, 90.0)));

        let latest = scheduler.take().unwrap();
        assert!((latest.size.width - 140.0).abs() < f64::EPSILON);
        assert!(scheduler.take().is_none());
        assert!(!scheduler.is_pending());
    }
}
