//! The drawing board: one surface, its history, and the pointer controller.

use crate::color::RgbColor;
use crate::config::{BoardConfig, ConfigError};
use crate::export::{ExportError, encode_png};
use crate::history::HistoryStore;
use crate::interaction::{InteractionController, InteractionState, PaintContext};
use crate::surface::{PixelBuffer, RasterSurface, StrokeStyle, SurfaceError};
use crate::tools::{ToolConfig, ToolKind, validate_stroke_width};
use crate::viewport::{ContainerBox, PhysicalSize, ResizeScheduler, SurfaceLayout, sanitize_ratio};
use kurbo::Point;
use peniko::Color;
use thiserror::Error;

/// Board errors.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("No drawing surface is available")]
    SurfaceUnavailable,
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Ignored resize to degenerate size {width}x{height}")]
    DegenerateResize { width: f64, height: f64 },
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A drawing engine instance.
///
/// Owns the raster surface and its history exclusively. All mutation goes
/// through pointer events and commands; with no surface (never sized, or
/// allocation failed) every operation is a no-op until a resize succeeds.
#[derive(Debug)]
pub struct DrawingBoard<S: RasterSurface> {
    config: BoardConfig,
    tool: ToolConfig,
    device_pixel_ratio: f64,
    layout: Option<SurfaceLayout>,
    surface: Option<S>,
    history: HistoryStore,
    controller: InteractionController,
    resize: ResizeScheduler,
    stroke_style: StrokeStyle,
}

impl<S: RasterSurface> DrawingBoard<S> {
    /// Create a board sized to `container`.
    ///
    /// A degenerate container or failed allocation leaves the board without
    /// a surface; check [`Self::is_available`] or use [`Self::try_new`].
    pub fn new(container: ContainerBox, device_pixel_ratio: f64, mut config: BoardConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Invalid default tool, using defaults: {}", e);
            config.default_tool = ToolConfig::default();
        }
        let mut board = Self::empty(device_pixel_ratio, config);
        if let Err(e) = board.resize(container) {
            log::warn!("Drawing board created without a surface: {}", e);
        }
        board
    }

    /// Create a board, failing if no surface could be allocated.
    pub fn try_new(container: ContainerBox, device_pixel_ratio: f64, config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let mut board = Self::empty(device_pixel_ratio, config);
        board.resize(container)?;
        Ok(board)
    }

    fn empty(device_pixel_ratio: f64, config: BoardConfig) -> Self {
        Self {
            tool: config.default_tool.clone(),
            history: HistoryStore::with_limit(config.history_limit),
            config,
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
            layout: None,
            surface: None,
            controller: InteractionController::new(),
            resize: ResizeScheduler::new(),
            stroke_style: StrokeStyle::default(),
        }
    }

    // --- Layout ---

    /// Resize immediately.
    ///
    /// Zero-sized containers are rejected and leave the current surface and
    /// history untouched. A resize that keeps the physical size only moves
    /// the input mapping; otherwise the surface is reallocated blank and the
    /// history restarts from it.
    pub fn resize(&mut self, container: ContainerBox) -> Result<PhysicalSize, BoardError> {
        let Some(layout) = SurfaceLayout::new(container, self.device_pixel_ratio) else {
            log::warn!(
                "Ignoring degenerate resize to {}x{}",
                container.size.width,
                container.size.height
            );
            return Err(BoardError::DegenerateResize {
                width: container.size.width,
                height: container.size.height,
            });
        };

        if let (Some(current), Some(_)) = (self.layout, self.surface.as_ref()) {
            if current.physical == layout.physical {
                self.layout = Some(layout);
                return Ok(layout.physical);
            }
        }

        if self.controller.abandon().is_some() {
            log::debug!("Resize discarded an in-progress gesture");
        }

        match S::allocate(layout.physical, self.background()) {
            Ok(mut surface) => {
                surface.apply_stroke_style(self.stroke_style);
                self.history.reset(surface.snapshot());
                self.surface = Some(surface);
                self.layout = Some(layout);
                log::info!(
                    "Surface resized to {}x{} ({}x{} at {}x)",
                    layout.physical.width,
                    layout.physical.height,
                    container.size.width,
                    container.size.height,
                    layout.device_pixel_ratio
                );
                Ok(layout.physical)
            }
            Err(e) => {
                log::error!("Surface allocation failed: {}", e);
                self.surface = None;
                self.layout = None;
                self.history.clear();
                Err(e.into())
            }
        }
    }

    /// Queue a resize for the next animation frame.
    ///
    /// Returns `true` if the caller should schedule a frame (no resize was
    /// already pending).
    pub fn request_resize(&mut self, container: ContainerBox) -> bool {
        self.resize.request(container)
    }

    /// Apply the latest queued resize, if any.
    pub fn animation_frame(&mut self) -> Option<Result<PhysicalSize, BoardError>> {
        let container = self.resize.take()?;
        Some(self.resize(container))
    }

    /// Record a new device pixel ratio and queue a resize to apply it.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) -> bool {
        self.device_pixel_ratio = sanitize_ratio(ratio);
        match self.layout {
            Some(layout) => self.request_resize(layout.container),
            None => false,
        }
    }

    // --- Tool configuration ---

    pub fn tool_config(&self) -> &ToolConfig {
        &self.tool
    }

    /// Replace the tool configuration used by the next gesture.
    pub fn set_tool_config(&mut self, config: ToolConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.tool = config;
        Ok(())
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool.tool = tool;
    }

    /// Set the drawing color from a hex string such as `#ff0000`.
    pub fn set_color(&mut self, hex: &str) -> Result<(), ConfigError> {
        self.tool.color = RgbColor::from_hex(hex).inspect_err(|e| log::warn!("{}", e))?;
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), ConfigError> {
        validate_stroke_width(width).inspect_err(|e| log::warn!("{}", e))?;
        self.tool.stroke_width = width;
        Ok(())
    }

    pub fn set_fill_enabled(&mut self, fill_enabled: bool) {
        self.tool.fill_enabled = fill_enabled;
    }

    // --- Pointer input ---

    /// Start a gesture at a client-space point.
    pub fn pointer_down(&mut self, client: Point) -> bool {
        let paint = self.paint_context();
        let (Some(surface), Some(layout)) = (self.surface.as_ref(), self.layout.as_ref()) else {
            return false;
        };
        let point = layout.to_surface_point(client);
        self.controller.pointer_down(surface, point, &self.tool, paint)
    }

    /// Continue the gesture; ignored while idle.
    pub fn pointer_move(&mut self, client: Point) -> bool {
        let (Some(surface), Some(layout)) = (self.surface.as_mut(), self.layout.as_ref()) else {
            return false;
        };
        let point = layout.to_surface_point(client);
        self.controller.pointer_move(surface, point)
    }

    /// Finish and commit the gesture.
    pub fn pointer_up(&mut self) -> bool {
        match self.surface.as_ref() {
            Some(surface) => self.controller.pointer_up(surface, &mut self.history),
            None => false,
        }
    }

    /// The pointer left the surface: commits like [`Self::pointer_up`].
    pub fn pointer_leave(&mut self) -> bool {
        match self.surface.as_ref() {
            Some(surface) => self.controller.pointer_leave(surface, &mut self.history),
            None => false,
        }
    }

    // --- Commands ---

    /// Step back one committed state. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.pointer_up();
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.undo() {
            Some(buffer) => restore(surface, buffer),
            None => false,
        }
    }

    /// Step forward one undone state. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.pointer_up();
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.redo() {
            Some(buffer) => restore(surface, buffer),
            None => false,
        }
    }

    /// Paint the whole surface with the background and commit it.
    pub fn clear(&mut self) -> bool {
        self.pointer_up();
        let background = self.background();
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        surface.fill_all(background);
        self.history.push(surface.snapshot());
        log::info!("Surface cleared");
        true
    }

    /// Encode the surface as PNG.
    ///
    /// During a gesture the last committed state is exported, so a
    /// half-drawn preview never ends up in the image.
    pub fn export_png(&self) -> Result<Vec<u8>, BoardError> {
        let surface = self.surface.as_ref().ok_or(BoardError::SurfaceUnavailable)?;
        let encoded = match self.history.current() {
            Some(committed) if self.controller.is_active() => encode_png(committed),
            _ => encode_png(&surface.snapshot()),
        };
        match encoded {
            Ok(bytes) => {
                let size = surface.size();
                log::info!("Exported {}x{} PNG ({} bytes)", size.width, size.height, bytes.len());
                Ok(bytes)
            }
            Err(e) => {
                log::error!("PNG export failed: {}", e);
                Err(e.into())
            }
        }
    }

    // --- State ---

    pub fn is_available(&self) -> bool {
        self.surface.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.surface.is_some() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.surface.is_some() && self.history.can_redo()
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn layout(&self) -> Option<&SurfaceLayout> {
        self.layout.as_ref()
    }

    pub fn physical_size(&self) -> Option<PhysicalSize> {
        self.layout.map(|l| l.physical)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Copy of the displayed pixels.
    pub fn pixels(&self) -> Option<PixelBuffer> {
        self.surface.as_ref().map(S::snapshot)
    }

    fn background(&self) -> Color {
        self.config.background_color.into()
    }

    fn paint_context(&self) -> PaintContext {
        let width_scale = match self.layout {
            Some(layout) if self.config.scale_stroke_width => layout.device_pixel_ratio,
            _ => 1.0,
        };
        PaintContext {
            background: self.background(),
            width_scale,
        }
    }
}

fn restore<S: RasterSurface>(surface: &mut S, buffer: &PixelBuffer) -> bool {
    match surface.restore(buffer) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to restore history entry: {}", e);
            false
        }
    }
}
