//! Pointer interaction state machine.
//!
//! Freehand tools stroke each new segment as the pointer moves. Shape tools
//! keep a scratch copy of the surface taken at pointer-down and restore it
//! before every preview, so only the latest outline is ever visible.

use crate::geometry::{ShapeKind, outline};
use crate::history::HistoryStore;
use crate::surface::{PixelBuffer, RasterSurface};
use crate::tools::{ToolConfig, ToolKind};
use kurbo::{BezPath, Point};
use peniko::Color;

/// State of the pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No gesture in progress; pointer moves are ignored.
    #[default]
    Idle,
    /// Brush or eraser stroke in progress.
    FreehandDrawing,
    /// Parametric shape being previewed.
    ShapePreviewing,
}

/// Paint values resolved by the board when a gesture starts.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext {
    /// Surface background (what the eraser paints).
    pub background: Color,
    /// Factor from configured stroke width to physical pixels.
    pub width_scale: f64,
}

impl Default for PaintContext {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(255, 255, 255, 255),
            width_scale: 1.0,
        }
    }
}

/// One pointer-down to pointer-up interaction.
#[derive(Debug, Clone)]
pub struct DrawSession {
    config: ToolConfig,
    shape: Option<ShapeKind>,
    origin: Point,
    last: Point,
    stroke: BezPath,
    stroke_color: Color,
    stroke_width: f64,
    scratch: Option<PixelBuffer>,
}

impl DrawSession {
    pub fn tool(&self) -> ToolKind {
        self.config.tool
    }

    /// Tool configuration captured at pointer-down.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Point where the gesture started, in physical pixels.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Most recent pointer position.
    pub fn last_point(&self) -> Point {
        self.last
    }

    /// Freehand path accumulated so far (empty for shapes).
    pub fn path(&self) -> &BezPath {
        &self.stroke
    }

    /// Surface contents at pointer-down, for shape tools.
    pub fn scratch_snapshot(&self) -> Option<&PixelBuffer> {
        self.scratch.as_ref()
    }

    /// Stroke width in physical pixels.
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn state(&self) -> InteractionState {
        if self.shape.is_some() {
            InteractionState::ShapePreviewing
        } else {
            InteractionState::FreehandDrawing
        }
    }
}

/// Drives a surface from pointer events.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    session: Option<DrawSession>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.session
            .as_ref()
            .map_or(InteractionState::Idle, DrawSession::state)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DrawSession> {
        self.session.as_ref()
    }

    /// Start a gesture at `point` (physical pixels).
    ///
    /// Returns `false` if a gesture is already in progress.
    pub fn pointer_down<S: RasterSurface>(
        &mut self,
        surface: &S,
        point: Point,
        config: &ToolConfig,
        paint: PaintContext,
    ) -> bool {
        if self.session.is_some() {
            log::debug!("Ignoring pointer down during an active gesture");
            return false;
        }

        let shape = config.tool.shape();
        let mut stroke = BezPath::new();
        let scratch = match shape {
            Some(_) => Some(surface.snapshot()),
            None => {
                stroke.move_to(point);
                None
            }
        };

        log::debug!("Gesture started: {} at ({:.1}, {:.1})", config.tool, point.x, point.y);
        self.session = Some(DrawSession {
            config: config.clone(),
            shape,
            origin: point,
            last: point,
            stroke,
            stroke_color: config.stroke_color(paint.background),
            stroke_width: config.stroke_width * paint.width_scale,
            scratch,
        });
        true
    }

    /// Continue the gesture to `point`. Returns `true` if anything was drawn.
    pub fn pointer_move<S: RasterSurface>(&mut self, surface: &mut S, point: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match (session.shape, session.scratch.as_ref()) {
            (Some(kind), Some(scratch)) => {
                if let Err(e) = surface.restore(scratch) {
                    log::error!("Failed to restore scratch buffer for preview: {}", e);
                    return false;
                }
                let shape = outline(kind, session.origin, point);
                if session.config.fills(kind) {
                    surface.fill_path(&shape.path, session.config.color.into());
                }
                surface.stroke_path(&shape.path, session.stroke_color, session.stroke_width);
            }
            _ => {
                // Only the newest segment is stroked; earlier ones are already on the surface.
                let mut segment = BezPath::new();
                segment.move_to(session.last);
                segment.line_to(point);
                surface.stroke_path(&segment, session.stroke_color, session.stroke_width);
                session.stroke.line_to(point);
            }
        }
        session.last = point;
        true
    }

    /// End the gesture and commit the surface into `history`.
    ///
    /// Returns `false` when no gesture was active.
    pub fn pointer_up<S: RasterSurface>(&mut self, surface: &S, history: &mut HistoryStore) -> bool {
        match self.session.take() {
            Some(session) => {
                history.push(surface.snapshot());
                log::debug!(
                    "Gesture committed: {} (history {}/{})",
                    session.tool(),
                    history.cursor() + 1,
                    history.len()
                );
                true
            }
            None => false,
        }
    }

    /// The pointer left the surface. Commits exactly like [`Self::pointer_up`].
    pub fn pointer_leave<S: RasterSurface>(&mut self, surface: &S, history: &mut HistoryStore) -> bool {
        self.pointer_up(surface, history)
    }

    /// Drop the current gesture without committing it.
    pub fn abandon(&mut self) -> Option<DrawSession> {
        self.session.take()
    }
}
