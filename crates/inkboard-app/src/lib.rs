//! Inkboard Application
//!
//! Replays recorded gesture scripts against a pixmap-backed drawing board.

mod script;

pub use script::{AppError, Command, GestureScript, replay};
