//! Inkline Core Library
//!
//! Platform-agnostic freehand-annotation engine: turns raw pointer/touch/
//! stylus samples into persisted vector strokes, erases by spatial
//! proximity, classifies scratch gestures, and lets a closed-loop gesture
//! select and drag groups of strokes. The rendering surface, timers, and the
//! authoritative path list are all owned by the host and reached through the
//! [`surface::DrawSurface`], [`host::Scheduler`], and [`host::EngineHost`]
//! contracts.

pub mod capture;
pub mod config;
pub mod engine;
pub mod eraser;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod lasso;
pub mod path;
pub mod surface;

pub use config::{ConfigError, EngineConfig};
pub use engine::{InkEngine, PointerSource};
pub use host::{EngineHost, Scheduler, TimerId};
pub use lasso::{LassoSelector, SelectionState};
pub use path::{DrawingPath, PathId, Rgba, ToolKind};
pub use surface::DrawSurface;
