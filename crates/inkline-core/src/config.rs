//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::Rgba;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("selection ratio must be within (0, 1], got {0}")]
    SelectionRatio(f64),
    #[error("loop closure distance must be positive, got {0}")]
    ClosureDistance(f64),
    #[error("eraser radius must be positive, got {0}")]
    EraserRadius(f64),
    #[error("{0} duration must be non-zero")]
    ZeroDuration(&'static str),
}

/// Tunable engine parameters.
///
/// Distances suffixed "pixels" are in surface-pixel space; the rest are in
/// normalized units (fractions of the surface dimensions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stroke color applied to newly captured paths.
    pub stroke_color: Rgba,
    /// Stroke width applied to newly captured paths, pixels.
    pub stroke_width: f64,
    /// Eraser hit radius, pixels.
    pub eraser_radius: f64,
    /// Hold time before a press over a stroke arms the lasso.
    pub long_press: Duration,
    /// Idle time after which an active selection dissolves.
    pub inactivity_timeout: Duration,
    /// Max distance between a loop's first and last point for it to count as
    /// closed.
    pub closure_distance: f64,
    /// Fraction of a path's points that must fall inside the loop for the
    /// path to be selected.
    pub selection_ratio: f64,
    /// Classify scratch-shaped strokes as delete gestures instead of ink.
    pub scratch_detection: bool,
    /// Segments shorter than this are skipped when sampling scratch
    /// directions.
    pub noise_floor: f64,
    /// Batched samples closer than this to the last buffered point are
    /// dropped, pixels.
    pub batch_min_distance: f64,
    /// Single-sample gaps longer than this are filled with synthetic
    /// interpolated points, pixels.
    pub interpolation_gap: f64,
    /// Upper bound on synthetic points inserted per gap.
    pub max_interpolated: usize,
    /// Window during which a duplicate finalize signal is swallowed.
    pub finish_debounce: Duration,
    /// Press-point hit radius for lasso arming, pixels.
    pub lasso_hit_radius: f64,
    /// Pointer travel that cancels an armed long-press, pixels.
    pub lasso_move_threshold: f64,
    /// Minimum number of points for a stroke to qualify as a loop.
    pub min_loop_points: usize,
    /// Margin added around the selection bounding box when deciding whether
    /// a press lands inside the selection.
    pub selection_margin: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::black(),
            stroke_width: 2.0,
            eraser_radius: 12.0,
            long_press: Duration::from_millis(1000),
            inactivity_timeout: Duration::from_millis(3000),
            closure_distance: 0.05,
            selection_ratio: 0.5,
            scratch_detection: true,
            noise_floor: 0.001,
            batch_min_distance: 1.0,
            interpolation_gap: 5.0,
            max_interpolated: 10,
            finish_debounce: Duration::from_millis(50),
            lasso_hit_radius: 12.0,
            lasso_move_threshold: 8.0,
            min_loop_points: 10,
            selection_margin: 0.02,
        }
    }
}

impl EngineConfig {
    /// Check the parameters a host is most likely to get wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.selection_ratio > 0.0 && self.selection_ratio <= 1.0) {
            return Err(ConfigError::SelectionRatio(self.selection_ratio));
        }
        if self.closure_distance <= 0.0 {
            return Err(ConfigError::ClosureDistance(self.closure_distance));
        }
        if self.eraser_radius <= 0.0 {
            return Err(ConfigError::EraserRadius(self.eraser_radius));
        }
        if self.long_press.is_zero() {
            return Err(ConfigError::ZeroDuration("long press"));
        }
        if self.inactivity_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("inactivity timeout"));
        }
        Ok(())
    }
}
