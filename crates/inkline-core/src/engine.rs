//! Per-surface engine facade: tool routing and gesture arbitration.

use kurbo::Point;

use crate::capture::{self, StrokeCapture};
use crate::config::{ConfigError, EngineConfig};
use crate::eraser::Eraser;
use crate::gesture;
use crate::host::{EngineHost, Scheduler, TimerId};
use crate::lasso::{LassoSelector, SelectionState};
use crate::path::{DrawingPath, ToolKind};
use crate::surface::DrawSurface;

/// Input capability that produced a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
    Stylus,
}

/// One engine instance per drawing surface.
///
/// Owns the stroke capture buffer, the eraser, the lasso selector, and the
/// configuration; there is no global or module state, so surfaces operate
/// independently. The host forwards pointer events (surface-pixel space) and
/// timer firings, and receives results exclusively through the
/// [`EngineHost`] callbacks. The host-owned path list is passed into each
/// call that needs it; the engine never keeps a reference to it between
/// calls.
#[derive(Debug, Default)]
pub struct InkEngine {
    pub config: EngineConfig,
    tool: ToolKind,
    capture: StrokeCapture,
    eraser: Eraser,
    lasso: LassoSelector,
}

impl InkEngine {
    /// Create an engine after validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(
        &mut self,
        tool: ToolKind,
        paths: &[DrawingPath],
        surface: Option<&mut dyn DrawSurface>,
        sched: &mut dyn Scheduler,
    ) {
        if tool == self.tool {
            return;
        }
        self.cancel_stroke(paths, surface);
        self.lasso.detach(sched);
        self.eraser.reset();
        self.tool = tool;
    }

    /// Current selection, if the lasso is active.
    pub fn selection(&self) -> Option<&SelectionState> {
        self.lasso.selection()
    }

    /// Handle a pointer-down event.
    pub fn pointer_down(
        &mut self,
        raw: Point,
        source: PointerSource,
        paths: &[DrawingPath],
        surface: Option<&mut dyn DrawSurface>,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        match self.tool {
            ToolKind::Eraser => {
                self.erase_at(raw, paths, surface, host);
            }
            ToolKind::Pen => {
                if self.lasso.is_active() {
                    let size = surface.as_deref().map(|s| s.size());
                    if let Some(size) = size {
                        if self.lasso.press_active(raw, size, &self.config, sched) {
                            // Press landed inside the selection: it drags,
                            // it does not draw.
                            return;
                        }
                        // Press outside the selection is the clear request;
                        // the stroke then starts on the updated list.
                        self.lasso.clear(paths, sched, host);
                    }
                } else if let Some(size) = surface.as_deref().map(|s| s.size()) {
                    self.lasso
                        .observe_down(raw, paths, size, &self.config, sched);
                }
                log::trace!("pen down ({source:?})");
                self.capture.start(
                    raw,
                    surface,
                    self.config.stroke_color,
                    self.config.stroke_width,
                );
            }
        }
    }

    /// Handle a single-sample pointer movement (mouse-rate input).
    pub fn pointer_move(
        &mut self,
        raw: Point,
        paths: &[DrawingPath],
        surface: Option<&mut dyn DrawSurface>,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        match self.tool {
            ToolKind::Eraser => {
                self.erase_at(raw, paths, surface, host);
            }
            ToolKind::Pen => {
                if self.lasso.is_dragging() {
                    if let Some(size) = surface.as_deref().map(|s| s.size()) {
                        self.lasso
                            .drag(raw, paths, size, &self.config, sched, host);
                    }
                    return;
                }
                self.lasso.observe_move(raw, &self.config, sched);
                self.capture.append(raw, surface, &self.config);
            }
        }
    }

    /// Handle a coalesced batch of samples, in their original temporal
    /// order.
    pub fn pointer_batch<'s>(
        &mut self,
        raws: &[Point],
        paths: &[DrawingPath],
        mut surface: Option<&'s mut (dyn DrawSurface + 's)>,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        if raws.is_empty() {
            return;
        }
        match self.tool {
            ToolKind::Eraser => {
                for &raw in raws {
                    self.erase_at(raw, paths, surface.as_deref_mut(), host);
                }
            }
            ToolKind::Pen => {
                if self.lasso.is_dragging() {
                    if let Some(size) = surface.as_deref().map(|s| s.size()) {
                        for &raw in raws {
                            self.lasso
                                .drag(raw, paths, size, &self.config, sched, host);
                        }
                    }
                    return;
                }
                for &raw in raws {
                    self.lasso.observe_move(raw, &self.config, sched);
                }
                self.capture.append_batch(raws, surface, &self.config);
            }
        }
    }

    /// Handle a pointer-up event.
    pub fn pointer_up(
        &mut self,
        paths: &[DrawingPath],
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        match self.tool {
            ToolKind::Eraser => {
                self.eraser.reset();
            }
            ToolKind::Pen => {
                if self.lasso.is_dragging() {
                    self.lasso.end_drag(paths);
                    return;
                }
                self.lasso.observe_up(sched);

                let Some(path) = self.capture.finish(sched.now(), &self.config) else {
                    return;
                };
                if self.config.scratch_detection
                    && gesture::is_scratch_pattern(&path.points, self.config.noise_floor)
                {
                    log::debug!("stroke classified as scratch gesture");
                    host.on_scratch_complete(path);
                } else {
                    host.on_path_complete(path);
                }
            }
        }
    }

    /// Handle an elapsed timer.
    ///
    /// Firings for timers the engine has since cancelled are harmless; every
    /// branch re-checks machine state before acting.
    pub fn timer_fired(
        &mut self,
        id: TimerId,
        paths: &[DrawingPath],
        surface: Option<&mut dyn DrawSurface>,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        match id {
            TimerId::LongPress => {
                if self.lasso.long_press_fired(paths, &self.config, sched, host) {
                    // Selection preempts the stroke that was being drawn
                    // with the same press: discard it and restore the
                    // surface to the persisted paths.
                    self.cancel_stroke(paths, surface);
                }
            }
            TimerId::Inactivity => {
                self.lasso.inactivity_fired(paths, sched, host);
            }
        }
    }

    /// Discard the in-progress stroke and wipe its partial rendering.
    pub fn cancel_stroke(
        &mut self,
        paths: &[DrawingPath],
        surface: Option<&mut dyn DrawSurface>,
    ) {
        if self.capture.cancel() {
            if let Some(surface) = surface {
                capture::render_all(paths, surface);
            }
        }
    }

    /// Host-issued clear of the active selection (no-op when none).
    pub fn clear_selection(
        &mut self,
        paths: &[DrawingPath],
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        self.lasso.clear(paths, sched, host);
    }

    /// Re-render the full path list; call whenever the host list changes.
    pub fn render_all(&self, paths: &[DrawingPath], surface: Option<&mut dyn DrawSurface>) {
        if let Some(surface) = surface {
            capture::render_all(paths, surface);
        }
    }

    /// Detach from the surface: cancel pending timers, drop all buffers.
    pub fn detach(&mut self, sched: &mut dyn Scheduler) {
        self.capture.cancel();
        self.lasso.detach(sched);
        self.eraser.reset();
    }

    fn erase_at<'s>(
        &mut self,
        raw: Point,
        paths: &[DrawingPath],
        surface: Option<&mut (dyn DrawSurface + 's)>,
        host: &mut dyn EngineHost,
    ) {
        let Some(surface) = surface else { return };
        let size = surface.size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        if let Some(next) = self
            .eraser
            .erase(raw, self.config.eraser_radius, paths, size)
        {
            host.on_paths_change(next);
        }
    }
}
