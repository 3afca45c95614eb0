//! Lasso selection: long-press arming, loop detection, drag transform.

use kurbo::{Point, Rect, Size};

use crate::config::EngineConfig;
use crate::geometry;
use crate::host::{EngineHost, Scheduler, TimerId};
use crate::path::{self, DrawingPath};

/// Bookkeeping for an active selection.
#[derive(Debug, Clone)]
pub struct SelectionState {
    /// Index of the loop stroke in the host list.
    pub lasso_index: usize,
    /// Indices of the selected paths, ascending.
    pub selected: Vec<usize>,
    /// Bounding box of the selected paths, normalized. Derived; recomputed
    /// from current positions at activation and after each drag ends.
    pub bounds: Rect,
    pub is_dragging: bool,
    /// Pointer position the current drag is measured from, normalized.
    pub drag_start: Point,
    /// Pre-drag coordinates of the loop stroke and every selected path.
    /// Never mutated during a drag, so repeated drag calls stay relative to
    /// a stable origin.
    snapshot: Vec<(usize, Vec<Point>)>,
}

#[derive(Debug, Default)]
enum LassoState {
    #[default]
    Idle,
    Armed {
        /// Press point in surface pixels, for the movement-threshold check.
        press_raw: Point,
        /// Press point normalized, the origin of the initial drag.
        press_norm: Point,
        /// Index of the path under the press.
        hit_index: usize,
    },
    Active(SelectionState),
}

/// Lasso state machine: `Idle -> Armed -> Active -> Idle`.
///
/// The selector observes the pointer stream the capture engine is also
/// consuming; only on activation does it preempt drawing (the engine
/// handles that hand-off).
#[derive(Debug, Default)]
pub struct LassoSelector {
    state: LassoState,
}

impl LassoSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, LassoState::Armed { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LassoState::Active(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(&self.state, LassoState::Active(sel) if sel.is_dragging)
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        match &self.state {
            LassoState::Active(sel) => Some(sel),
            _ => None,
        }
    }

    /// Observe a pointer-down: if it lands on an existing stroke, arm the
    /// long-press.
    pub fn observe_down(
        &mut self,
        raw: Point,
        paths: &[DrawingPath],
        size: Size,
        config: &EngineConfig,
        sched: &mut dyn Scheduler,
    ) {
        if !matches!(self.state, LassoState::Idle) {
            return;
        }

        let hit = paths
            .iter()
            .position(|p| p.hit_test(raw, config.lasso_hit_radius, size));
        if let Some(hit_index) = hit {
            self.state = LassoState::Armed {
                press_raw: raw,
                press_norm: path::normalize_point(raw, size),
                hit_index,
            };
            sched.schedule(TimerId::LongPress, config.long_press);
            log::debug!("lasso armed over path {hit_index}");
        }
    }

    /// Observe pointer movement while armed: travel beyond the threshold
    /// cancels the long-press with no side effects.
    pub fn observe_move(&mut self, raw: Point, config: &EngineConfig, sched: &mut dyn Scheduler) {
        if let LassoState::Armed { press_raw, .. } = self.state {
            if press_raw.distance(raw) > config.lasso_move_threshold {
                sched.cancel(TimerId::LongPress);
                self.state = LassoState::Idle;
                log::trace!("long-press cancelled by movement");
            }
        }
    }

    /// Observe a pointer-up while armed: the press ended before the timer.
    pub fn observe_up(&mut self, sched: &mut dyn Scheduler) {
        if self.is_armed() {
            sched.cancel(TimerId::LongPress);
            self.state = LassoState::Idle;
        }
    }

    /// The long-press timer elapsed: try to activate a selection.
    ///
    /// The pressed stroke must re-check as a closed loop, and the loop must
    /// enclose at least one other path; otherwise the machine falls back to
    /// idle and the press stays an ordinary drawing gesture. Returns whether
    /// selection activated (the caller preempts stroke capture if so).
    pub fn long_press_fired(
        &mut self,
        paths: &[DrawingPath],
        config: &EngineConfig,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) -> bool {
        let (press_norm, hit_index) = match self.state {
            LassoState::Armed {
                press_norm,
                hit_index,
                ..
            } => (press_norm, hit_index),
            // Stale firing (already cancelled or re-entered); ignore.
            _ => return false,
        };
        self.state = LassoState::Idle;

        let Some(loop_path) = paths.get(hit_index) else {
            return false;
        };
        if !is_closed_loop(loop_path, config) {
            log::debug!("pressed stroke is not a closed loop");
            return false;
        }

        let polygon = &loop_path.points;
        let mut selected = Vec::new();
        for (i, p) in paths.iter().enumerate() {
            if i == hit_index || p.points.is_empty() {
                continue;
            }
            let inside = p
                .points
                .iter()
                .filter(|q| geometry::point_in_polygon(**q, polygon))
                .count();
            if inside as f64 / p.points.len() as f64 >= config.selection_ratio {
                selected.push(i);
            }
        }

        if selected.is_empty() {
            log::debug!("loop encloses nothing; treated as ordinary ink");
            return false;
        }

        let bounds = bounds_of(paths, &selected);
        let snapshot = snapshot_of(paths, hit_index, &selected);
        self.state = LassoState::Active(SelectionState {
            lasso_index: hit_index,
            selected,
            bounds,
            is_dragging: true,
            drag_start: press_norm,
            snapshot,
        });

        sched.schedule(TimerId::Inactivity, config.inactivity_timeout);
        host.on_selection_activate();
        log::debug!("selection activated from path {hit_index}");
        true
    }

    /// Pointer-down while active: a press inside the expanded bounding box
    /// starts a new drag; anything else is not consumed (the caller clears
    /// the selection and lets the press start a fresh stroke).
    pub fn press_active(
        &mut self,
        raw: Point,
        size: Size,
        config: &EngineConfig,
        sched: &mut dyn Scheduler,
    ) -> bool {
        let LassoState::Active(sel) = &mut self.state else {
            return false;
        };

        let p = path::normalize_point(raw, size);
        let inside = sel
            .bounds
            .inflate(config.selection_margin, config.selection_margin)
            .contains(p);
        if inside {
            sel.is_dragging = true;
            sel.drag_start = p;
            sched.schedule(TimerId::Inactivity, config.inactivity_timeout);
        }
        inside
    }

    /// Drag the selection to follow the pointer.
    ///
    /// Every point of the loop stroke and of every selected path is
    /// recomputed as `snapshot + (pointer - drag_start)` and written back
    /// through the host as a full replacement list. The snapshot itself
    /// stays untouched, so successive calls are relative to a stable origin
    /// rather than accumulating per call.
    pub fn drag(
        &mut self,
        raw: Point,
        paths: &[DrawingPath],
        size: Size,
        config: &EngineConfig,
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        let LassoState::Active(sel) = &mut self.state else {
            return;
        };
        if !sel.is_dragging {
            return;
        }

        let delta = path::normalize_point(raw, size) - sel.drag_start;
        let mut next = paths.to_vec();
        for (index, original) in &sel.snapshot {
            if let Some(target) = next.get_mut(*index) {
                target.points = original.iter().map(|&q| q + delta).collect();
            }
        }

        sched.schedule(TimerId::Inactivity, config.inactivity_timeout);
        host.on_paths_change(next);
    }

    /// Pointer-up during a drag: re-snapshot the moved coordinates so the
    /// next drag composes additively instead of starting from a stale
    /// origin, and refresh the bounding box.
    pub fn end_drag(&mut self, paths: &[DrawingPath]) {
        let LassoState::Active(sel) = &mut self.state else {
            return;
        };
        if !sel.is_dragging {
            return;
        }

        sel.is_dragging = false;
        sel.snapshot = snapshot_of(paths, sel.lasso_index, &sel.selected);
        sel.bounds = bounds_of(paths, &sel.selected);
    }

    /// Dissolve the selection.
    ///
    /// The loop stroke was consumed as a gesture, not retained as ink: the
    /// replacement list emitted here drops it, preserving the order of
    /// everything else.
    pub fn clear(
        &mut self,
        paths: &[DrawingPath],
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        if !self.is_active() {
            // An armed (not yet active) press keeps its long-press timer.
            return;
        }
        let LassoState::Active(sel) = std::mem::take(&mut self.state) else {
            return;
        };
        sched.cancel(TimerId::Inactivity);

        let next: Vec<DrawingPath> = paths
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != sel.lasso_index)
            .map(|(_, p)| p.clone())
            .collect();
        host.on_paths_change(next);
        log::debug!("selection dissolved, loop stroke consumed");
    }

    /// The inactivity timer elapsed with no drag activity.
    pub fn inactivity_fired(
        &mut self,
        paths: &[DrawingPath],
        sched: &mut dyn Scheduler,
        host: &mut dyn EngineHost,
    ) {
        if self.is_active() {
            self.clear(paths, sched, host);
        }
    }

    /// Drop all state and cancel any pending timer (surface detach).
    pub fn detach(&mut self, sched: &mut dyn Scheduler) {
        match self.state {
            LassoState::Armed { .. } => sched.cancel(TimerId::LongPress),
            LassoState::Active(_) => sched.cancel(TimerId::Inactivity),
            LassoState::Idle => {}
        }
        self.state = LassoState::Idle;
    }
}

/// Whether a stroke closes on itself tightly enough to act as a loop.
fn is_closed_loop(path: &DrawingPath, config: &EngineConfig) -> bool {
    if path.points.len() < config.min_loop_points {
        return false;
    }
    match (path.points.first(), path.points.last()) {
        (Some(&first), Some(&last)) => first.distance(last) < config.closure_distance,
        _ => false,
    }
}

/// Bounding box of the selected paths, normalized.
fn bounds_of(paths: &[DrawingPath], selected: &[usize]) -> Rect {
    let mut result: Option<Rect> = None;
    for &i in selected {
        if let Some(path) = paths.get(i) {
            if path.points.is_empty() {
                continue;
            }
            let b = path.bounds();
            result = Some(match result {
                Some(r) => r.union(b),
                None => b,
            });
        }
    }
    result.unwrap_or(Rect::ZERO)
}

/// Deep copy of the loop stroke's and every selected path's coordinates.
fn snapshot_of(
    paths: &[DrawingPath],
    lasso_index: usize,
    selected: &[usize],
) -> Vec<(usize, Vec<Point>)> {
    let mut indices: Vec<usize> = selected.to_vec();
    indices.push(lasso_index);
    indices.sort_unstable();
    indices.dedup();

    indices
        .into_iter()
        .filter_map(|i| paths.get(i).map(|p| (i, p.points.clone())))
        .collect()
}
