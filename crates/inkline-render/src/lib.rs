//! Rendering-side companions for the inkline engine.
//!
//! The core issues immediate-mode draw calls against the abstract
//! [`DrawSurface`](inkline_core::surface::DrawSurface); this crate provides a
//! retained-scene implementation that records those calls as `kurbo`
//! Bézier paths for vector backends.

mod scene;

pub use scene::{ScenePath, SceneSurface};

#[cfg(test)]
mod tests {
    use super::*;
    use inkline_core::engine::{InkEngine, PointerSource};
    use inkline_core::host::{EngineHost, Scheduler, TimerId};
    use inkline_core::path::DrawingPath;
    use kurbo::{Point, Size};
    use std::time::Duration;

    #[derive(Default)]
    struct NullScheduler {
        now: Duration,
    }

    impl Scheduler for NullScheduler {
        fn now(&self) -> Duration {
            self.now
        }
        fn schedule(&mut self, _id: TimerId, _delay: Duration) {}
        fn cancel(&mut self, _id: TimerId) {}
    }

    #[derive(Default)]
    struct CollectingHost {
        completed: Vec<DrawingPath>,
    }

    impl EngineHost for CollectingHost {
        fn on_path_complete(&mut self, path: DrawingPath) {
            self.completed.push(path);
        }
        fn on_paths_change(&mut self, _paths: Vec<DrawingPath>) {}
    }

    #[test]
    fn test_live_capture_records_scene_paths() {
        let mut engine = InkEngine::default();
        let mut scene = SceneSurface::new(Size::new(200.0, 100.0));
        let mut sched = NullScheduler::default();
        let mut host = CollectingHost::default();
        let paths: Vec<DrawingPath> = Vec::new();

        engine.pointer_down(
            Point::new(10.0, 10.0),
            PointerSource::Stylus,
            &paths,
            Some(&mut scene),
            &mut sched,
            &mut host,
        );
        engine.pointer_batch(
            &[
                Point::new(40.0, 30.0),
                Point::new(80.0, 20.0),
                Point::new(120.0, 50.0),
            ],
            &paths,
            Some(&mut scene),
            &mut sched,
            &mut host,
        );
        sched.now = Duration::from_millis(300);
        engine.pointer_up(&paths, &mut sched, &mut host);

        // One incremental scene path per appended sample.
        assert_eq!(scene.paths().len(), 3);
        assert_eq!(host.completed.len(), 1);
        assert_eq!(host.completed[0].points.len(), 4);
    }
}
