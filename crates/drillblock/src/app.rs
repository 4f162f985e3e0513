//! Application state and debounced regeneration.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Configuration, RawInput, Settings};
use crate::error::ConfigError;
use crate::pipeline::generate;
use crate::scene::{DisplaySink, Scene};

/// Quiet interval after the last edit before regenerating.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Single pending deadline. Scheduling again replaces the previous one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Debouncer with the given quiet interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and start a new one at `now + interval`.
    pub fn schedule(&mut self, now: Instant) {
        if self.deadline.is_some() {
            debug!("debounce rescheduled");
        }
        self.deadline = Some(now + self.interval);
    }

    /// Drop the pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True while a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the deadline has passed. Fires at most once per schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, zero if already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_INTERVAL)
    }
}

/// Summary of one regeneration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegenerationReport {
    /// Regeneration counter, starting at 1.
    pub generation: u64,
    /// Blocks displayed.
    pub blocks: usize,
    /// Cutters subtracted across all blocks.
    pub cutters: usize,
    /// Triangles across all block meshes.
    pub triangles: usize,
    /// Wall time spent.
    pub elapsed_ms: u64,
}

/// Parameters plus the scene built from them.
#[derive(Debug, Default)]
pub struct AppState {
    /// Editable parameters.
    pub settings: Settings,
    /// Currently displayed blocks.
    pub scene: Scene,
    generation: u64,
}

impl AppState {
    /// State with the given parameters and an empty scene.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            scene: Scene::new(),
            generation: 0,
        }
    }

    /// Sanitized configuration of the current parameters.
    pub fn configuration(&self) -> Configuration {
        self.settings.configuration()
    }

    /// Apply form input.
    pub fn apply_input(&mut self, input: &RawInput) {
        self.settings.apply_input(input);
    }

    /// Apply one `key=value` edit.
    pub fn apply_edit(&mut self, edit: &str) -> Result<(), ConfigError> {
        self.settings.apply_edit(edit)
    }

    /// Rebuild every block and swap them into the scene.
    pub fn regenerate<D: DisplaySink>(&mut self, sink: &mut D) -> RegenerationReport {
        let start = Instant::now();
        let config = self.configuration();
        let blocks = generate(&config);
        self.scene.replace(blocks, sink);
        self.generation += 1;

        let report = RegenerationReport {
            generation: self.generation,
            blocks: self.scene.len(),
            cutters: self.scene.blocks().map(|b| b.layout.cutter_count()).sum(),
            triangles: self.scene.blocks().map(|b| b.mesh().num_triangles()).sum(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            generation = report.generation,
            blocks = report.blocks,
            cutters = report.cutters,
            triangles = report.triangles,
            elapsed_ms = report.elapsed_ms,
            "regenerated"
        );
        report
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshStore;

    #[test]
    fn test_debounce_fires_once() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.poll(t0));

        debouncer.schedule(t0);
        assert!(!debouncer.poll(t0 + Duration::from_millis(299)));
        assert!(debouncer.poll(t0 + DEBOUNCE_INTERVAL));
        assert!(!debouncer.poll(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_debounce_reschedule_postpones() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(t0);
        debouncer.schedule(t0 + Duration::from_millis(200));
        assert!(!debouncer.poll(t0 + Duration::from_millis(400)));
        assert!(debouncer.poll(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_debounce_cancel() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(t0);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.remaining(t0), None);
        debouncer.schedule(t0);
        assert_eq!(debouncer.remaining(t0 + Duration::from_secs(1)), Some(Duration::ZERO));
    }

    #[test]
    fn test_regenerate_reports() {
        let mut settings = Settings::default();
        settings.apply_edit("num_holes=2").unwrap();
        settings.apply_edit("depth=0").unwrap();
        settings.apply_edit("segments=6").unwrap();
        let mut state = AppState::new(settings);
        let mut store = MeshStore::new();

        let report = state.regenerate(&mut store);
        assert_eq!(report.generation, 1);
        assert_eq!(report.blocks, 1);
        assert_eq!(report.cutters, 5);
        assert!(report.triangles > 0);
        assert_eq!(report.triangles, store.triangle_count());

        state.apply_edit("mode=batch").unwrap();
        state.apply_edit("batch=1,1").unwrap();
        let report = state.regenerate(&mut store);
        assert_eq!(report.generation, 2);
        assert_eq!(report.blocks, 2);
        assert_eq!(store.live_count(), 2);
    }
}
