use runtime::{Frame, FrameScheduler, Metrics, PassHandle};
use tracing::trace;

use crate::labels::{MapView, PlacementConfig, PlacementInput, PopupState, place_labels};

/// Why a placement pass was requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportChange {
    Move,
    Zoom,
    Rotate,
    Pitch,
    Resize,
    /// Selection, hover or catalog changed without the camera moving.
    StateChanged,
}

pub const METRIC_PASSES_SCHEDULED: &str = "labels.passes_scheduled";
pub const METRIC_PASSES_SUPERSEDED: &str = "labels.passes_superseded";
pub const METRIC_PASSES_RUN: &str = "labels.passes_run";
pub const METRIC_LABELS_PLACED: &str = "labels.placed";
pub const METRIC_LABELS_PER_PASS: &str = "labels.per_pass";

/// Owns the current label set and coalesces viewport churn into at most one
/// placement pass per paint.
#[derive(Debug)]
pub struct PlacementLayer {
    config: PlacementConfig,
    scheduler: FrameScheduler<ViewportChange>,
    placements: Vec<PopupState>,
    last_frame: Option<u64>,
    metrics: Metrics,
}

impl PlacementLayer {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            scheduler: FrameScheduler::new(),
            placements: Vec::new(),
            last_frame: None,
            metrics: Metrics::new(),
        }
    }

    /// Labels from the most recent pass.
    pub fn placements(&self) -> &[PopupState] {
        &self.placements
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn has_pending_pass(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Requests a pass for the next paint, replacing any pending one.
    pub fn request_pass(&mut self, change: ViewportChange) -> PassHandle {
        let outcome = self.scheduler.schedule(change);
        self.metrics.inc_counter(METRIC_PASSES_SCHEDULED, 1);
        if let Some(old) = outcome.superseded {
            self.metrics.inc_counter(METRIC_PASSES_SUPERSEDED, 1);
            trace!(superseded = old.0, by = outcome.handle.0, ?change, "label pass superseded");
        }
        outcome.handle
    }


    /// Runs the pending pass, if any. Returns `true` when placements changed
    /// hands (even if the new set happens to equal the old one).
    pub fn on_animation_frame<V: MapView>(
        &mut self,
        frame: Frame,
        view: &V,
        input: &PlacementInput<'_>,
    ) -> bool {
        let Some((handle, change)) = self.scheduler.take_due() else {
            return false;
        };
        trace!(pass = handle.0, frame = frame.index, ?change, "running label pass");
        self.run(frame, view, input);
        true
    }

    /// Runs a pass immediately, discarding anything pending.
    pub fn run_now<V: MapView>(&mut self, frame: Frame, view: &V, input: &PlacementInput<'_>) {
        self.scheduler.cancel_all();
        self.run(frame, view, input);
    }

    fn run<V: MapView>(&mut self, frame: Frame, view: &V, input: &PlacementInput<'_>) {
        self.placements = place_labels(view, input, &self.config);
        self.last_frame = Some(frame.index);
        self.metrics.inc_counter(METRIC_PASSES_RUN, 1);
        let placed = self.placements.len() as i64;
        self.metrics.set_gauge(METRIC_LABELS_PLACED, placed);
        self.metrics.observe(METRIC_LABELS_PER_PASS, placed);
    }
}
