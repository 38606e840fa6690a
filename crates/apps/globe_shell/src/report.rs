use catalog::BiasLabel;
use layers::{MapView, PopupState, PriorityTier};
use scene::{HotspotStore, NavigationPhase, StackEntry};
use serde::Serialize;

use crate::view::GlobeView;

#[derive(Debug, Serialize)]
pub struct LabelReport<'a> {
    pub id: &'a str,
    pub x: f64,
    pub y: f64,
    pub tier: &'static str,
}

/// One JSON line per placement pass.
#[derive(Debug, Serialize)]
pub struct FrameReport<'a> {
    pub frame: u64,
    pub zoom: f64,
    pub center: [f64; 2],
    pub phase: &'static str,
    pub scan: Option<String>,
    pub selected: Option<&'a str>,
    pub request_id: u64,
    pub labels: Vec<LabelReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct StackRow<'a> {
    pub rank: usize,
    pub id: &'a str,
    pub tag: &'a str,
    pub headline: &'a str,
    pub location: Option<&'a str>,
    pub breaking: bool,
    pub bias: Option<&'static str>,
    pub coverage: usize,
    pub active: bool,
    pub distance: Option<&'a str>,
}

pub fn tier_name(tier: PriorityTier) -> &'static str {
    match tier {
        PriorityTier::Selected => "selected",
        PriorityTier::Hovered => "hovered",
        PriorityTier::Auto => "auto",
    }
}

pub fn bias_name(label: BiasLabel) -> &'static str {
    match label {
        BiasLabel::Left => "left",
        BiasLabel::Center => "center",
        BiasLabel::Right => "right",
        BiasLabel::NonPolitical => "non_political",
    }
}

pub fn phase_name(phase: NavigationPhase) -> &'static str {
    match phase {
        NavigationPhase::Idle => "idle",
        NavigationPhase::Previewing => "previewing",
        NavigationPhase::Scanning => "scanning",
    }
}

pub fn frame_report<'a>(
    frame: u64,
    store: &'a HotspotStore,
    view: &GlobeView,
    placements: &'a [PopupState],
) -> FrameReport<'a> {
    let scan = store.scan_state();
    FrameReport {
        frame,
        zoom: view.zoom(),
        center: [view.center().lat_deg, view.center().lng_deg],
        phase: phase_name(store.phase()),
        scan: (scan.enabled && !scan.ranked_ids.is_empty()).then(|| scan.indicator()),
        selected: store.selected_id().map(|id| id.as_str()),
        request_id: store.navigation_request().request_id,
        labels: placements
            .iter()
            .map(|p| LabelReport {
                id: p.id.as_str(),
                x: p.screen_x,
                y: p.screen_y,
                tier: tier_name(p.tier),
            })
            .collect(),
    }
}

pub fn stack_rows(entries: &[StackEntry]) -> Vec<StackRow<'_>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| StackRow {
            rank: i + 1,
            id: e.id.as_str(),
            tag: &e.tag,
            headline: &e.headline,
            location: e.display_location.as_deref(),
            breaking: e.is_breaking,
            bias: e.bias.map(bias_name),
            coverage: e.coverage_count,
            active: e.is_active,
            distance: e.distance_label.as_deref(),
        })
        .collect()
}
