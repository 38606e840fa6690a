use catalog::BiasLabel;
use foundation::HotspotId;
use foundation::math::great_circle_km;

use crate::store::HotspotStore;

/// How many ranked hotspots the side list shows.
pub const STACK_LIST_SIZE: usize = 10;

/// Row of the ranked hotspot list.
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    pub id: HotspotId,
    pub tag: String,
    pub headline: String,
    pub display_location: Option<String>,
    pub intensity: f64,
    pub is_breaking: bool,
    pub bias: Option<BiasLabel>,
    /// Number of source articles behind the story.
    pub coverage_count: usize,
    /// The scan cursor is on this row.
    pub is_active: bool,
    pub distance_label: Option<String>,
}

/// Top `limit` ranked hotspots, in ranked order.
///
/// Ranked ids that are missing from the catalog are skipped.
pub fn hotspot_stack(store: &HotspotStore, limit: usize) -> Vec<StackEntry> {
    let scan = store.scan_state();
    let active = if scan.enabled { scan.current_id() } else { None };
    let user = store.user_location();

    store
        .ranked_ids()
        .iter()
        .take(limit)
        .filter_map(|id| store.hotspot(id))
        .map(|h| StackEntry {
            id: h.id.clone(),
            tag: h.tag.clone(),
            headline: h.display.headline.clone(),
            display_location: h.display.display_location.clone(),
            intensity: h.intensity,
            is_breaking: h.is_breaking,
            bias: h.display.bias.as_ref().map(|b| b.label),
            coverage_count: h.display.coverage.len(),
            is_active: active == Some(&h.id),
            distance_label: user.map(|u| format_distance_km(great_circle_km(u, h.location))),
        })
        .collect()
}

/// `"640km"` below a thousand kilometers, `"5.6k km"` above.
pub fn format_distance_km(km: f64) -> String {
    if km < 1000.0 {
        format!("{}km", km.round() as u64)
    } else {
        format!("{:.1}k km", km / 1000.0)
    }
}
