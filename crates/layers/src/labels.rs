use std::collections::HashSet;

use catalog::{Catalog, Hotspot};
use foundation::HotspotId;
use foundation::ScreenRect;
use foundation::math::GeoPoint;
use scene::HotspotStore;

/// Hard ceiling on auto labels regardless of zoom.
pub const MAX_AUTO_LABELS: usize = 10;

/// Renderer layer whose rendered features count as visible hotspots.
pub const HOTSPOT_CIRCLE_LAYER: &str = "clusters-circles";

/// What the label engine needs from the map renderer.
pub trait MapView {
    /// Screen position in pixels, origin top-left.
    fn project(&self, location: GeoPoint) -> [f64; 2];
    /// Ids of features currently drawn (on-screen and not behind the globe).
    fn query_visible_ids(&self, layer: &str) -> HashSet<HotspotId>;
    fn zoom(&self) -> f64;
    fn viewport_size(&self) -> [f64; 2];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityTier {
    Selected,
    Hovered,
    Auto,
}

/// One label to draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub id: HotspotId,
    pub screen_x: f64,
    pub screen_y: f64,
    pub tier: PriorityTier,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomStep {
    pub min_zoom: f64,
    pub count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BudgetError {
    NonFiniteZoom,
    Unordered { at: usize },
}

impl std::fmt::Display for BudgetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetError::NonFiniteZoom => write!(f, "zoom thresholds must be finite"),
            BudgetError::Unordered { at } => {
                write!(f, "zoom threshold {at} is not above the previous one")
            }
        }
    }
}

impl std::error::Error for BudgetError {}

/// Step function from zoom level to the number of auto labels allowed.
///
/// Below the first threshold the budget is 0. Counts are clamped to `cap`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBudgets {
    steps: Vec<ZoomStep>,
    cap: usize,
}

impl Default for ZoomBudgets {
    fn default() -> Self {
        Self {
            steps: vec![
                // Clean globe: only the selection.
                ZoomStep { min_zoom: 0.0, count: 0 },
                ZoomStep { min_zoom: 3.0, count: 2 },
                ZoomStep { min_zoom: 4.5, count: 5 },
                ZoomStep { min_zoom: 6.0, count: MAX_AUTO_LABELS },
            ],
            cap: MAX_AUTO_LABELS,
        }
    }
}

impl ZoomBudgets {
    pub fn new(steps: Vec<ZoomStep>, cap: usize) -> Result<Self, BudgetError> {
        for (i, step) in steps.iter().enumerate() {
            if !step.min_zoom.is_finite() {
                return Err(BudgetError::NonFiniteZoom);
            }
            if i > 0 && step.min_zoom <= steps[i - 1].min_zoom {
                return Err(BudgetError::Unordered { at: i });
            }
        }
        let steps = steps
            .into_iter()
            .map(|s| ZoomStep {
                count: s.count.min(cap),
                ..s
            })
            .collect();
        Ok(Self { steps, cap })
    }

    pub fn budget_for(&self, zoom: f64) -> usize {
        let mut budget = 0;
        for step in &self.steps {
            if zoom >= step.min_zoom {
                budget = step.count;
            }
        }
        budget.min(self.cap)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub budgets: ZoomBudgets,
    /// Fraction of the viewport width kept free of auto labels on each side.
    pub safe_margin_x_pct: f64,
    pub safe_margin_y_pct: f64,
    /// Any label projected further than this outside the viewport is dropped.
    pub loose_bounds_px: f64,
    pub visibility_layer: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            budgets: ZoomBudgets::default(),
            safe_margin_x_pct: 0.15,
            safe_margin_y_pct: 0.15,
            loose_bounds_px: 50.0,
            visibility_layer: HOTSPOT_CIRCLE_LAYER.to_string(),
        }
    }
}

/// Per-pass snapshot of the state label placement depends on.
#[derive(Debug, Clone, Copy)]
pub struct PlacementInput<'a> {
    pub catalog: &'a Catalog,
    pub selected_id: Option<&'a HotspotId>,
    pub hovered_id: Option<&'a HotspotId>,
}

impl<'a> PlacementInput<'a> {
    pub fn from_store(store: &'a HotspotStore) -> Self {
        Self {
            catalog: store.catalog(),
            selected_id: store.selected_id(),
            hovered_id: store.hovered_id(),
        }
    }
}

struct Placer<'a> {
    loose: ScreenRect,
    placed: HashSet<&'a HotspotId>,
    out: Vec<PopupState>,
}

impl<'a> Placer<'a> {
    fn add(&mut self, h: &'a Hotspot, screen: [f64; 2], tier: PriorityTier) {
        if self.placed.contains(&h.id) || !self.loose.contains(screen) {
            return;
        }
        self.placed.insert(&h.id);
        self.out.push(PopupState {
            id: h.id.clone(),
            screen_x: screen[0],
            screen_y: screen[1],
            tier,
        });
    }
}

/// Computes the full label set for one frame.
///
/// Priority is selected, then hovered, then auto. Each hotspot is placed at
/// most once. The selected label ignores occlusion; the hovered one needs to
/// be rendered; auto labels must be rendered, inside the safe zone, and fit
/// the zoom budget, best intensity first.
pub fn place_labels<V: MapView>(
    view: &V,
    input: &PlacementInput<'_>,
    config: &PlacementConfig,
) -> Vec<PopupState> {
    let viewport = ScreenRect::from_size(view.viewport_size());
    let auto_budget = config.budgets.budget_for(view.zoom());
    let rendered = view.query_visible_ids(&config.visibility_layer);

    let mut placer = Placer {
        loose: viewport.expand(config.loose_bounds_px),
        placed: HashSet::new(),
        out: Vec::new(),
    };

    // Selected: even if momentarily occluded mid-flight.
    if let Some(h) = input.selected_id.and_then(|id| input.catalog.get(id)) {
        placer.add(h, view.project(h.location), PriorityTier::Selected);
    }

    // Hovered: only when rendered, so nothing shows through the globe.
    if let Some(hovered_id) = input.hovered_id
        && input.selected_id != Some(hovered_id)
        && rendered.contains(hovered_id)
        && let Some(h) = input.catalog.get(hovered_id)
    {
        placer.add(h, view.project(h.location), PriorityTier::Hovered);
    }

    if auto_budget > 0 {
        let safe = viewport.inset_fraction(config.safe_margin_x_pct, config.safe_margin_y_pct);
        let mut candidates: Vec<(&Hotspot, [f64; 2])> = input
            .catalog
            .iter()
            .filter(|h| !placer.placed.contains(&h.id) && rendered.contains(&h.id))
            .map(|h| (h, view.project(h.location)))
            .filter(|(_, screen)| safe.contains(*screen))
            .collect();
        // Stable: equal intensities keep catalog order.
        candidates.sort_by(|a, b| b.0.intensity.total_cmp(&a.0.intensity));

        for (h, screen) in candidates.into_iter().take(auto_budget) {
            placer.add(h, screen, PriorityTier::Auto);
        }
    }

    placer.out
}
