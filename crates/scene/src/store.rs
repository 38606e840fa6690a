use std::sync::Arc;

use catalog::{Catalog, Hotspot};
use compute::{RankingConfig, rank};
use foundation::HotspotId;
use foundation::math::GeoPoint;
use runtime::{Envelope, EventBus, Subscription};
use tracing::{debug, info, warn};

use crate::location::LocationError;
use crate::navigation::{NavigationPhase, NavigationRequest, Navigator, ScanState, Transition};

/// Change notification published by [`HotspotStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    CatalogRefreshed { generation: u64, len: usize },
    RankingChanged { len: usize },
    LocationChanged(GeoPoint),
    ScanChanged { enabled: bool, index: usize },
    HoverChanged(Option<HotspotId>),
    NavigationRequested(NavigationRequest),
}

/// Single owner of the hotspot UI state.
///
/// Holds the shared catalog snapshot, the optional user location, the ranked
/// order (inside the navigator's scan state) and the hover target. All
/// mutation goes through the transition methods below, each of which
/// publishes what changed on the store's event bus.
#[derive(Debug)]
pub struct HotspotStore {
    catalog: Arc<Catalog>,
    ranking: RankingConfig,
    user_location: Option<GeoPoint>,
    navigator: Navigator,
    hovered_id: Option<HotspotId>,
    events: EventBus<StoreEvent>,
}

impl HotspotStore {
    pub fn new(catalog: Arc<Catalog>, ranking: RankingConfig) -> Self {
        let ranked = rank(&catalog, None, &ranking);
        Self {
            catalog,
            ranking,
            user_location: None,
            navigator: Navigator::new(ranked),
            hovered_id: None,
            events: EventBus::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn hotspot(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.catalog.get(id)
    }

    pub fn user_location(&self) -> Option<GeoPoint> {
        self.user_location
    }

    pub fn ranked_ids(&self) -> &[HotspotId] {
        &self.navigator.scan().ranked_ids
    }

    pub fn scan_state(&self) -> &ScanState {
        self.navigator.scan()
    }

    pub fn selected_id(&self) -> Option<&HotspotId> {
        self.navigator.selected_id()
    }

    pub fn hovered_id(&self) -> Option<&HotspotId> {
        self.hovered_id.as_ref()
    }

    pub fn is_preview_open(&self) -> bool {
        self.navigator.is_preview_open()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.navigator.phase()
    }

    pub fn navigation_request(&self) -> &NavigationRequest {
        self.navigator.request()
    }

    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    pub fn poll_events(&self, sub: &mut Subscription) -> &[Envelope<StoreEvent>] {
        self.events.poll(sub)
    }

    pub fn select_hotspot(&mut self, id: Option<HotspotId>, target_hint: Option<GeoPoint>) -> Transition {
        let t = self.navigator.select_hotspot(id, target_hint);
        self.publish(&t);
        t
    }

    pub fn toggle_scan(&mut self) -> Transition {
        let t = self.navigator.toggle_scan();
        self.publish(&t);
        t
    }

    pub fn next(&mut self) -> Transition {
        let t = self.navigator.next();
        self.publish(&t);
        t
    }

    pub fn prev(&mut self) -> Transition {
        let t = self.navigator.prev();
        self.publish(&t);
        t
    }

    pub fn exit_scan(&mut self) -> Transition {
        let t = self.navigator.exit_scan();
        self.publish(&t);
        t
    }

    pub fn jump_to(&mut self, id: HotspotId) -> Transition {
        let t = self.navigator.jump_to(id);
        self.publish(&t);
        t
    }

    /// Hover never moves the camera; it only feeds label placement.
    pub fn set_hovered(&mut self, id: Option<HotspotId>) {
        if self.hovered_id == id {
            return;
        }
        self.hovered_id = id.clone();
        self.events.emit(StoreEvent::HoverChanged(id));
    }

    /// Recomputes the ranked order from the current catalog and location.
    pub fn refresh(&mut self) {
        let ranked = rank(&self.catalog, self.user_location, &self.ranking);
        let len = ranked.len();
        self.navigator.refresh(ranked);
        self.events.emit(StoreEvent::RankingChanged { len });
        self.emit_scan();
    }

    /// Swaps in a new catalog snapshot from the feed and re-ranks.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        info!(
            generation = catalog.generation(),
            len = catalog.len(),
            "hotspot catalog refreshed"
        );
        self.catalog = catalog;
        self.events.emit(StoreEvent::CatalogRefreshed {
            generation: self.catalog.generation(),
            len: self.catalog.len(),
        });
        self.refresh();
    }

    pub fn set_user_location(&mut self, location: GeoPoint) {
        self.user_location = Some(location);
        self.events.emit(StoreEvent::LocationChanged(location));
        self.refresh();
    }

    /// Consumes the outcome of a location request.
    ///
    /// Only `Ok` touches state. Failures are logged and the previous location,
    /// if any, stays in effect.
    pub fn apply_location_result(&mut self, result: Result<GeoPoint, LocationError>) -> bool {
        match result {
            Ok(location) if location.is_valid() => {
                info!(lat = location.lat_deg, lng = location.lng_deg, "user location acquired");
                self.set_user_location(location);
                true
            }
            Ok(location) => {
                warn!(?location, "ignoring out-of-range user location");
                false
            }
            Err(LocationError::Unavailable) => {
                warn!("location unavailable; ranking without proximity");
                false
            }
            Err(err) => {
                warn!(error = %err, keeps_previous = self.user_location.is_some(), "location request failed");
                false
            }
        }
    }

    fn publish(&mut self, t: &Transition) {
        match t {
            Transition::Navigated(req) => {
                self.emit_scan();
                self.events.emit(StoreEvent::NavigationRequested(req.clone()));
            }
            Transition::StaleIdLookup(req) => {
                warn!(
                    target_id = ?req.target_id,
                    "navigating to a hotspot outside the ranked list; scan index left unsynchronized"
                );
                self.emit_scan();
                self.events.emit(StoreEvent::NavigationRequested(req.clone()));
            }
            Transition::EmptyRankedList => {
                debug!("scan step ignored: no ranked hotspots");
            }
            Transition::Unchanged => self.emit_scan(),
        }
    }

    fn emit_scan(&mut self) {
        let scan = self.navigator.scan();
        let event = StoreEvent::ScanChanged {
            enabled: scan.enabled,
            index: scan.index,
        };
        self.events.emit(event);
    }
}
