use std::sync::Arc;
use std::time::Duration;

use catalog::CatalogSource;
use foundation::math::GeoPoint;
use layers::{PlacementConfig, PlacementInput, PlacementLayer, ViewportChange};
use runtime::{Frame, Subscription};
use scene::{
    HotspotStore, LocationError, LocationProvider, NavigationCursor, StackEntry, StoreEvent,
    Transition, hotspot_stack,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::location::acquire_location;
use crate::view::GlobeView;

/// Ties the store, the camera and the label layer together, one frame at a
/// time.
pub struct Session<P> {
    store: HotspotStore,
    view: GlobeView,
    layer: PlacementLayer,
    source: Box<dyn CatalogSource>,
    cursor: NavigationCursor,
    store_events: Subscription,
    sensor: P,
    location_timeout: Duration,
    fly_duration_s: f64,
    frame: Frame,
    pending_location: Option<JoinHandle<Result<GeoPoint, LocationError>>>,
}

impl<P> Session<P>
where
    P: LocationProvider + Clone + Send + Sync + 'static,
{
    pub fn new(
        store: HotspotStore,
        mut view: GlobeView,
        config: PlacementConfig,
        source: Box<dyn CatalogSource>,
        sensor: P,
        location_timeout: Duration,
        fly_duration_s: f64,
    ) -> Self {
        view.set_features(store.catalog());
        let store_events = store.subscribe();
        let mut layer = PlacementLayer::new(config);
        let frame = Frame::first();
        layer.run_now(frame, &view, &PlacementInput::from_store(&store));

        Self {
            store,
            view,
            layer,
            source,
            cursor: NavigationCursor::new(),
            store_events,
            sensor,
            location_timeout,
            fly_duration_s,
            frame,
            pending_location: None,
        }
    }

    pub fn store(&self) -> &HotspotStore {
        &self.store
    }

    pub fn view(&self) -> &GlobeView {
        &self.view
    }

    pub fn layer(&self) -> &PlacementLayer {
        &self.layer
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Starts a location request in the background. A request already in
    /// flight is left alone.
    pub fn request_location(&mut self) {
        if self.pending_location.is_some() {
            debug!("location request already in flight");
            return;
        }
        let sensor = self.sensor.clone();
        let timeout = self.location_timeout;
        self.pending_location = Some(tokio::spawn(async move {
            acquire_location(&sensor, timeout).await
        }));
    }

    /// Fetches the feed again and installs it as the next catalog
    /// generation. A failed fetch keeps the current catalog.
    pub fn reload_catalog(&mut self) -> bool {
        let next = self
            .source
            .fetch()
            .and_then(|hotspots| self.store.catalog().refreshed(hotspots));
        match next {
            Ok(catalog) => {
                self.store.replace_catalog(Arc::new(catalog));
                true
            }
            Err(err) => {
                warn!(
                    error = %err,
                    generation = self.store.catalog().generation(),
                    "catalog reload failed; keeping current generation"
                );
                false
            }
        }
    }

    pub fn location_pending(&self) -> bool {
        self.pending_location.is_some()
    }

    pub fn apply(&mut self, command: &Command) {
        let transition = match command {
            Command::ToggleScan => Some(self.store.toggle_scan()),
            Command::Next => Some(self.store.next()),
            Command::Prev => Some(self.store.prev()),
            Command::ExitScan => Some(self.store.exit_scan()),
            Command::Jump(id) => Some(self.store.jump_to(id.clone())),
            Command::Select(id) => {
                let hint = id
                    .as_ref()
                    .and_then(|id| self.store.hotspot(id))
                    .map(|h| h.location);
                Some(self.store.select_hotspot(id.clone(), hint))
            }
            Command::Hover(id) => {
                self.store.set_hovered(id.clone());
                None
            }
            Command::Zoom(zoom) => {
                self.view.set_zoom(*zoom);
                self.layer.request_pass(ViewportChange::Zoom);
                None
            }
            Command::Pan { d_lat, d_lng } => {
                self.view.pan(*d_lat, *d_lng);
                self.layer.request_pass(ViewportChange::Move);
                None
            }
            Command::Resize { width, height } => {
                self.view.resize([*width, *height]);
                self.layer.request_pass(ViewportChange::Resize);
                None
            }
            Command::Locate => {
                self.request_location();
                None
            }
            Command::Rerank => {
                self.store.refresh();
                None
            }
            Command::Reload => {
                self.reload_catalog();
                None
            }
            Command::Wait(_) => None,
        };

        if let Some(Transition::EmptyRankedList) = transition {
            info!(?command, "nothing ranked to step through");
        }
    }

    /// Advances one animation frame. Returns `true` when a label pass ran.
    pub async fn tick(&mut self, dt_s: f64) -> bool {
        self.collect_location().await;
        self.drain_store_events();
        self.follow_navigation();

        if self.view.advance(dt_s) {
            self.layer.request_pass(ViewportChange::Move);
        }

        self.frame = self.frame.next(dt_s);
        self.layer.on_animation_frame(
            self.frame,
            &self.view,
            &PlacementInput::from_store(&self.store),
        )
    }

    /// No flight, no pending pass and no location request outstanding.
    pub fn is_settled(&self) -> bool {
        !self.view.is_flying() && !self.layer.has_pending_pass() && !self.location_pending()
    }

    pub fn stack(&self, limit: usize) -> Vec<StackEntry> {
        hotspot_stack(&self.store, limit)
    }

    async fn collect_location(&mut self) {
        let Some(handle) = self.pending_location.take_if(|h| h.is_finished()) else {
            return;
        };
        match handle.await {
            Ok(result) => {
                self.store.apply_location_result(result);
            }
            Err(err) => error!(error = %err, "location task failed"),
        }
    }

    fn drain_store_events(&mut self) {
        let mut state_changed = false;
        let mut refreshed = false;
        for envelope in self.store.poll_events(&mut self.store_events) {
            match &envelope.event {
                StoreEvent::CatalogRefreshed { .. } => {
                    refreshed = true;
                    state_changed = true;
                }
                StoreEvent::NavigationRequested(_) => {}
                _ => state_changed = true,
            }
        }
        if refreshed {
            self.view.set_features(self.store.catalog());
        }
        if state_changed {
            self.layer.request_pass(ViewportChange::StateChanged);
        }
    }

    fn follow_navigation(&mut self) {
        let Some(request) = self.cursor.take(self.store.navigation_request()) else {
            return;
        };
        let target = request.target_hint.or_else(|| {
            request
                .target_id
                .as_ref()
                .and_then(|id| self.store.hotspot(id))
                .map(|h| h.location)
        });
        match target {
            Some(target) => {
                debug!(request_id = request.request_id, ?target, "flying to hotspot");
                self.view.fly_to(target, self.fly_duration_s);
            }
            None => debug!(request_id = request.request_id, "navigation without a target"),
        }
        // Selection and preview state feed the labels too.
        self.layer.request_pass(ViewportChange::StateChanged);
    }
}
