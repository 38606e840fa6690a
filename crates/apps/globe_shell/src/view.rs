use std::collections::HashSet;
use std::f64::consts::PI;

use catalog::Catalog;
use foundation::HotspotId;
use foundation::ScreenRect;
use foundation::math::{GeoPoint, clamp, clamp01, lerp};
use layers::{HOTSPOT_CIRCLE_LAYER, MapView};

/// Web-mercator tile size the zoom scale is defined against.
const TILE_SIZE_PX: f64 = 512.0;
const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from: GeoPoint,
    to: GeoPoint,
    elapsed_s: f64,
    duration_s: f64,
}

/// Orthographic globe camera standing in for the real renderer.
///
/// Hotspots count as rendered when they face the camera and land inside the
/// viewport.
#[derive(Debug, Clone)]
pub struct GlobeView {
    center: GeoPoint,
    zoom: f64,
    size_px: [f64; 2],
    features: Vec<(HotspotId, GeoPoint)>,
    flight: Option<Flight>,
}

impl GlobeView {
    pub fn new(center: GeoPoint, zoom: f64, size_px: [f64; 2]) -> Self {
        Self {
            center,
            zoom: clamp(zoom, MIN_ZOOM, MAX_ZOOM),
            size_px,
            features: Vec::new(),
            flight: None,
        }
    }

    /// Replaces the drawn hotspot features with the catalog's.
    pub fn set_features(&mut self, catalog: &Catalog) {
        self.features = catalog.iter().map(|h| (h.id.clone(), h.location)).collect();
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp(zoom, MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, size_px: [f64; 2]) {
        self.size_px = [size_px[0].max(1.0), size_px[1].max(1.0)];
    }

    pub fn pan(&mut self, d_lat: f64, d_lng: f64) {
        self.flight = None;
        self.center = GeoPoint::new(
            clamp(self.center.lat_deg + d_lat, -85.0, 85.0),
            wrap_lng(self.center.lng_deg + d_lng),
        );
    }

    /// Starts easing the camera toward `target`.
    pub fn fly_to(&mut self, target: GeoPoint, duration_s: f64) {
        if duration_s <= 0.0 {
            self.flight = None;
            self.center = target;
            return;
        }
        self.flight = Some(Flight {
            from: self.center,
            to: target,
            elapsed_s: 0.0,
            duration_s,
        });
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Advances any flight by `dt_s`. Returns `true` if the camera moved.
    pub fn advance(&mut self, dt_s: f64) -> bool {
        let Some(mut flight) = self.flight else {
            return false;
        };
        flight.elapsed_s += dt_s;
        if flight.elapsed_s >= flight.duration_s {
            self.center = flight.to;
            self.flight = None;
            return true;
        }

        let t = ease_in_out_cubic(clamp01(flight.elapsed_s / flight.duration_s));
        let d_lng = wrap_lng(flight.to.lng_deg - flight.from.lng_deg);
        self.center = GeoPoint::new(
            lerp(flight.from.lat_deg, flight.to.lat_deg, t),
            wrap_lng(flight.from.lng_deg + d_lng * t),
        );
        self.flight = Some(flight);
        true
    }

    fn radius_px(&self) -> f64 {
        TILE_SIZE_PX * 2f64.powf(self.zoom) / (2.0 * PI)
    }

    /// Cosine of the angular distance from the view center; negative means
    /// the point is on the far side of the globe.
    fn facing(&self, p: GeoPoint) -> f64 {
        let (lat0, lng0) = (self.center.lat_rad(), self.center.lng_rad());
        let (lat, lng) = (p.lat_rad(), p.lng_rad());
        lat0.sin() * lat.sin() + lat0.cos() * lat.cos() * (lng - lng0).cos()
    }
}

impl MapView for GlobeView {
    fn project(&self, location: GeoPoint) -> [f64; 2] {
        let r = self.radius_px();
        let (lat0, lng0) = (self.center.lat_rad(), self.center.lng_rad());
        let (lat, lng) = (location.lat_rad(), location.lng_rad());
        let x = r * lat.cos() * (lng - lng0).sin();
        let y = r * (lat0.cos() * lat.sin() - lat0.sin() * lat.cos() * (lng - lng0).cos());
        [self.size_px[0] * 0.5 + x, self.size_px[1] * 0.5 - y]
    }

    fn query_visible_ids(&self, layer: &str) -> HashSet<HotspotId> {
        if layer != HOTSPOT_CIRCLE_LAYER {
            return HashSet::new();
        }
        let viewport = ScreenRect::from_size(self.size_px);
        self.features
            .iter()
            .filter(|(_, p)| self.facing(*p) >= 0.0 && viewport.contains(self.project(*p)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn viewport_size(&self) -> [f64; 2] {
        self.size_px
    }
}

fn wrap_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 { 180.0 } else { wrapped }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
