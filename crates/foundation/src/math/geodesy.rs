/// Mean Earth radius (IUGG, kilometers).
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.008_8;

/// Geographic coordinate in degrees.
///
/// Latitude is positive north, longitude positive east. Values are not
/// normalized on construction; use [`GeoPoint::is_valid`] at ingestion edges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lng_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }

    pub fn is_valid(&self) -> bool {
        self.lat_deg.is_finite()
            && self.lng_deg.is_finite()
            && (-90.0..=90.0).contains(&self.lat_deg)
            && (-180.0..=180.0).contains(&self.lng_deg)
    }

    pub fn lat_rad(&self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn lng_rad(&self) -> f64 {
        self.lng_deg.to_radians()
    }
}

/// Great-circle distance on a spherical Earth (haversine form).
pub fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lng = (b.lng_deg - a.lng_deg).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (d_lng * 0.5).sin().powi(2);
    // Rounding can push `h` a hair above 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_MEAN_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::{EARTH_MEAN_RADIUS_KM, GeoPoint, great_circle_km};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint::new(63.88, -22.43);
        assert_close(great_circle_km(p, p), 0.0, 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = great_circle_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert_close(d, 111.195, 0.01);
    }

    #[test]
    fn london_to_new_york() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let nyc = GeoPoint::new(40.7128, -74.0060);
        assert_close(great_circle_km(london, nyc), 5_570.0, 10.0);
    }

    #[test]
    fn antipodes_are_half_circumference_apart() {
        let d = great_circle_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert_close(d, std::f64::consts::PI * EARTH_MEAN_RADIUS_KM, 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(-33.86, 151.21);
        let b = GeoPoint::new(35.68, 139.69);
        assert_close(great_circle_km(a, b), great_circle_km(b, a), 1e-9);
    }

    #[test]
    fn validity_rejects_out_of_range_and_nan() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
