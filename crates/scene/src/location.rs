use std::time::Duration;

use foundation::math::GeoPoint;

/// How long a location request may take before it counts as a timeout.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The platform has no location capability.
    Unavailable,
    /// The user refused the permission prompt.
    Denied,
    /// No fix arrived before the deadline.
    Timeout,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Unavailable => write!(f, "location is unavailable on this device"),
            LocationError::Denied => write!(f, "location permission denied"),
            LocationError::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Permission-gated location sensor.
///
/// Implementations should resolve within `timeout`; callers still enforce the
/// deadline themselves, so a provider that ignores it only costs a
/// [`LocationError::Timeout`].
pub trait LocationProvider {
    fn request_location(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send;
}
