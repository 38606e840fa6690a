use std::time::Duration;

use foundation::math::GeoPoint;
use scene::{LocationError, LocationProvider};
use tracing::debug;

/// What the stand-in sensor does when asked for a fix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SensorBehavior {
    Fix(GeoPoint),
    Fail(LocationError),
    /// Never answers.
    Hang,
}

/// Location sensor stand-in that answers after a fixed delay.
#[derive(Debug, Copy, Clone)]
pub struct SimulatedSensor {
    behavior: SensorBehavior,
    delay: Duration,
}

impl SimulatedSensor {
    pub fn new(behavior: SensorBehavior, delay: Duration) -> Self {
        Self { behavior, delay }
    }
}

impl LocationProvider for SimulatedSensor {
    fn request_location(
        &self,
        _timeout: Duration,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send {
        let Self { behavior, delay } = *self;
        async move {
            tokio::time::sleep(delay).await;
            match behavior {
                SensorBehavior::Fix(point) => Ok(point),
                SensorBehavior::Fail(err) => Err(err),
                SensorBehavior::Hang => std::future::pending().await,
            }
        }
    }
}

/// Asks `provider` for a fix, giving up after `timeout`.
pub async fn acquire_location<P: LocationProvider>(
    provider: &P,
    timeout: Duration,
) -> Result<GeoPoint, LocationError> {
    debug!(timeout_ms = timeout.as_millis() as u64, "requesting user location");
    match tokio::time::timeout(timeout, provider.request_location(timeout)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(LocationError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{SensorBehavior, SimulatedSensor, acquire_location};
    use foundation::math::GeoPoint;
    use scene::LocationError;

    #[tokio::test(start_paused = true)]
    async fn returns_fix_within_deadline() {
        let here = GeoPoint::new(51.5, -0.12);
        let sensor = SimulatedSensor::new(SensorBehavior::Fix(here), Duration::from_millis(300));
        let got = acquire_location(&sensor, Duration::from_secs(10)).await;
        assert_eq!(got, Ok(here));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_sensor_times_out() {
        let sensor = SimulatedSensor::new(SensorBehavior::Hang, Duration::ZERO);
        let got = acquire_location(&sensor, Duration::from_secs(10)).await;
        assert_eq!(got, Err(LocationError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fix_past_deadline_is_a_timeout() {
        let here = GeoPoint::new(0.0, 0.0);
        let sensor = SimulatedSensor::new(SensorBehavior::Fix(here), Duration::from_secs(11));
        let got = acquire_location(&sensor, Duration::from_secs(10)).await;
        assert_eq!(got, Err(LocationError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn denial_passes_through() {
        let sensor = SimulatedSensor::new(
            SensorBehavior::Fail(LocationError::Denied),
            Duration::from_millis(5),
        );
        let got = acquire_location(&sensor, Duration::from_secs(10)).await;
        assert_eq!(got, Err(LocationError::Denied));
    }
}
