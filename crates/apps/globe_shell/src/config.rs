use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use foundation::math::GeoPoint;
use scene::STACK_LIST_SIZE;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless hotspot globe session")]
pub struct Args {
    /// Hotspot feed: a JSON array, or an object with a `hotspots` array
    #[arg(long, env = "GLOBE_CATALOG", default_value = "demos/hotspots.json")]
    pub catalog: PathBuf,

    /// Location reported by the simulated sensor, as `lat,lng`
    #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
    pub location: Option<GeoPoint>,

    /// Make the simulated sensor fail instead of answering
    #[arg(long, value_enum)]
    pub location_failure: Option<SensorFailure>,

    /// Deadline for a location request
    #[arg(long, default_value_t = 10_000)]
    pub location_timeout_ms: u64,

    /// How long the simulated sensor takes to answer
    #[arg(long, default_value_t = 250)]
    pub location_delay_ms: u64,

    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    #[arg(long, default_value_t = 1.5)]
    pub zoom: f64,

    /// Starting camera center, as `lat,lng`
    #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true, default_value = "20,0")]
    pub center: GeoPoint,

    /// Comma-separated session commands, e.g. `scan,next,zoom:5,hover:3,locate,exit`
    #[arg(long, value_delimiter = ',', default_value = "scan,next,prev")]
    pub script: Vec<String>,

    /// Animation frame period
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Frames to run between script commands
    #[arg(long, default_value_t = 30)]
    pub frames_per_step: u32,

    /// Camera flight duration
    #[arg(long, default_value_t = 800)]
    pub fly_ms: u64,

    /// Rows in the final ranked list
    #[arg(long, default_value_t = STACK_LIST_SIZE)]
    pub stack_size: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SensorFailure {
    Denied,
    Unavailable,
    /// Never answers; exercises the timeout.
    Hang,
}

impl Args {
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    pub fn location_delay(&self) -> Duration {
        Duration::from_millis(self.location_delay_ms)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn fly_duration_s(&self) -> f64 {
        self.fly_ms as f64 / 1000.0
    }
}

pub fn parse_geo_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude {lng:?}: {e}"))?;
    let point = GeoPoint::new(lat, lng);
    if !point.is_valid() {
        return Err(format!("coordinate out of range: {s}"));
    }
    Ok(point)
}
