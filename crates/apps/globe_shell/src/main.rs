mod command;
mod config;
mod location;
mod report;
mod session;
mod view;

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use catalog::{Catalog, CatalogSource, JsonFileSource};
use clap::Parser;
use compute::RankingConfig;
use layers::{
    METRIC_LABELS_PER_PASS, METRIC_LABELS_PLACED, METRIC_PASSES_RUN, METRIC_PASSES_SCHEDULED, METRIC_PASSES_SUPERSEDED,
    PlacementConfig,
};
use scene::{HotspotStore, LocationError};
use serde_json::json;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, parse_script};
use crate::config::{Args, SensorFailure};
use crate::location::{SensorBehavior, SimulatedSensor};
use crate::report::{frame_report, stack_rows};
use crate::session::Session;
use crate::view::GlobeView;

fn sensor_behavior(args: &Args) -> SensorBehavior {
    match (args.location_failure, args.location) {
        (Some(SensorFailure::Denied), _) => SensorBehavior::Fail(LocationError::Denied),
        (Some(SensorFailure::Unavailable), _) | (None, None) => {
            SensorBehavior::Fail(LocationError::Unavailable)
        }
        (Some(SensorFailure::Hang), _) => SensorBehavior::Hang,
        (None, Some(point)) => SensorBehavior::Fix(point),
    }
}

/// Frames to run after `command`; `wait:<n>` adds `n` on top of the step.
fn step_frames(frames_per_step: u32, command: &Command) -> u32 {
    match command {
        Command::Wait(extra) => frames_per_step.saturating_add(*extra),
        _ => frames_per_step,
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let commands = parse_script(&args.script)?;
    let source = JsonFileSource::new(&args.catalog);
    let catalog = Catalog::new(source.fetch()?)?;
    info!(
        path = %args.catalog.display(),
        hotspots = catalog.len(),
        generation = catalog.generation(),
        "catalog loaded"
    );

    let store = HotspotStore::new(Arc::new(catalog), RankingConfig::default());
    let view = GlobeView::new(args.center, args.zoom, [args.width, args.height]);
    let sensor = SimulatedSensor::new(sensor_behavior(&args), args.location_delay());
    let mut session = Session::new(
        store,
        view,
        PlacementConfig::default(),
        Box::new(source),
        sensor,
        args.location_timeout(),
        args.fly_duration_s(),
    );
    session.request_location();

    let dt_s = args.frame_period().as_secs_f64();
    let mut ticker = tokio::time::interval(args.frame_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut out = io::stdout().lock();

    for command in &commands {
        info!(?command, "applying step");
        session.apply(command);
        for _ in 0..step_frames(args.frames_per_step, command) {
            ticker.tick().await;
            if session.tick(dt_s).await {
                let report = frame_report(
                    session.frame().index,
                    session.store(),
                    session.view(),
                    session.layer().placements(),
                );
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            }
        }
    }

    // Let an outstanding flight or location request finish.
    let grace = args.location_timeout().as_secs_f64() + args.fly_duration_s();
    let max_frames = (grace / dt_s).ceil() as u64 + 1;
    for _ in 0..max_frames {
        if session.is_settled() {
            break;
        }
        ticker.tick().await;
        if session.tick(dt_s).await {
            let report = frame_report(
                session.frame().index,
                session.store(),
                session.view(),
                session.layer().placements(),
            );
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
    }

    let stack = session.stack(args.stack_size);
    let summary = json!({
        "user_location": session.store().user_location().map(|p| [p.lat_deg, p.lng_deg]),
        "stack": stack_rows(&stack),
    });
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;

    let metrics = session.layer().metrics();
    let per_pass = metrics.distribution(METRIC_LABELS_PER_PASS).unwrap_or_default();
    info!(
        scheduled = metrics.counter(METRIC_PASSES_SCHEDULED),
        superseded = metrics.counter(METRIC_PASSES_SUPERSEDED),
        run = metrics.counter(METRIC_PASSES_RUN),
        last_labels = metrics.gauge(METRIC_LABELS_PLACED).unwrap_or(0),
        max_labels = per_pass.highest,
        mean_labels = per_pass.mean().unwrap_or(0.0),
        "label placement summary"
    );
    debug!(snapshot = ?metrics.snapshot(), "label metrics");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("GLOBE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "globe_shell failed");
            ExitCode::FAILURE
        }
    }
}
