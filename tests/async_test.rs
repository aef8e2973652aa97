//! Async scheduler tests on tokio's paused clock

use approx::assert_relative_eq;
use drone_follow::async_impl::control_task::run_control_task;
use drone_follow::async_impl::telemetry_task::run_telemetry_task;
use drone_follow::telemetry::generator::ArrivalJitter;
use drone_follow::{
    Axis, AxisPid, CommandSink, ControlLoop, DiagnosticLog, FollowController, HoverRequest,
    LatestCell, NoIndicator, Setpoints, SinkError, TagTelemetryGenerator, TelemetrySnapshot,
    VelocityCommand,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const PERIOD: Duration = Duration::from_millis(50);

#[derive(Clone, Default)]
struct RecordingSink {
    commands: Arc<Mutex<Vec<VelocityCommand>>>,
}

impl CommandSink for RecordingSink {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        self.commands.lock().push(*command);
        Ok(())
    }
}

fn integrating_loop(
    telemetry: &LatestCell<TelemetrySnapshot>,
    sink: RecordingSink,
) -> ControlLoop<RecordingSink, NoIndicator> {
    let controller = FollowController::new(
        AxisPid::new(0.0, 1.0, 0.0),
        AxisPid::new(0.001, 0.0, 0.0),
        AxisPid::new(0.003, 0.0, 0.006),
        Setpoints::default(),
    );
    ControlLoop::new(controller, telemetry.clone(), sink, NoIndicator, DiagnosticLog::new(200))
}

// ============================================================================
// CONTROL TASK
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_control_task_ticks_at_fixed_period() {
    let telemetry = LatestCell::new();
    telemetry.store(TelemetrySnapshot::tracking(1, 600.0, 500.0, 100.0));
    let sink = RecordingSink::default();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_hover_tx, hover_rx) = mpsc::channel(4);
    let task = tokio::spawn(run_control_task(
        integrating_loop(&telemetry, sink.clone()),
        PERIOD,
        hover_rx,
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown_tx.send(true).unwrap();
    let control_loop = task.await.unwrap();

    let counters = control_loop.stats().counters();
    assert!(
        (10..=11).contains(&counters.ticks),
        "Expected 10 or 11 ticks in 500ms, got {}",
        counters.ticks
    );
    assert_eq!(counters.tracking_ticks, counters.ticks);
    assert_eq!(sink.commands.lock().len() as u64, counters.ticks);

    // First tick integrates nothing, every later one adds error * period
    let integral = control_loop.controller().axis(Axis::Horizontal).integral();
    let expected = -100.0 * PERIOD.as_secs_f32() * (counters.ticks - 1) as f32;
    assert_relative_eq!(integral, expected, max_relative = 1e-3);
}

#[tokio::test(start_paused = true)]
async fn test_control_task_serves_hover() {
    let telemetry = LatestCell::new();
    let sink = RecordingSink::default();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (hover_tx, hover_rx) = mpsc::channel(4);
    let task = tokio::spawn(run_control_task(
        integrating_loop(&telemetry, sink.clone()),
        PERIOD,
        hover_rx,
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(120)).await;
    hover_tx.send(HoverRequest).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();
    let control_loop = task.await.unwrap();

    let counters = control_loop.stats().counters();
    assert_eq!(counters.hovers, 1);
    assert_eq!(counters.idle_ticks, counters.ticks, "No telemetry means idle ticks");
    assert_eq!(sink.commands.lock().len() as u64, counters.ticks + 1);
    assert!(control_loop.log().contains("hover requested"));
}

#[tokio::test(start_paused = true)]
async fn test_control_task_stops_when_shutdown_sender_dropped() {
    let telemetry = LatestCell::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_hover_tx, hover_rx) = mpsc::channel(4);
    let task = tokio::spawn(run_control_task(
        integrating_loop(&telemetry, RecordingSink::default()),
        PERIOD,
        hover_rx,
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(shutdown_tx);
    let control_loop = task.await.unwrap();
    assert!(control_loop.log().contains("async control loop shutting down"));
}

#[tokio::test(start_paused = true)]
async fn test_control_task_refuses_zero_period() {
    let telemetry = LatestCell::new();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_hover_tx, hover_rx) = mpsc::channel(4);

    let control_loop = run_control_task(
        integrating_loop(&telemetry, RecordingSink::default()),
        Duration::ZERO,
        hover_rx,
        shutdown_rx,
    )
    .await;

    assert_eq!(control_loop.stats().counters().ticks, 0);
    assert!(control_loop.log().contains("refused a zero period"));
}

// ============================================================================
// TELEMETRY TASK
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_telemetry_task_feeds_cell() {
    let telemetry = LatestCell::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let jitter = ArrivalJitter {
        min_interval: Duration::from_millis(20),
        max_interval: Duration::from_millis(20),
        seed: 3,
    };
    let task = tokio::spawn(run_telemetry_task(
        TagTelemetryGenerator::new(3),
        telemetry.clone(),
        jitter,
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(210)).await;
    shutdown_tx.send(true).unwrap();
    let produced = task.await.unwrap();

    assert!((10..=12).contains(&produced), "Produced {} samples", produced);
    let latest = telemetry.load().expect("cell holds the last sample");
    assert_eq!(latest.sequence_id, produced);
}
