use crossbeam::channel::Receiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use drone_follow::async_impl::{control_task::run_control_task, telemetry_task::run_telemetry_task};
use drone_follow::config::Runtime;
use drone_follow::ipc::channels::{ChannelCommandSink, ChannelIndicatorSink};
use drone_follow::metrics::TimingMetrics;
use drone_follow::threaded_impl::{control_thread::spawn_control_thread, telemetry_thread::spawn_telemetry_thread};
use drone_follow::visualization::{render_command_trace, TraceSample};
use drone_follow::{
    load_config, Axis, ControlLoop, DiagnosticLog, FollowChannels, FollowConfig, FollowController,
    HoverRequest, IndicatorSignal, LatestCell, LogSource, TelemetrySnapshot, VelocityCommand,
};

const CONFIG_PATH: &str = "config/follow.toml";

type ChannelLoop = ControlLoop<ChannelCommandSink, ChannelIndicatorSink>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("===========================================");
    println!("Starting Marker Follow Controller");
    println!("===========================================\n");

    let (config, config_note) = match load_config(CONFIG_PATH) {
        Ok(config) => (config, format!("loaded {}", CONFIG_PATH)),
        Err(err) => (FollowConfig::default(), format!("{} - using defaults", err)),
    };

    let log = DiagnosticLog::new(config.log.capacity).with_echo(config.log.echo);
    log.log(LogSource::System, config_note);

    let channels = FollowChannels::new(256);
    let telemetry = LatestCell::new();
    let metrics = TimingMetrics::new();

    let control_loop = ControlLoop::new(
        FollowController::from_config(&config),
        telemetry.clone(),
        channels.command_sink(),
        channels.indicator_sink(),
        log.clone(),
    )
    .with_metrics(metrics.clone());

    // Stand-in for the vehicle and its indicator light
    let recorder = spawn_recorder(
        (*channels.command_rx).clone(),
        (*channels.indicator_rx).clone(),
    );

    let run_for = Duration::from_secs(config.simulation.run_seconds);
    let control_loop = match config.simulation.runtime {
        Runtime::Threaded => run_threaded(&config, control_loop, &channels, telemetry, &log, run_for),
        Runtime::Async => run_async(&config, control_loop, telemetry, run_for)?,
    };

    let counters = control_loop.stats().counters();
    println!("\n===========================================");
    println!("FOLLOW CONTROLLER RESULTS");
    println!("===========================================");
    println!("Ticks: {} (tracking {}, idle {})", counters.ticks, counters.tracking_ticks, counters.idle_ticks);
    println!("Hover requests: {}", counters.hovers);
    println!("Publish failures: {}", counters.publish_failures);
    println!("Indicator failures: {}", counters.indicator_failures);
    println!("Overruns: {}", counters.overruns);
    for axis in Axis::ALL {
        let pid = control_loop.controller().axis(axis);
        println!("- {}: integral {:.3}, last error {:.2}", axis, pid.integral(), pid.prev_error());
    }

    // Dropping the loop closes its sinks and lets the recorder finish
    drop(control_loop);
    drop(channels);
    let (samples, signals) = recorder.join().map_err(|_| "recorder thread panicked")?;
    println!("Commands received: {}, indicator signals: {}", samples.len(), signals);

    let report = metrics.report();
    println!("\n=== Timing Metrics ===");
    println!("Tick P50: {:?}, P99: {:?}", report.tick_p50, report.tick_p99);
    println!("Jitter P50: {:?}, P99: {:?}", report.jitter_p50, report.jitter_p99);
    println!("Telemetry age P50: {:?}, P99: {:?}", report.telemetry_age_p50, report.telemetry_age_p99);

    if let Some(path) = &config.simulation.chart_path {
        match render_command_trace(&samples, path) {
            Ok(()) => println!("Command trace written to {}", path),
            Err(err) => println!("Command trace not written: {}", err),
        }
    }

    Ok(())
}

fn run_threaded(
    config: &FollowConfig,
    control_loop: ChannelLoop,
    channels: &FollowChannels,
    telemetry: LatestCell<TelemetrySnapshot>,
    log: &DiagnosticLog,
    run_for: Duration,
) -> ChannelLoop {
    let feed_shutdown = Arc::new(AtomicBool::new(false));
    let feed_handle = spawn_telemetry_thread(
        config.simulation.generator(),
        telemetry,
        log.clone(),
        config.simulation.arrival_jitter(),
        feed_shutdown.clone(),
    );
    let (control_handle, stats) = spawn_control_thread(control_loop, channels.hover_rx.clone(), config.period());

    println!("System running for {:?}...\n", run_for);
    thread::sleep(run_for / 2);
    if channels.hover_tx.send(HoverRequest).is_err() {
        log.log(LogSource::System, "hover request could not be delivered");
    }
    thread::sleep(run_for - run_for / 2);

    log.log(LogSource::System, "initiating shutdown");
    feed_shutdown.store(true, Ordering::Relaxed);
    stats.request_shutdown();

    if let Err(panic) = feed_handle.join() {
        std::panic::resume_unwind(panic);
    }
    match control_handle.join() {
        Ok(control_loop) => control_loop,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn run_async(
    config: &FollowConfig,
    control_loop: ChannelLoop,
    telemetry: LatestCell<TelemetrySnapshot>,
    run_for: Duration,
) -> Result<ChannelLoop, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        let (hover_tx, hover_rx) = tokio::sync::mpsc::channel(8);

        let feed = tokio::spawn(run_telemetry_task(
            config.simulation.generator(),
            telemetry,
            config.simulation.arrival_jitter(),
            shutdown_rx.clone(),
        ));
        let control = tokio::spawn(run_control_task(control_loop, config.period(), hover_rx, shutdown_rx));

        println!("System running for {:?} (async)...\n", run_for);
        tokio::time::sleep(run_for / 2).await;
        let _ = hover_tx.send(HoverRequest).await;
        tokio::time::sleep(run_for - run_for / 2).await;

        let _ = shutdown_tx.send(true);
        let samples = feed.await?;
        println!("Telemetry samples produced: {}", samples);
        Ok::<_, Box<dyn std::error::Error>>(control.await?)
    })
}

fn spawn_recorder(
    command_rx: Receiver<VelocityCommand>,
    indicator_rx: Receiver<IndicatorSignal>,
) -> thread::JoinHandle<(Vec<TraceSample>, u64)> {
    thread::spawn(move || {
        let start = Instant::now();
        let sample = |command| TraceSample {
            t: start.elapsed().as_secs_f64(),
            command,
        };
        let mut samples = Vec::new();
        let mut signals = 0u64;
        let mut indicator_open = true;

        while indicator_open {
            crossbeam::select! {
                recv(command_rx) -> msg => match msg {
                    Ok(command) => samples.push(sample(command)),
                    Err(_) => return (samples, signals),
                },
                recv(indicator_rx) -> msg => match msg {
                    Ok(_) => signals += 1,
                    Err(_) => indicator_open = false,
                },
            }
        }

        samples.extend(command_rx.iter().map(sample));
        (samples, signals)
    })
}
