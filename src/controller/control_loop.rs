use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::follow::{FollowController, TickOutput};
use crate::command::{LoopMode, VelocityCommand};
use crate::error::SinkError;
use crate::ipc::latest::LatestCell;
use crate::ipc::shared_resource::{DiagnosticLog, LogSource};
use crate::ipc::{CommandSink, IndicatorSink};
use crate::metrics::TimingMetrics;
use crate::telemetry::TelemetrySnapshot;

pub struct LoopStats {
    pub ticks: AtomicU64,
    pub tracking_ticks: AtomicU64,
    pub idle_ticks: AtomicU64,
    pub hovers: AtomicU64,
    pub publish_failures: AtomicU64,
    pub indicator_failures: AtomicU64,
    pub overruns: AtomicU64,
    pub shutdown: AtomicBool,
}

impl LoopStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ticks: AtomicU64::new(0),
            tracking_ticks: AtomicU64::new(0),
            idle_ticks: AtomicU64::new(0),
            hovers: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            indicator_failures: AtomicU64::new(0),
            overruns: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn counters(&self) -> LoopCounters {
        LoopCounters {
            ticks: self.ticks.load(Ordering::Relaxed),
            tracking_ticks: self.tracking_ticks.load(Ordering::Relaxed),
            idle_ticks: self.idle_ticks.load(Ordering::Relaxed),
            hovers: self.hovers.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            indicator_failures: self.indicator_failures.load(Ordering::Relaxed),
            overruns: self.overruns.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`LoopStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopCounters {
    pub ticks: u64,
    pub tracking_ticks: u64,
    pub idle_ticks: u64,
    pub hovers: u64,
    pub publish_failures: u64,
    pub indicator_failures: u64,
    pub overruns: u64,
}

/// Ties the follow controller to its telemetry cell and output sinks.
///
/// Every call to [`ControlLoop::tick`] publishes exactly one command. Sink
/// failures are counted and logged, never propagated, so the scheduler keeps
/// its cadence. `tick` and `hover` take `&mut self`, which is what keeps two
/// ticks from ever running at the same time.
pub struct ControlLoop<C, I> {
    controller: FollowController,
    telemetry: LatestCell<TelemetrySnapshot>,
    command_sink: C,
    indicator_sink: I,
    log: DiagnosticLog,
    metrics: TimingMetrics,
    stats: Arc<LoopStats>,
    mode: LoopMode,
    publish_failing: bool,
    indicator_failing: bool,
}

impl<C, I> ControlLoop<C, I>
where
    C: CommandSink,
    I: IndicatorSink,
{
    pub fn new(
        controller: FollowController,
        telemetry: LatestCell<TelemetrySnapshot>,
        command_sink: C,
        indicator_sink: I,
        log: DiagnosticLog,
    ) -> Self {
        Self {
            controller,
            telemetry,
            command_sink,
            indicator_sink,
            log,
            metrics: TimingMetrics::new(),
            stats: LoopStats::new(),
            mode: LoopMode::Idle,
            publish_failing: false,
            indicator_failing: false,
        }
    }

    pub fn with_metrics(mut self, metrics: TimingMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn stats(&self) -> Arc<LoopStats> {
        Arc::clone(&self.stats)
    }

    pub fn metrics(&self) -> TimingMetrics {
        self.metrics.clone()
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn controller(&self) -> &FollowController {
        &self.controller
    }

    /// Run one tick at `now`.
    pub fn tick(&mut self, now: Instant) -> TickOutput {
        let started = Instant::now();

        // Read once; the producer may replace the cell at any moment
        let snapshot = self.telemetry.load();
        let output = self.controller.tick(now, snapshot.as_ref());

        self.stats.ticks.fetch_add(1, Ordering::Relaxed);
        match output.mode {
            LoopMode::Tracking => {
                self.stats.tracking_ticks.fetch_add(1, Ordering::Relaxed);
                if let Some(snapshot) = &snapshot {
                    self.metrics
                        .record_telemetry_age(now.saturating_duration_since(snapshot.received_at));
                }
            }
            LoopMode::Idle => {
                self.stats.idle_ticks.fetch_add(1, Ordering::Relaxed);
            }
        }

        if output.mode != self.mode {
            let detail = match &snapshot {
                Some(s) => format!("targets={} seq={}", s.target_count, s.sequence_id),
                None => "no telemetry".to_string(),
            };
            self.log.log(
                LogSource::Loop,
                format!("{} -> {} ({})", self.mode, output.mode, detail),
            );
            self.mode = output.mode;
        }

        if let Some(signal) = &output.indicator {
            let result = self.indicator_sink.signal(signal);
            self.note_indicator(result);
        }

        let result = self.command_sink.publish(&output.command);
        self.note_publish(result, "tick");

        self.metrics.record_tick(started.elapsed());
        output
    }

    /// Publish one zero command right away, outside the tick schedule.
    /// PID state is left untouched.
    pub fn hover(&mut self) -> Result<(), SinkError> {
        self.stats.hovers.fetch_add(1, Ordering::Relaxed);
        self.log.log(LogSource::Loop, "hover requested");

        let result = self.command_sink.publish(&VelocityCommand::hover());
        self.note_publish(result.clone(), "hover");
        result
    }

    fn note_publish(&mut self, result: Result<(), SinkError>, origin: &str) {
        match result {
            Ok(()) => {
                if self.publish_failing {
                    self.log.log(LogSource::Loop, "command sink recovered");
                    self.publish_failing = false;
                }
            }
            Err(err) => {
                self.stats.publish_failures.fetch_add(1, Ordering::Relaxed);
                if !self.publish_failing {
                    self.log
                        .log(LogSource::Loop, format!("{} publish failed: {}", origin, err));
                    self.publish_failing = true;
                }
            }
        }
    }

    fn note_indicator(&mut self, result: Result<(), SinkError>) {
        match result {
            Ok(()) => self.indicator_failing = false,
            Err(err) => {
                self.stats.indicator_failures.fetch_add(1, Ordering::Relaxed);
                if !self.indicator_failing {
                    self.log
                        .log(LogSource::Loop, format!("indicator signal failed: {}", err));
                    self.indicator_failing = true;
                }
            }
        }
    }
}
