//! Metrics module - Tick timing and telemetry freshness statistics

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn histogram() -> Arc<Mutex<Histogram<u64>>> {
    // 3 significant figures is always within hdrhistogram's supported range
    Arc::new(Mutex::new(
        Histogram::new(3).expect("valid histogram precision"),
    ))
}

// ============================================================================
// TIMING METRICS - Thread-safe tick tracking
// ============================================================================

#[derive(Clone)]
pub struct TimingMetrics {
    tick_hist: Arc<Mutex<Histogram<u64>>>,
    // Deviation of the actual tick interval from the nominal period
    jitter_hist: Arc<Mutex<Histogram<u64>>>,
    // Age of the snapshot consumed by a tracking tick
    telemetry_age_hist: Arc<Mutex<Histogram<u64>>>,
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self {
            tick_hist: histogram(),
            jitter_hist: histogram(),
            telemetry_age_hist: histogram(),
        }
    }

    pub fn record_tick(&self, duration: Duration) {
        self.tick_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn record_tick_interval(&self, interval: Duration, period: Duration) {
        let jitter = if interval > period {
            interval - period
        } else {
            period - interval
        };
        self.jitter_hist.lock().record(jitter.as_nanos() as u64).ok();
    }

    pub fn record_telemetry_age(&self, age: Duration) {
        self.telemetry_age_hist.lock().record(age.as_nanos() as u64).ok();
    }

    pub fn report(&self) -> MetricsReport {
        let tick = self.tick_hist.lock();
        let jitter = self.jitter_hist.lock();
        let age = self.telemetry_age_hist.lock();

        MetricsReport {
            ticks_recorded: tick.len(),
            tick_p50: Duration::from_nanos(tick.value_at_quantile(0.5)),
            tick_p99: Duration::from_nanos(tick.value_at_quantile(0.99)),
            jitter_p50: Duration::from_nanos(jitter.value_at_quantile(0.5)),
            jitter_p99: Duration::from_nanos(jitter.value_at_quantile(0.99)),
            telemetry_age_p50: Duration::from_nanos(age.value_at_quantile(0.5)),
            telemetry_age_p99: Duration::from_nanos(age.value_at_quantile(0.99)),
        }
    }
}

// ============================================================================
// METRICS REPORT - Summary statistics
// ============================================================================

#[derive(Debug)]
pub struct MetricsReport {
    pub ticks_recorded: u64,
    pub tick_p50: Duration,
    pub tick_p99: Duration,
    pub jitter_p50: Duration,
    pub jitter_p99: Duration,
    pub telemetry_age_p50: Duration,
    pub telemetry_age_p99: Duration,
}
