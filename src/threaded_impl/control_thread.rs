use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::controller::control_loop::{ControlLoop, LoopStats};
use crate::ipc::channels::HoverRequest;
use crate::ipc::shared_resource::LogSource;
use crate::ipc::{CommandSink, IndicatorSink};

/// Run `control_loop` on its own thread, ticking every `period`.
///
/// Stop it with [`LoopStats::request_shutdown`]; the tick in flight finishes
/// first. Joining the handle hands the loop back.
pub fn spawn_control_thread<C, I>(
    mut control_loop: ControlLoop<C, I>,
    hover_rx: Arc<Receiver<HoverRequest>>,
    period: Duration,
) -> (thread::JoinHandle<ControlLoop<C, I>>, Arc<LoopStats>)
where
    C: CommandSink + 'static,
    I: IndicatorSink + 'static,
{
    let stats = control_loop.stats();

    let handle = thread::spawn(move || {
        run_control_loop(&mut control_loop, &hover_rx, period);
        control_loop
    });

    (handle, stats)
}

/// Fixed-period tick loop with absolute deadlines.
///
/// Hover requests are served on this thread while it waits for the next
/// deadline, so a hover publish never overlaps a tick. When a tick overruns
/// the following deadline the missed slots are dropped rather than replayed.
pub fn run_control_loop<C, I>(
    control_loop: &mut ControlLoop<C, I>,
    hover_rx: &Receiver<HoverRequest>,
    period: Duration,
) where
    C: CommandSink,
    I: IndicatorSink,
{
    let stats = control_loop.stats();
    let metrics = control_loop.metrics();
    let log = control_loop.log().clone();

    log.log(
        LogSource::System,
        format!("control loop started ({:?} period)", period),
    );

    let mut next_tick = Instant::now();
    let mut last_tick: Option<Instant> = None;
    let mut hover_open = true;

    loop {
        if stats.is_shutdown() {
            log.log(LogSource::System, "control loop shutting down");
            break;
        }

        let now = Instant::now();
        if now < next_tick {
            let wait = next_tick - now;
            if hover_open {
                match hover_rx.recv_timeout(wait) {
                    Ok(HoverRequest) => {
                        // failures are counted and logged by the loop
                        let _ = control_loop.hover();
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => hover_open = false,
                }
            } else {
                thread::sleep(wait);
            }
            continue;
        }

        if let Some(last) = last_tick {
            metrics.record_tick_interval(now - last, period);
        }
        last_tick = Some(now);

        control_loop.tick(now);

        next_tick += period;
        let finished = Instant::now();
        if finished >= next_tick {
            let missed = stats.overruns.fetch_add(1, Ordering::Relaxed) + 1;
            log.log(
                LogSource::Loop,
                format!(
                    "tick overran its period ({:?} late, {} overruns)",
                    finished - next_tick,
                    missed
                ),
            );
            next_tick = finished + period;
        }
    }
}
