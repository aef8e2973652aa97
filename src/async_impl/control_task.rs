use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::controller::control_loop::ControlLoop;
use crate::ipc::channels::HoverRequest;
use crate::ipc::shared_resource::LogSource;
use crate::ipc::{CommandSink, IndicatorSink};

/// Drive `control_loop` from a tokio interval until `shutdown` flips to
/// `true` (or its sender is dropped). Returns the loop so callers can
/// inspect its final state.
///
/// A zero `period` is refused: the loop is logged and returned without
/// ticking.
pub async fn run_control_task<C, I>(
    mut control_loop: ControlLoop<C, I>,
    period: Duration,
    mut hover_rx: mpsc::Receiver<HoverRequest>,
    mut shutdown: watch::Receiver<bool>,
) -> ControlLoop<C, I>
where
    C: CommandSink,
    I: IndicatorSink,
{
    let metrics = control_loop.metrics();
    let log = control_loop.log().clone();

    if period.is_zero() {
        log.log(LogSource::System, "async control loop refused a zero period");
        return control_loop;
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_tick = None;
    let mut hover_open = true;

    log.log(
        LogSource::System,
        format!("async control loop started ({:?} period)", period),
    );

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            request = hover_rx.recv(), if hover_open => match request {
                Some(HoverRequest) => {
                    let _ = control_loop.hover();
                }
                None => hover_open = false,
            },
            instant = ticker.tick() => {
                let now = instant.into_std();
                if let Some(last) = last_tick {
                    metrics.record_tick_interval(now - last, period);
                }
                last_tick = Some(now);
                control_loop.tick(now);
            }
        }
    }

    log.log(LogSource::System, "async control loop shutting down");
    control_loop
}
