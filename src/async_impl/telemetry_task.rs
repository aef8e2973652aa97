use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::ipc::latest::LatestCell;
use crate::telemetry::generator::{ArrivalJitter, TagTelemetryGenerator};
use crate::telemetry::TelemetrySnapshot;

/// Async counterpart of the telemetry thread.
pub async fn run_telemetry_task(
    mut generator: TagTelemetryGenerator,
    cell: LatestCell<TelemetrySnapshot>,
    jitter: ArrivalJitter,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut rng = StdRng::seed_from_u64(jitter.seed);

    loop {
        cell.store(generator.generate());

        tokio::select! {
            _ = sleep(jitter.next_interval(&mut rng)) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    generator.sequence()
}
