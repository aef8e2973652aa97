use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::ipc::latest::LatestCell;
use crate::ipc::shared_resource::{DiagnosticLog, LogSource};
use crate::telemetry::generator::{ArrivalJitter, TagTelemetryGenerator};
use crate::telemetry::TelemetrySnapshot;

/// Feed generated telemetry into `cell` at irregular intervals until
/// `shutdown` is raised.
pub fn spawn_telemetry_thread(
    mut generator: TagTelemetryGenerator,
    cell: LatestCell<TelemetrySnapshot>,
    diagnostic_log: DiagnosticLog,
    jitter: ArrivalJitter,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(jitter.seed);
        let mut lost = false;

        while !shutdown.load(Ordering::Relaxed) {
            let snapshot = generator.generate();

            let now_lost = snapshot.target_count != 1;
            if now_lost != lost {
                diagnostic_log.log(
                    LogSource::Telemetry,
                    format!(
                        "seq {}: {} target(s) in view",
                        snapshot.sequence_id, snapshot.target_count
                    ),
                );
                lost = now_lost;
            }

            cell.store(snapshot);
            thread::sleep(jitter.next_interval(&mut rng));
        }

        diagnostic_log.log(
            LogSource::Telemetry,
            format!("feed stopped after {} samples", generator.sequence()),
        );
    })
}
