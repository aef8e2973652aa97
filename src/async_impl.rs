//! tokio runtime: the control loop and the telemetry feed as async tasks

pub mod control_task;
pub mod telemetry_task;
