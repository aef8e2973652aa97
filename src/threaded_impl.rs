//! Thread-per-schedule runtime: one control thread, one telemetry thread

pub mod control_thread;
pub mod telemetry_thread;
