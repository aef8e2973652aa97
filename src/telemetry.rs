//! Telemetry module - Marker tracking samples consumed by the control loop

pub mod generator;

use std::time::Instant;

// ============================================================================
// TELEMETRY SNAPSHOT - Latest tracking sample, replaced wholesale on arrival
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TelemetrySnapshot {
    pub received_at: Instant,
    pub sequence_id: u64,
    /// Number of markers the tracker currently sees.
    pub target_count: u32,
    /// Horizontal marker position in pixels. Only meaningful when `target_count == 1`.
    pub horizontal_offset: f32,
    /// Vertical marker position in pixels. Only meaningful when `target_count == 1`.
    pub vertical_offset: f32,
    /// Estimated marker distance. Only meaningful when `target_count == 1`.
    pub distance: f32,
}

impl TelemetrySnapshot {
    pub fn tracking(sequence_id: u64, horizontal_offset: f32, vertical_offset: f32, distance: f32) -> Self {
        Self {
            received_at: Instant::now(),
            sequence_id,
            target_count: 1,
            horizontal_offset,
            vertical_offset,
            distance,
        }
    }

    /// A sample without a usable single target (`target_count` of 0 or several).
    pub fn without_target(sequence_id: u64, target_count: u32) -> Self {
        Self {
            received_at: Instant::now(),
            sequence_id,
            target_count,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            distance: 0.0,
        }
    }

    /// The observed marker, if exactly one is being tracked.
    pub fn tracked_target(&self) -> Option<TargetObservation> {
        if self.target_count == 1 {
            Some(TargetObservation {
                horizontal_offset: self.horizontal_offset,
                vertical_offset: self.vertical_offset,
                distance: self.distance,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetObservation {
    pub horizontal_offset: f32,
    pub vertical_offset: f32,
    pub distance: f32,
}
