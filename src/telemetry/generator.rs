use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::TelemetrySnapshot;

/// Simulated marker tracker: a bounded random walk around the frame centre
/// with occasional lost and duplicated targets.
pub struct TagTelemetryGenerator {
    rng: StdRng,
    sequence_counter: u64,
    horizontal: f32,
    vertical: f32,
    distance: f32,
    pub centre: (f32, f32),
    pub nominal_distance: f32,
    pub step_pixels: f32,
    pub step_distance: f32,
    pub max_excursion_pixels: f32,
    pub dropout_probability: f64,
    pub multi_target_probability: f64,
}

impl TagTelemetryGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sequence_counter: 0,
            horizontal: 500.0,
            vertical: 500.0,
            distance: 100.0,
            centre: (500.0, 500.0),
            nominal_distance: 100.0,
            step_pixels: 25.0,
            step_distance: 5.0,
            max_excursion_pixels: 400.0,
            dropout_probability: 0.0,
            multi_target_probability: 0.0,
        }
    }

    pub fn with_dropout(mut self, dropout_probability: f64, multi_target_probability: f64) -> Self {
        self.dropout_probability = dropout_probability.clamp(0.0, 1.0);
        self.multi_target_probability = multi_target_probability.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&mut self) -> TelemetrySnapshot {
        self.sequence_counter += 1;

        let roll: f64 = self.rng.gen();
        if roll < self.dropout_probability {
            return TelemetrySnapshot::without_target(self.sequence_counter, 0);
        }
        if roll < self.dropout_probability + self.multi_target_probability {
            return TelemetrySnapshot::without_target(self.sequence_counter, 2);
        }

        let max = self.max_excursion_pixels;
        self.horizontal = (self.horizontal + self.rng.gen_range(-self.step_pixels..=self.step_pixels))
            .clamp(self.centre.0 - max, self.centre.0 + max);
        self.vertical = (self.vertical + self.rng.gen_range(-self.step_pixels..=self.step_pixels))
            .clamp(self.centre.1 - max, self.centre.1 + max);
        self.distance = (self.distance + self.rng.gen_range(-self.step_distance..=self.step_distance))
            .clamp(self.nominal_distance * 0.25, self.nominal_distance * 4.0);

        TelemetrySnapshot::tracking(self.sequence_counter, self.horizontal, self.vertical, self.distance)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Shift the marker, e.g. to emulate the target jumping in the frame.
    pub fn inject_disturbance(&mut self, horizontal_delta: f32, vertical_delta: f32, distance_delta: f32) {
        self.horizontal += horizontal_delta;
        self.vertical += vertical_delta;
        self.distance += distance_delta;
    }
}

/// Arrival-time spread of the simulated tracker.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalJitter {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub seed: u64,
}

impl ArrivalJitter {
    pub fn next_interval(&self, rng: &mut StdRng) -> Duration {
        if self.max_interval <= self.min_interval {
            return self.min_interval;
        }
        rng.gen_range(self.min_interval..=self.max_interval)
    }
}
