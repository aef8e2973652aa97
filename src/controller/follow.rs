use std::time::Instant;

use super::pid::AxisPid;
use super::Axis;
use crate::command::{CommandLimits, IndicatorSignal, LoopMode, VelocityCommand};
use crate::config::FollowConfig;
use crate::telemetry::TelemetrySnapshot;

/// Target values for the three controlled axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoints {
    pub horizontal: f32,
    pub vertical: f32,
    pub distance: f32,
}

impl Default for Setpoints {
    fn default() -> Self {
        Self {
            horizontal: 500.0,
            vertical: 500.0,
            distance: 100.0,
        }
    }
}

/// Result of evaluating one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub command: VelocityCommand,
    pub mode: LoopMode,
    /// Signal to raise this tick, present only while tracking.
    pub indicator: Option<IndicatorSignal>,
    pub dt: f32,
}

/// Three independent axis controllers mapping marker error to a body-frame
/// velocity command.
///
/// * horizontal pixel error drives `angular_z`
/// * vertical pixel error drives `linear_z`
/// * distance error drives `linear_x`, negated
pub struct FollowController {
    horizontal: AxisPid,
    vertical: AxisPid,
    depth: AxisPid,
    setpoints: Setpoints,
    limits: Option<CommandLimits>,
    indicator: IndicatorSignal,
    last_tick: Option<Instant>,
}

impl FollowController {
    pub fn new(horizontal: AxisPid, vertical: AxisPid, depth: AxisPid, setpoints: Setpoints) -> Self {
        Self {
            horizontal,
            vertical,
            depth,
            setpoints,
            limits: None,
            indicator: IndicatorSignal::default(),
            last_tick: None,
        }
    }

    pub fn from_config(config: &FollowConfig) -> Self {
        let setpoints = Setpoints {
            horizontal: config.horizontal.setpoint,
            vertical: config.vertical.setpoint,
            distance: config.depth.setpoint,
        };
        Self::new(
            AxisPid::from_gains(config.horizontal.gains()),
            AxisPid::from_gains(config.vertical.gains()),
            AxisPid::from_gains(config.depth.gains()),
            setpoints,
        )
        .with_limits(config.limits.active())
        .with_indicator(config.indicator.signal())
    }

    pub fn with_limits(mut self, limits: Option<CommandLimits>) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_indicator(mut self, indicator: IndicatorSignal) -> Self {
        self.indicator = indicator;
        self
    }

    /// Evaluate a tick at `now`, deriving `dt` from the previous tick.
    /// The first tick runs with `dt = 0`.
    pub fn tick(&mut self, now: Instant, snapshot: Option<&TelemetrySnapshot>) -> TickOutput {
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.step(snapshot, dt)
    }

    /// Evaluate a tick with an explicit `dt` in seconds.
    pub fn step(&mut self, snapshot: Option<&TelemetrySnapshot>, dt: f32) -> TickOutput {
        let mut command = VelocityCommand::hover();

        let Some(target) = snapshot.and_then(TelemetrySnapshot::tracked_target) else {
            return TickOutput {
                command,
                mode: LoopMode::Idle,
                indicator: None,
                dt,
            };
        };

        command.angular_z = self
            .horizontal
            .update(self.setpoints.horizontal, target.horizontal_offset, dt);
        command.linear_z = self
            .vertical
            .update(self.setpoints.vertical, target.vertical_offset, dt);
        command.linear_x = -self.depth.update(self.setpoints.distance, target.distance, dt);

        if let Some(limits) = &self.limits {
            command = command.clamped(limits);
        }

        TickOutput {
            command,
            mode: LoopMode::Tracking,
            indicator: Some(self.indicator),
            dt,
        }
    }

    pub fn setpoints(&self) -> Setpoints {
        self.setpoints
    }

    pub fn axis(&self, axis: Axis) -> &AxisPid {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
            Axis::Depth => &self.depth,
        }
    }
}
