//! Configuration loading - gains, setpoints, tick period and demo settings

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use serde::Deserialize;

use crate::command::{CommandLimits, IndicatorSignal};
use crate::controller::pid::PidGains;
use crate::error::ConfigError;
use crate::telemetry::generator::{ArrivalJitter, TagTelemetryGenerator};

/// Full controller configuration.
///
/// Every key is optional in the file. Missing keys, including single gains
/// inside an axis section, keep the per-axis defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawFollowConfig")]
pub struct FollowConfig {
    pub period_ms: u64,
    pub horizontal: AxisConfig,
    pub vertical: AxisConfig,
    pub depth: AxisConfig,
    pub limits: LimitsConfig,
    pub indicator: IndicatorConfig,
    pub log: LogConfig,
    pub simulation: SimulationConfig,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            period_ms: 50,
            horizontal: AxisConfig::new(0.002, 0.0, 0.0, 500.0),
            vertical: AxisConfig::new(0.001, 0.0, 0.0, 500.0),
            depth: AxisConfig::new(0.003, 0.0, 0.006, 100.0),
            limits: LimitsConfig::default(),
            indicator: IndicatorConfig::default(),
            log: LogConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl FollowConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_ms == 0 {
            return Err(ConfigError::Invalid("period_ms must be greater than zero".into()));
        }
        for (name, axis) in [
            ("horizontal", &self.horizontal),
            ("vertical", &self.vertical),
            ("depth", &self.depth),
        ] {
            let values = [axis.kp, axis.ki, axis.kd, axis.setpoint];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{} gains and setpoint must be finite",
                    name
                )));
            }
        }
        let limits = [self.limits.angular_z, self.limits.linear_x, self.limits.linear_z];
        if limits.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(ConfigError::Invalid("limits must be finite and positive".into()));
        }
        let sim = &self.simulation;
        if sim.telemetry_min_interval_ms > sim.telemetry_max_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "telemetry interval range is empty ({} > {})",
                sim.telemetry_min_interval_ms, sim.telemetry_max_interval_ms
            )));
        }
        Ok(())
    }
}

// File shape: axis sections are merged key by key onto their own defaults
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawFollowConfig {
    period_ms: Option<u64>,
    horizontal: RawAxis,
    vertical: RawAxis,
    depth: RawAxis,
    limits: LimitsConfig,
    indicator: IndicatorConfig,
    log: LogConfig,
    simulation: SimulationConfig,
}

impl From<RawFollowConfig> for FollowConfig {
    fn from(raw: RawFollowConfig) -> Self {
        let defaults = FollowConfig::default();
        Self {
            period_ms: raw.period_ms.unwrap_or(defaults.period_ms),
            horizontal: raw.horizontal.merge(defaults.horizontal),
            vertical: raw.vertical.merge(defaults.vertical),
            depth: raw.depth.merge(defaults.depth),
            limits: raw.limits,
            indicator: raw.indicator,
            log: raw.log,
            simulation: raw.simulation,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawAxis {
    kp: Option<f32>,
    ki: Option<f32>,
    kd: Option<f32>,
    setpoint: Option<f32>,
}

impl RawAxis {
    fn merge(self, base: AxisConfig) -> AxisConfig {
        AxisConfig {
            kp: self.kp.unwrap_or(base.kp),
            ki: self.ki.unwrap_or(base.ki),
            kd: self.kd.unwrap_or(base.kd),
            setpoint: self.setpoint.unwrap_or(base.setpoint),
        }
    }
}

/// Gains and setpoint for one controlled axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub setpoint: f32,
}

impl AxisConfig {
    pub fn new(kp: f32, ki: f32, kd: f32, setpoint: f32) -> Self {
        Self { kp, ki, kd, setpoint }
    }

    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Clamp the assembled command. Off by default.
    pub enforce: bool,
    pub angular_z: f32,
    pub linear_x: f32,
    pub linear_z: f32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            enforce: false,
            angular_z: FRAC_PI_2,
            linear_x: 1.0,
            linear_z: 2.0,
        }
    }
}

impl LimitsConfig {
    /// The limits to apply, or `None` when clamping is disabled.
    pub fn active(&self) -> Option<CommandLimits> {
        self.enforce.then(|| CommandLimits {
            angular_z: self.angular_z,
            linear_x: self.linear_x,
            linear_z: self.linear_z,
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub pattern: u8,
    pub frequency_hz: u32,
    pub duration_s: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        let signal = IndicatorSignal::default();
        Self {
            pattern: signal.pattern,
            frequency_hz: signal.frequency_hz,
            duration_s: signal.duration_s,
        }
    }
}

impl IndicatorConfig {
    pub fn signal(&self) -> IndicatorSignal {
        IndicatorSignal {
            pattern: self.pattern,
            frequency_hz: self.frequency_hz,
            duration_s: self.duration_s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub capacity: usize,
    pub echo: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: 2000,
            echo: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Threaded,
    Async,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub runtime: Runtime,
    pub run_seconds: u64,
    pub seed: u64,
    pub telemetry_min_interval_ms: u64,
    pub telemetry_max_interval_ms: u64,
    pub dropout_probability: f64,
    pub multi_target_probability: f64,
    pub chart_path: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runtime: Runtime::Threaded,
            run_seconds: 10,
            seed: 42,
            telemetry_min_interval_ms: 20,
            telemetry_max_interval_ms: 90,
            dropout_probability: 0.1,
            multi_target_probability: 0.02,
            chart_path: None,
        }
    }
}

impl SimulationConfig {
    pub fn arrival_jitter(&self) -> ArrivalJitter {
        ArrivalJitter {
            min_interval: Duration::from_millis(self.telemetry_min_interval_ms),
            max_interval: Duration::from_millis(self.telemetry_max_interval_ms),
            seed: self.seed.wrapping_add(1),
        }
    }

    pub fn generator(&self) -> TagTelemetryGenerator {
        TagTelemetryGenerator::new(self.seed)
            .with_dropout(self.dropout_probability, self.multi_target_probability)
    }
}

pub fn parse_config(text: &str) -> Result<FollowConfig, ConfigError> {
    let config: FollowConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &str) -> Result<FollowConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.period_ms, 50);
        assert_eq!(config.depth.kd, 0.006);
        assert_eq!(config.simulation.runtime, Runtime::Threaded);
        assert!(config.limits.active().is_none());
    }

    #[test]
    fn partial_axis_section_defaults_missing_gains() {
        let config = parse_config("[vertical]\nkp = 0.5\nsetpoint = 240.0\n").unwrap();
        assert_eq!(config.vertical.gains(), PidGains::new(0.5, 0.0, 0.0));
        assert_eq!(config.vertical.setpoint, 240.0);
        assert_eq!(config.horizontal.setpoint, 500.0);
    }

    #[test]
    fn partial_depth_section_keeps_derivative_gain() {
        let config = parse_config("[depth]\nkp = 0.003\nsetpoint = 100.0\n").unwrap();
        assert_eq!(config.depth.kd, 0.006);
        assert_eq!(config.depth, FollowConfig::default().depth);
    }

    #[test]
    fn kp_only_section_parses() {
        let config = parse_config("period_ms = 20\n[horizontal]\nkp = 0.004\n").unwrap();
        assert_eq!(config.period_ms, 20);
        assert_eq!(config.horizontal, AxisConfig::new(0.004, 0.0, 0.0, 500.0));
        assert_eq!(config.depth.kd, 0.006);
    }
}
