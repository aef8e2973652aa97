pub mod async_impl;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod ipc;
pub mod metrics;
pub mod telemetry;
pub mod threaded_impl;
pub mod visualization;

pub use command::{CommandLimits, IndicatorSignal, LoopMode, VelocityCommand};
pub use config::{load_config, FollowConfig};
pub use controller::control_loop::{ControlLoop, LoopCounters, LoopStats};
pub use controller::follow::{FollowController, Setpoints, TickOutput};
pub use controller::pid::{AxisPid, PidGains};
pub use controller::Axis;
pub use error::{ConfigError, SinkError};
pub use ipc::channels::{FollowChannels, HoverRequest};
pub use ipc::latest::LatestCell;
pub use ipc::shared_resource::{DiagnosticLog, LogSource};
pub use ipc::{CommandSink, IndicatorSink, NoIndicator};
pub use telemetry::generator::TagTelemetryGenerator;
pub use telemetry::TelemetrySnapshot;
