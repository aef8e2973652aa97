//! IPC module - Snapshot cell, output sinks, hover trigger and diagnostic log

pub mod channels;
pub mod latest;
pub mod shared_resource;

use crate::command::{IndicatorSignal, VelocityCommand};
use crate::error::SinkError;

/// Destination for the velocity command published every tick.
///
/// Implementations must not block; a full or closed sink reports an error
/// and the loop moves on to the next tick.
pub trait CommandSink: Send {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError>;
}

/// Destination for the cosmetic indicator signal.
pub trait IndicatorSink: Send {
    fn signal(&mut self, signal: &IndicatorSignal) -> Result<(), SinkError>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        (**self).publish(command)
    }
}

impl<S: IndicatorSink + ?Sized> IndicatorSink for Box<S> {
    fn signal(&mut self, signal: &IndicatorSignal) -> Result<(), SinkError> {
        (**self).signal(signal)
    }
}

/// Indicator sink for setups without an indicator light.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl IndicatorSink for NoIndicator {
    fn signal(&mut self, _signal: &IndicatorSignal) -> Result<(), SinkError> {
        Ok(())
    }
}
