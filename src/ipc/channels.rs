use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;

use super::{CommandSink, IndicatorSink};
use crate::command::{IndicatorSignal, VelocityCommand};
use crate::error::SinkError;

/// External request to publish one zero command immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverRequest;

#[derive(Clone)]
pub struct FollowChannels {
    // Control loop -> vehicle
    pub command_tx: Sender<VelocityCommand>,
    pub command_rx: Arc<Receiver<VelocityCommand>>,

    // Control loop -> indicator light
    pub indicator_tx: Sender<IndicatorSignal>,
    pub indicator_rx: Arc<Receiver<IndicatorSignal>>,

    // Operator -> control loop
    pub hover_tx: Sender<HoverRequest>,
    pub hover_rx: Arc<Receiver<HoverRequest>>,
}

impl FollowChannels {
    pub fn new(buffer_size: usize) -> Self {
        let (command_tx, command_rx) = bounded(buffer_size);
        let (indicator_tx, indicator_rx) = bounded(buffer_size);
        let (hover_tx, hover_rx) = bounded(buffer_size);

        Self {
            command_tx,
            command_rx: Arc::new(command_rx),
            indicator_tx,
            indicator_rx: Arc::new(indicator_rx),
            hover_tx,
            hover_rx: Arc::new(hover_rx),
        }
    }

    pub fn command_sink(&self) -> ChannelCommandSink {
        ChannelCommandSink {
            tx: self.command_tx.clone(),
        }
    }

    pub fn indicator_sink(&self) -> ChannelIndicatorSink {
        ChannelIndicatorSink {
            tx: self.indicator_tx.clone(),
        }
    }
}

fn map_send_error<T>(err: TrySendError<T>) -> SinkError {
    match err {
        TrySendError::Full(_) => SinkError::Full,
        TrySendError::Disconnected(_) => SinkError::Disconnected,
    }
}

/// Non-blocking command sink over a bounded crossbeam channel.
#[derive(Clone)]
pub struct ChannelCommandSink {
    tx: Sender<VelocityCommand>,
}

impl ChannelCommandSink {
    pub fn new(tx: Sender<VelocityCommand>) -> Self {
        Self { tx }
    }
}

impl CommandSink for ChannelCommandSink {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        self.tx.try_send(*command).map_err(map_send_error)
    }
}

/// Non-blocking indicator sink over a bounded crossbeam channel.
#[derive(Clone)]
pub struct ChannelIndicatorSink {
    tx: Sender<IndicatorSignal>,
}

impl ChannelIndicatorSink {
    pub fn new(tx: Sender<IndicatorSignal>) -> Self {
        Self { tx }
    }
}

impl IndicatorSink for ChannelIndicatorSink {
    fn signal(&mut self, signal: &IndicatorSignal) -> Result<(), SinkError> {
        self.tx.try_send(*signal).map_err(map_send_error)
    }
}
