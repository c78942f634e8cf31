//! Module: relay
//!
//! Purpose: the owned relay context.
//!
//! Every resource shared between the interrupt side and the task side
//! (the message slot, the handoff signal, the fault latch) is created
//! once at startup and lives in this one object for the process lifetime.
//! No ambient global state: the interrupt handler and the tasks each
//! borrow exactly the parts they need from here.

use crate::accumulator::RxInterruptHandler;
use crate::config::RelayConfig;
use crate::fault::FaultState;
use crate::handoff::{HandoffSignal, RawBinarySignal};
use crate::message::MessageSlot;
use crate::receiver::ReceiverTask;
use crate::serial::ByteTx;
use crate::timing::Tick;
use crate::transmitter::TransmitterTask;

/// Startup failure with code and message.
///
/// Any of these stops startup before the scheduler runs the relay;
/// there is no degraded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    /// E01: Kernel handoff signal could not be created.
    SignalCreation,
    /// E02: Relay task could not be created.
    TaskCreation,
    /// E03: Serial port setup failed.
    SerialInit,
}

impl StartupError {
    /// Get error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SignalCreation => "E01",
            Self::TaskCreation => "E02",
            Self::SerialInit => "E03",
        }
    }

    /// Get error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SignalCreation => "handoff signal creation failed",
            Self::TaskCreation => "task creation failed",
            Self::SerialInit => "serial port setup failed",
        }
    }
}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The relay's shared state, created once at startup.
pub struct RelayContext<S: RawBinarySignal> {
    config: RelayConfig,
    slot: MessageSlot,
    signal: HandoffSignal<S>,
    fault: FaultState,
}

impl<S: RawBinarySignal> RelayContext<S> {
    /// Build the context around a kernel signal created by the platform.
    pub const fn new(config: RelayConfig, raw_signal: S) -> Self {
        Self {
            config,
            slot: MessageSlot::new(),
            signal: HandoffSignal::new(raw_signal),
            fault: FaultState::new(),
        }
    }

    /// The relay configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The shared message slot.
    pub fn slot(&self) -> &MessageSlot {
        &self.slot
    }

    /// The handoff signal.
    pub fn signal(&self) -> &HandoffSignal<S> {
        &self.signal
    }

    /// The fault latch.
    pub fn fault(&self) -> &FaultState {
        &self.fault
    }

    /// The interrupt-side half: the handler to register with the receive
    /// dispatch collaborator.
    pub fn rx_interrupt_handler(&self) -> RxInterruptHandler<'_, S> {
        RxInterruptHandler::new(&self.slot, &self.signal)
    }

    /// The task-side half: the receiver, with its first deadline window
    /// opening at `start_tick`.
    pub fn receiver(&self, start_tick: Tick) -> ReceiverTask<'_, S> {
        ReceiverTask::new(
            &self.slot,
            &self.signal,
            &self.fault,
            start_tick,
            self.config.period_ticks,
        )
    }

    /// The producer, on this relay's period, first cycle at `start_tick`.
    pub fn transmitter<T: ByteTx>(&self, tx: T, start_tick: Tick) -> TransmitterTask<T> {
        TransmitterTask::new(tx, start_tick, self.config.period_ticks)
    }
}
