//! Module: receiver
//!
//! Purpose: the deadline-monitored consumer.
//!
//! The receiver alternates between two states: WAITING, where it blocks on
//! the handoff signal with a budget measured from the previous processing
//! event, and a transient PROCESSING, where it copies the completed
//! message out of the slot and relays it to the log port.
//!
//! The deadline window is measured from the previous *processing* event,
//! not the previous arrival: "a new message must be ready within P ticks
//! of the last time we finished processing". That ties the consumer's
//! liveness directly to the producer's known period without any cross-task
//! configuration beyond the shared constant P.
//!
//! A timeout is an unrecoverable real-time fault. The receiver emits one
//! fixed diagnostic and the system halts permanently; a halted relay
//! produces no further observable behavior.

use crate::fault::{FaultCode, FaultState};
use crate::handoff::{HandoffSignal, RawBinarySignal, WaitOutcome};
use crate::logging::SerialLog;
use crate::message::{Message, MessageSlot};
use crate::serial::ByteTx;
use crate::timing::{DeadlineWindow, Tick, TickClock};

/// Fixed diagnostic emitted exactly once when the deadline is missed.
pub const DEADLINE_DIAGNOSTIC: &str = "RX Task Missed a Deadline!\r\n";

/// Fatal receiver error: no handoff arrived within the deadline window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadlineMissed {
    /// Tick at which the wait expired.
    pub at_tick: Tick,
}

/// The deadline-monitored consumer task.
pub struct ReceiverTask<'a, S: RawBinarySignal> {
    slot: &'a MessageSlot,
    signal: &'a HandoffSignal<S>,
    fault: &'a FaultState,
    window: DeadlineWindow,
    processed: u32,
}

impl<'a, S: RawBinarySignal> ReceiverTask<'a, S> {
    /// Build the receiver with its first deadline window opening at
    /// `start_tick`.
    pub fn new(
        slot: &'a MessageSlot,
        signal: &'a HandoffSignal<S>,
        fault: &'a FaultState,
        start_tick: Tick,
        period: Tick,
    ) -> Self {
        Self {
            slot,
            signal,
            fault,
            window: DeadlineWindow::new(start_tick, period),
            processed: 0,
        }
    }

    /// One WAITING → PROCESSING cycle.
    ///
    /// On a signal: records the processing event, copies the message out
    /// of the slot, relays it to the log, and returns it. On timeout:
    /// latches the fault, emits the fixed diagnostic (first latch only),
    /// and returns the fatal error.
    ///
    /// Once the fault has latched, returns the error immediately without
    /// touching the signal or the log.
    pub fn step<C: TickClock, T: ByteTx>(
        &mut self,
        clock: &C,
        log: &mut SerialLog<T>,
    ) -> Result<Message, DeadlineMissed> {
        if self.fault.is_active() {
            return Err(DeadlineMissed {
                at_tick: self.fault.at_tick(),
            });
        }

        let wait = self.window.remaining(clock.now());
        match self.signal.wait_with_timeout(wait) {
            WaitOutcome::Signaled => {
                let now = clock.now();
                self.window.record_event(now);

                // Ownership of the slot contents is ours from the signal
                // until we return; the copy must complete here.
                let msg = self.slot.snapshot();
                log.relay(&msg);
                self.processed = self.processed.wrapping_add(1);
                Ok(msg)
            }
            WaitOutcome::TimedOut => {
                let now = clock.now();
                if self.fault.latch(FaultCode::DeadlineMissed, now) {
                    log.diagnostic(DEADLINE_DIAGNOSTIC);
                }
                Err(DeadlineMissed { at_tick: now })
            }
        }
    }

    /// Task entry point: consume until the deadline is missed, then halt
    /// permanently. The halt is the kernel's job; nothing observable
    /// happens after the diagnostic has gone out.
    pub fn run<C: TickClock, T: ByteTx, H: FnOnce() -> !>(
        mut self,
        clock: &C,
        log: &mut SerialLog<T>,
        halt: H,
    ) -> ! {
        while self.step(clock, log).is_ok() {}
        halt()
    }

    /// Messages processed so far.
    pub fn processed(&self) -> u32 {
        self.processed
    }

    /// The current deadline window.
    pub fn window(&self) -> &DeadlineWindow {
        &self.window
    }
}
