//! Module: accumulator
//!
//! Purpose: interrupt-context byte collector. Converts a stream of single
//! received bytes into discrete message boundaries without ever blocking.
//!
//! # Contract
//!
//! `on_byte_received` runs inside the receive interrupt handler. It
//! completes in bounded, constant time and calls nothing that can block or
//! reschedule the interrupted context. Interrupt handling for one source
//! is not re-entrant, so the byte appends of one invocation cannot
//! interleave with another.

use crate::handoff::{HandoffSignal, RawBinarySignal, YieldRequest};
use crate::message::{MessageSlot, MAX_MSG_LEN, MSG_TERMINATOR};

/// Why a message boundary was declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// The terminator byte arrived.
    Terminated,
    /// The buffer reached capacity with no terminator; the message is
    /// flushed as-is. Policy, not a fault.
    Overflow,
}

/// Interrupt-context byte collector.
///
/// Owns the write cursor into the shared [`MessageSlot`]. The cursor stays
/// in `[0, MAX_MSG_LEN)` and resets to zero exactly when a boundary is
/// declared.
pub struct MessageAccumulator<'a> {
    slot: &'a MessageSlot,
    cursor: usize,
}

impl<'a> MessageAccumulator<'a> {
    /// Attach an accumulator to the shared slot.
    pub fn new(slot: &'a MessageSlot) -> Self {
        Self { slot, cursor: 0 }
    }

    /// Append one received byte.
    ///
    /// Returns the boundary kind if this byte completed a message, in
    /// which case the message has been published to the slot and the
    /// cursor reset for the next one.
    #[inline]
    pub fn on_byte_received(&mut self, byte: u8) -> Option<Boundary> {
        self.slot.write_byte(self.cursor, byte);
        self.cursor += 1;

        let boundary = if byte == MSG_TERMINATOR {
            Boundary::Terminated
        } else if self.cursor == MAX_MSG_LEN {
            Boundary::Overflow
        } else {
            return None;
        };

        self.slot.publish(self.cursor);
        self.cursor = 0;
        Some(boundary)
    }

    /// Current write cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// The receive-interrupt event handler.
///
/// Composes the accumulator with the handoff signal: one completed
/// message, one signal. This is the single entry point registered with
/// the interrupt dispatch collaborator; it inherits the accumulator's
/// bounded-time, non-blocking contract.
pub struct RxInterruptHandler<'a, S: RawBinarySignal> {
    accumulator: MessageAccumulator<'a>,
    signal: &'a HandoffSignal<S>,
}

impl<'a, S: RawBinarySignal> RxInterruptHandler<'a, S> {
    /// Build the handler over the shared slot and signal.
    pub fn new(slot: &'a MessageSlot, signal: &'a HandoffSignal<S>) -> Self {
        Self {
            accumulator: MessageAccumulator::new(slot),
            signal,
        }
    }

    /// Handle one received byte from interrupt context. Never blocks.
    ///
    /// The returned [`YieldRequest`] is the dispatcher's cue to reschedule
    /// at return-from-interrupt when a boundary woke the receiver.
    #[inline]
    pub fn on_byte_received(&mut self, byte: u8) -> YieldRequest {
        match self.accumulator.on_byte_received(byte) {
            Some(_) => self.signal.signal_from_interrupt(),
            None => YieldRequest::NoYield,
        }
    }

    /// The underlying accumulator, for diagnostics.
    pub fn accumulator(&self) -> &MessageAccumulator<'a> {
        &self.accumulator
    }
}
