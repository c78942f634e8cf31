//! Module: transmitter
//!
//! Purpose: the drift-free periodic producer.
//!
//! Each cycle formats a status message embedding the cycle's absolute
//! wake tick (not the send time) and pushes it out one byte at a time
//! through the blocking transmit primitive. The next wake is the previous
//! wake plus exactly one period, so however long the send took, latency
//! never accumulates into the schedule: started at tick 0 with P = 1000,
//! the messages read 0, 1000, 2000, …

use crate::logging::format_to_buffer;
use crate::message::{MAX_MSG_LEN, MSG_TERMINATOR};
use crate::serial::ByteTx;
use crate::timing::{DelayUntil, PeriodicSchedule, Tick};

/// Format the outbound status message for `tick` into `buf`.
///
/// Wire text: `Tick Count NNNNNNNN\r\n`, tick zero-padded to eight
/// digits (wider once the count outgrows them). Returns the text length;
/// the trailing NUL the transmitter appends on the wire is not included.
pub fn format_tick_message(tick: Tick, buf: &mut [u8; MAX_MSG_LEN]) -> usize {
    format_to_buffer(buf, format_args!("Tick Count {:08}\r\n", tick))
}

/// The periodic producer task.
pub struct TransmitterTask<T: ByteTx> {
    tx: T,
    schedule: PeriodicSchedule,
}

impl<T: ByteTx> TransmitterTask<T> {
    /// Build the transmitter with its first cycle at `start_tick`.
    pub fn new(tx: T, start_tick: Tick, period: Tick) -> Self {
        Self {
            tx,
            schedule: PeriodicSchedule::starting_at(start_tick, period),
        }
    }

    /// One cycle: build and send the current message, then advance the
    /// schedule by exactly one period. Returns the absolute tick of the
    /// next wake-up.
    pub fn step(&mut self) -> Tick {
        let mut buf = [0u8; MAX_MSG_LEN];
        let len = format_tick_message(self.schedule.wake_tick(), &mut buf);
        self.tx.send_all(&buf[..len]);
        // The trailing NUL is part of the on-wire message; it is what
        // marks the boundary for the receiving side.
        self.tx.send_byte(MSG_TERMINATOR);

        self.schedule.advance()
    }

    /// Task entry point: send forever on the absolute-time schedule.
    pub fn run<D: DelayUntil>(mut self, delay: &D) -> ! {
        loop {
            let next_wake = self.step();
            delay.delay_until(next_wake);
        }
    }

    /// The current schedule.
    pub fn schedule(&self) -> &PeriodicSchedule {
        &self.schedule
    }

    /// The underlying transmit primitive.
    pub fn tx(&self) -> &T {
        &self.tx
    }
}
