//! Shared test harness: simulated clock, kernel signal, and byte sinks.
//!
//! The simulation keeps everything on one thread: waits do not block,
//! they advance the clock by however long the real wait would have
//! taken. That makes every timing scenario deterministic.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rust_tick_relay::{ByteTx, RaiseResult, RawBinarySignal, Tick, TickClock, WaitOutcome};

/// Simulated tick counter.
pub struct SimClock(AtomicU32);

impl SimClock {
    pub fn new(start: Tick) -> Rc<Self> {
        Rc::new(Self(AtomicU32::new(start)))
    }

    pub fn advance(&self, ticks: Tick) {
        self.0.fetch_add(ticks, Ordering::Relaxed);
    }
}

impl TickClock for SimClock {
    fn now(&self) -> Tick {
        self.0.load(Ordering::Relaxed)
    }
}

/// Simulated kernel binary signal.
///
/// A timed-out wait advances the clock by the full timeout, as a really
/// blocked task would experience. A successful wait advances it by the
/// scheduled `wake_latency` instead: the simulated gap between entering
/// the wait and the signal arriving.
pub struct SimSignal {
    pending: AtomicBool,
    clock: Rc<SimClock>,
    wake_latency: Rc<Cell<Tick>>,
}

impl SimSignal {
    /// Returns the signal and the shared handle that schedules the next
    /// successful wait's latency.
    pub fn new(clock: Rc<SimClock>) -> (Self, Rc<Cell<Tick>>) {
        let wake_latency = Rc::new(Cell::new(0));
        (
            Self {
                pending: AtomicBool::new(false),
                clock,
                wake_latency: Rc::clone(&wake_latency),
            },
            wake_latency,
        )
    }
}

impl RawBinarySignal for SimSignal {
    fn raise(&self) -> RaiseResult {
        let was_pending = self.pending.swap(true, Ordering::AcqRel);
        RaiseResult {
            pended: !was_pending,
            task_woken: !was_pending,
        }
    }

    fn acquire(&self, timeout_ticks: Tick) -> WaitOutcome {
        if self.pending.swap(false, Ordering::AcqRel) {
            self.clock.advance(self.wake_latency.replace(0));
            WaitOutcome::Signaled
        } else {
            self.clock.advance(timeout_ticks);
            WaitOutcome::TimedOut
        }
    }
}

/// Byte sink that records everything sent.
#[derive(Default)]
pub struct CaptureTx(pub Vec<u8>);

impl ByteTx for CaptureTx {
    fn send_byte(&mut self, byte: u8) {
        self.0.push(byte);
    }
}

/// Byte sink that records and also costs simulated time per byte, for
/// exercising the transmitter under variable send latency.
pub struct LatencyTx {
    pub sent: Vec<u8>,
    pub ticks_per_byte: Cell<Tick>,
    clock: Rc<SimClock>,
}

impl LatencyTx {
    pub fn new(clock: Rc<SimClock>) -> Self {
        Self {
            sent: Vec::new(),
            ticks_per_byte: Cell::new(0),
            clock,
        }
    }
}

impl ByteTx for LatencyTx {
    fn send_byte(&mut self, byte: u8) {
        self.clock.advance(self.ticks_per_byte.get());
        self.sent.push(byte);
    }
}

/// Split a captured byte stream into NUL-terminated wire messages.
pub fn split_wire_messages(bytes: &[u8]) -> Vec<&[u8]> {
    bytes
        .split(|&b| b == 0)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
