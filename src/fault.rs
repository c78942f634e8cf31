//! Module: fault
//!
//! Purpose: latched fault state for the relay.
//!
//! A relay that can no longer prove its deadline was met must stop: one
//! missed deadline invalidates every guarantee after it. Faults here latch
//! exactly once and are never cleared. There is no recovery path, no
//! degraded mode.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::timing::Tick;

/// Why the relay stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// The receiver's deadline wait expired without a handoff signal.
    DeadlineMissed = 1,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::DeadlineMissed,
            _ => FaultCode::None,
        }
    }
}

/// Latched, thread-safe fault state.
///
/// The first `latch` wins; everything after it is a no-op. The winner is
/// told so, which is what makes the fatal path (diagnostic + halt) run
/// exactly once no matter how often it is re-entered.
pub struct FaultState {
    code: AtomicU8,
    /// Tick at which the fault latched.
    at_tick: AtomicU32,
}

impl FaultState {
    /// Create fault state with no fault.
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(FaultCode::None as u8),
            at_tick: AtomicU32::new(0),
        }
    }

    /// Latch a fault at tick `at`. Returns true only for the first caller.
    #[inline]
    pub fn latch(&self, code: FaultCode, at: Tick) -> bool {
        let first = self
            .code
            .compare_exchange(
                FaultCode::None as u8,
                code as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if first {
            self.at_tick.store(at, Ordering::Release);
        }
        first
    }

    /// True once any fault has latched.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.code.load(Ordering::Acquire) != FaultCode::None as u8
    }

    /// The latched fault code.
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Tick at which the fault latched (meaningful only when active).
    #[inline]
    pub fn at_tick(&self) -> Tick {
        self.at_tick.load(Ordering::Acquire)
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}
