//! Module: handoff
//!
//! Purpose: single-producer (interrupt context), single-consumer (task
//! context) binary handoff with at-most-one-pending semantics.
//!
//! Multiple message boundaries before the consumer wakes coalesce into a
//! single pending signal; there is no queue of messages behind it. A
//! consumer too slow to keep up is therefore detected by its deadline
//! check, not here: the later message simply overwrites the slot the
//! earlier one lived in.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::timing::Tick;

/// Result of raising the raw kernel signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaiseResult {
    /// The signal was newly pended. False means it was already pending and
    /// this raise coalesced into it.
    pub pended: bool,
    /// Raising made a higher-priority task runnable; the interrupt should
    /// request a reschedule at return.
    pub task_woken: bool,
}

/// Outcome of a timed wait on the signal.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The signal fired within the timeout.
    Signaled,
    /// The timeout elapsed first.
    TimedOut,
}

/// Reschedule request returned to the interrupt dispatcher.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YieldRequest {
    /// Request an immediate reschedule at return-from-interrupt.
    Yield,
    /// Return to the interrupted context as usual.
    NoYield,
}

impl YieldRequest {
    /// True if a reschedule was requested.
    pub fn is_yield(&self) -> bool {
        matches!(self, YieldRequest::Yield)
    }
}

/// The kernel's binary signal primitive (external collaborator).
///
/// # Contract
///
/// - `raise` must be safe to call from interrupt context and must never
///   block or reschedule the calling context.
/// - `acquire` blocks and must only be called from task context.
pub trait RawBinarySignal {
    /// Set the signal pending. Never blocks.
    fn raise(&self) -> RaiseResult;

    /// Block the calling task until the signal fires or `timeout_ticks`
    /// elapse. A zero timeout polls without blocking.
    fn acquire(&self, timeout_ticks: Tick) -> WaitOutcome;
}

/// Interrupt-to-task handoff signal.
///
/// Wraps the kernel primitive with the relay's handoff contract: one
/// completed message, one signal, at most one pending. Coalesced raises
/// are counted for diagnostics.
pub struct HandoffSignal<S: RawBinarySignal> {
    raw: S,
    /// Boundary events that found the signal already pending. They carry
    /// no extra information to the consumer; the count exists so a slow
    /// consumer is visible in diagnostics.
    coalesced: AtomicU32,
}

impl<S: RawBinarySignal> HandoffSignal<S> {
    /// Wrap a kernel signal created at startup.
    pub const fn new(raw: S) -> Self {
        Self {
            raw,
            coalesced: AtomicU32::new(0),
        }
    }

    /// Raise the signal from interrupt context. Never blocks.
    ///
    /// Returns whether the caller should request a reschedule at
    /// return-from-interrupt so the waiting task runs immediately.
    #[inline]
    pub fn signal_from_interrupt(&self) -> YieldRequest {
        let result = self.raw.raise();
        if !result.pended {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
        }
        if result.task_woken {
            YieldRequest::Yield
        } else {
            YieldRequest::NoYield
        }
    }

    /// Block the calling task until signaled or until `timeout_ticks`
    /// elapse. Task context only.
    #[inline]
    pub fn wait_with_timeout(&self, timeout_ticks: Tick) -> WaitOutcome {
        self.raw.acquire(timeout_ticks)
    }

    /// Number of boundary events coalesced into an already-pending signal.
    pub fn coalesced(&self) -> u32 {
        self.coalesced.load(Ordering::Relaxed)
    }
}
