//! # RustTickRelay
//!
//! Deadline-monitored serial tick relay with fail-fast real-time
//! semantics.
//!
//! ## Architecture
//!
//! ```text
//! TransmitterTask ──UART──▶ rx interrupt ──▶ MessageAccumulator
//!   (every P ticks,                             │ message boundary
//!    absolute schedule)                         ▼
//!                                          HandoffSignal
//!                                               │ wake
//!                                               ▼
//!                  log UART ◀────────────  ReceiverTask
//!                                  (deadline P from last processing;
//!                                   a miss halts the system for good)
//! ```
//!
//! The interrupt path never blocks; the tasks suspend only in their one
//! designated wait each. There is no message queue between the two sides:
//! boundaries coalesce into a single pending signal, and a consumer too
//! slow for the producer's period is a fatal fault, not a backlog.

#![cfg_attr(not(test), no_std)]
#![feature(never_type)]

pub mod accumulator;
pub mod config;
pub mod fault;
pub mod hal;
pub mod handoff;
pub mod logging;
pub mod message;
pub mod receiver;
pub mod relay;
pub mod serial;
pub mod timing;
pub mod transmitter;

pub use accumulator::{Boundary, MessageAccumulator, RxInterruptHandler};
pub use config::RelayConfig;
pub use fault::{FaultCode, FaultState};
pub use handoff::{HandoffSignal, RaiseResult, RawBinarySignal, WaitOutcome, YieldRequest};
pub use logging::{LogLevel, SerialLog};
pub use message::{Message, MessageSlot, MAX_MSG_LEN, MSG_TERMINATOR};
pub use receiver::{DeadlineMissed, ReceiverTask, DEADLINE_DIAGNOSTIC};
pub use relay::{RelayContext, StartupError};
pub use serial::ByteTx;
pub use timing::{DeadlineWindow, DelayUntil, PeriodicSchedule, Tick, TickClock};
pub use transmitter::TransmitterTask;
