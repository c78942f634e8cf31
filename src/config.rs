//! Module: config
//!
//! Purpose: fixed relay configuration.
//!
//! Every resource is sized here once, at system start, and persists for
//! the process lifetime. One shared period constant drives both sides of
//! the relay: the transmitter sends one message per period, and the
//! receiver treats the same value as its processing deadline. That is
//! what makes the deadline meaningful without any cross-task
//! configuration.

use crate::timing::Tick;

/// Relay configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    /// Producer period and consumer deadline, in scheduler ticks.
    pub period_ticks: Tick,

    /// Priority of both relay tasks.
    pub task_priority: u8,

    /// Stack size of each relay task, in words.
    pub task_stack_words: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            period_ticks: 1000,
            task_priority: 4,
            task_stack_words: 1000,
        }
    }
}

impl RelayConfig {
    /// Config with the given period and default task parameters.
    pub const fn with_period(period_ticks: Tick) -> Self {
        Self {
            period_ticks,
            task_priority: 4,
            task_stack_words: 1000,
        }
    }
}
