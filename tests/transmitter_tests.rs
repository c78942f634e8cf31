//! Transmitter schedule and wire-format tests.

mod common;

use common::{split_wire_messages, LatencyTx, SimClock};
use rust_tick_relay::{RelayConfig, RelayContext, TransmitterTask};

use rust_tick_relay::handoff::{RaiseResult, RawBinarySignal, WaitOutcome};
use rust_tick_relay::Tick;

struct InertSignal;

impl RawBinarySignal for InertSignal {
    fn raise(&self) -> RaiseResult {
        RaiseResult {
            pended: true,
            task_woken: false,
        }
    }

    fn acquire(&self, _timeout_ticks: Tick) -> WaitOutcome {
        WaitOutcome::TimedOut
    }
}

#[test]
fn test_wake_ticks_form_arithmetic_sequence_under_variable_latency() {
    let clock = SimClock::new(0);
    let mut task = TransmitterTask::new(LatencyTx::new(clock.clone()), 0, 1000);

    let mut next_wakes = Vec::new();
    for cycle in 0..6 {
        // Send latency varies wildly from cycle to cycle.
        task.tx().ticks_per_byte.set((cycle % 3) * 7);
        next_wakes.push(task.step());
    }

    assert_eq!(next_wakes, vec![1000, 2000, 3000, 4000, 5000, 6000]);
}

#[test]
fn test_timestamps_embed_schedule_not_send_time() {
    let clock = SimClock::new(0);
    let mut task = TransmitterTask::new(LatencyTx::new(clock.clone()), 0, 1000);

    // Every byte costs 3 ticks, so each send finishes well after its
    // wake tick; the embedded timestamps must not care.
    task.tx().ticks_per_byte.set(3);
    for _ in 0..3 {
        task.step();
    }

    let sent = task.tx().sent.clone();
    let messages = split_wire_messages(&sent);
    assert_eq!(
        messages,
        vec![
            b"Tick Count 00000000\r\n".as_slice(),
            b"Tick Count 00001000\r\n".as_slice(),
            b"Tick Count 00002000\r\n".as_slice(),
        ]
    );
}

#[test]
fn test_each_message_ends_with_nul_on_the_wire() {
    let clock = SimClock::new(0);
    let mut task = TransmitterTask::new(LatencyTx::new(clock), 0, 1000);

    task.step();
    task.step();

    let sent = &task.tx().sent;
    // "Tick Count NNNNNNNN\r\n" is 21 bytes of text plus the NUL.
    assert_eq!(sent.len(), 44);
    assert_eq!(sent[21], 0);
    assert_eq!(sent[43], 0);
}

#[test]
fn test_context_built_transmitter_uses_relay_period() {
    let clock = SimClock::new(0);
    let ctx = RelayContext::new(RelayConfig::with_period(250), InertSignal);
    let mut task = ctx.transmitter(LatencyTx::new(clock), 0);

    assert_eq!(task.step(), 250);
    assert_eq!(task.step(), 500);
}
