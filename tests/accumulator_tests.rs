//! Accumulator and interrupt-handler boundary tests.

mod common;

use common::{SimClock, SimSignal};
use rust_tick_relay::{
    Boundary, HandoffSignal, MessageAccumulator, MessageSlot, RxInterruptHandler, WaitOutcome,
    MAX_MSG_LEN,
};

#[test]
fn test_terminated_sequence_raises_exactly_one_signal() {
    let clock = SimClock::new(0);
    let (raw, _latency) = SimSignal::new(clock);
    let slot = MessageSlot::new();
    let signal = HandoffSignal::new(raw);
    let mut handler = RxInterruptHandler::new(&slot, &signal);

    let mut yields = 0;
    for &b in b"HELLO\0" {
        if handler.on_byte_received(b).is_yield() {
            yields += 1;
        }
    }

    assert_eq!(yields, 1);
    assert_eq!(slot.snapshot().as_bytes(), b"HELLO\0");
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::Signaled);
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::TimedOut);
}

#[test]
fn test_sixty_four_bytes_without_terminator_flush_at_capacity() {
    let clock = SimClock::new(0);
    let (raw, _latency) = SimSignal::new(clock);
    let slot = MessageSlot::new();
    let signal = HandoffSignal::new(raw);
    let mut handler = RxInterruptHandler::new(&slot, &signal);

    for i in 0..MAX_MSG_LEN - 1 {
        assert!(
            !handler.on_byte_received(b'a').is_yield(),
            "early boundary at byte {}",
            i
        );
    }
    assert!(handler.on_byte_received(b'a').is_yield());

    let msg = slot.snapshot();
    assert_eq!(msg.len(), MAX_MSG_LEN);
    assert!(!msg.is_terminated());
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::Signaled);
}

#[test]
fn test_boundary_kinds() {
    let slot = MessageSlot::new();
    let mut acc = MessageAccumulator::new(&slot);

    for &b in b"OK" {
        assert_eq!(acc.on_byte_received(b), None);
    }
    assert_eq!(acc.on_byte_received(0), Some(Boundary::Terminated));

    for _ in 0..MAX_MSG_LEN - 1 {
        assert_eq!(acc.on_byte_received(b'x'), None);
    }
    assert_eq!(acc.on_byte_received(b'x'), Some(Boundary::Overflow));
}

#[test]
fn test_consecutive_messages_each_raise_once() {
    let clock = SimClock::new(0);
    let (raw, _latency) = SimSignal::new(clock);
    let slot = MessageSlot::new();
    let signal = HandoffSignal::new(raw);
    let mut handler = RxInterruptHandler::new(&slot, &signal);

    for &b in b"ONE\0" {
        let _ = handler.on_byte_received(b);
    }
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::Signaled);
    assert_eq!(slot.snapshot().as_bytes(), b"ONE\0");

    for &b in b"TWO\0" {
        let _ = handler.on_byte_received(b);
    }
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::Signaled);
    assert_eq!(slot.snapshot().as_bytes(), b"TWO\0");

    assert_eq!(signal.coalesced(), 0);
}

#[test]
fn test_boundaries_before_consumption_coalesce() {
    let clock = SimClock::new(0);
    let (raw, _latency) = SimSignal::new(clock);
    let slot = MessageSlot::new();
    let signal = HandoffSignal::new(raw);
    let mut handler = RxInterruptHandler::new(&slot, &signal);

    for &b in b"FIRST\0" {
        let _ = handler.on_byte_received(b);
    }
    for &b in b"SECOND\0" {
        let _ = handler.on_byte_received(b);
    }

    // One pending signal; the slot holds the later message.
    assert_eq!(signal.coalesced(), 1);
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::Signaled);
    assert_eq!(signal.wait_with_timeout(0), WaitOutcome::TimedOut);
    assert_eq!(slot.snapshot().as_bytes(), b"SECOND\0");
}
