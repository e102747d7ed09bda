//! Sequence-gated mailbox for lockstep producer/consumer handoff.
//!
//! Two single-slot buffers (input, output), each tagged with a
//! monotonically increasing sequence number, under one mutex with one
//! condition variable per direction. A publish overwrites the slot in
//! place (no queueing — only the newest entry survives) and wakes the
//! waiters of that direction; a wait blocks until the observed sequence
//! reaches the expected value.
//!
//! This enforces strict lockstep: the consumer of outputs never proceeds
//! past a cycle whose matching input it has not itself published, giving
//! deterministic one-input-to-one-output pairing — unlike the free-running
//! [`Monitor`](crate::monitor::Monitor), which enforces no pairing at all.
//!
//! # Precondition
//!
//! Exactly one producer and one consumer per slot direction. With two
//! writers to the same slot a sequence number can be overwritten before
//! its consumer observes it; this type makes no attempt to detect that.

use std::sync::{Condvar, Mutex, MutexGuard};

/// Sequence value of a never-published slot.
const SEQ_EMPTY: i64 = -1;

#[derive(Debug)]
struct Slot<T> {
    /// Logical time the value corresponds to.
    t: f64,
    value: T,
    seq: i64,
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self {
            t: 0.0,
            value: T::default(),
            seq: SEQ_EMPTY,
        }
    }
}

#[derive(Debug, Default)]
struct Slots<I, O> {
    input: Slot<I>,
    output: Slot<O>,
}

/// Single-producer/single-consumer rendezvous mailbox.
#[derive(Debug, Default)]
pub struct Mailbox<I, O> {
    slots: Mutex<Slots<I, O>>,
    input_ready: Condvar,
    output_ready: Condvar,
}

impl<I, O> Mailbox<I, O>
where
    I: Clone + Default,
    O: Clone + Default,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                input: Slot::default(),
                output: Slot::default(),
            }),
            input_ready: Condvar::new(),
            output_ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<I, O>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish the input for step `seq`, overwriting any previous entry,
    /// and wake the input waiter.
    pub fn publish_input(&self, t: f64, value: I, seq: i64) {
        let mut slots = self.lock();
        debug_assert!(seq > slots.input.seq, "input sequence must advance");
        slots.input = Slot { t, value, seq };
        self.input_ready.notify_all();
    }

    /// Block until an input newer than `last_consumed` is available and
    /// return `(t, value, seq)`.
    pub fn wait_input(&self, last_consumed: i64) -> (f64, I, i64) {
        let mut slots = self.lock();
        while slots.input.seq <= last_consumed {
            slots = self
                .input_ready
                .wait(slots)
                .unwrap_or_else(|e| e.into_inner());
        }
        (slots.input.t, slots.input.value.clone(), slots.input.seq)
    }

    /// Publish the output for step `seq` and wake the output waiter.
    pub fn publish_output(&self, t: f64, value: O, seq: i64) {
        let mut slots = self.lock();
        debug_assert!(seq > slots.output.seq, "output sequence must advance");
        slots.output = Slot { t, value, seq };
        self.output_ready.notify_all();
    }

    /// Block until the output slot's sequence reaches `expected_seq` and
    /// return `(t, value)`.
    ///
    /// Never returns a value published under a sequence lower than
    /// `expected_seq`.
    pub fn wait_output(&self, expected_seq: i64) -> (f64, O) {
        let mut slots = self.lock();
        while slots.output.seq < expected_seq {
            slots = self
                .output_ready
                .wait(slots)
                .unwrap_or_else(|e| e.into_inner());
        }
        (slots.output.t, slots.output.value.clone())
    }

    /// Last published input sequence (`-1` before the first publish).
    pub fn input_seq(&self) -> i64 {
        self.lock().input.seq
    }

    /// Last published output sequence (`-1` before the first publish).
    pub fn output_seq(&self) -> i64 {
        self.lock().output.seq
    }
}
