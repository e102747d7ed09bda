//! # Rover-RT Machinery
//!
//! The periodic-task scheduling and inter-task synchronization engine for
//! the rover-rt workspace. Each task runs on its own OS thread, wakes at
//! absolute deadlines derived from a shared origin, exchanges state
//! through a mutex-guarded monitor (free-running) or a sequence-gated
//! mailbox (lockstep), and records its own wake jitter and compute time.
//!
//! ## Guarantees
//!
//! - Deadlines form the arithmetic grid `origin + (k+1)·P`; a late wake
//!   runs once immediately and never shifts the grid ([`sched`]).
//! - A field group in the monitor is read and written as one unit under a
//!   single short critical section ([`monitor`]).
//! - The mailbox delivers exactly one output per input, gated on matching
//!   sequence numbers ([`mailbox`]).
//! - Shutdown is cooperative: tasks poll the monitor's stop flag once per
//!   cycle, so shutdown latency is bounded by one period per task.

pub mod error;
pub mod load;
pub mod logger;
pub mod mailbox;
pub mod monitor;
pub mod rt;
pub mod sched;
pub mod task;
