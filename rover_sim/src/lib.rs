//! # Rover Simulation
//!
//! The task set for the differential-drive robot simulation: work
//! functions for each periodic role ([`tasks`]), the free-running
//! coordinator ([`coordinator`]) and the lockstep variant ([`lockstep`]).
//!
//! Each work function is a pure computation over its current monitor or
//! mailbox inputs and fixed parameters; all timing, synchronization and
//! performance logging lives in `rover_rt`.

pub mod coordinator;
pub mod lockstep;
pub mod tasks;
