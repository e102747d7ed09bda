//! Task work functions, one module per periodic role.
//!
//! Every module exposes a pure step function (unit-testable, no locks, no
//! I/O) plus a `work(...)` constructor that wires it to the monitor and
//! returns the `FnMut(f64)` closure the task runner drives.

pub mod control;
pub mod linearization;
pub mod plant;
pub mod ref_model;
pub mod reference;
pub mod ui;
