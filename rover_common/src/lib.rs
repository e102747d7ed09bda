//! # Rover-RT Common Library
//!
//! Shared constants, configuration loading and the monotonic time base for
//! all rover-rt workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Task names and default timing parameters
//! - [`config`] - TOML configuration loading and validation
//! - [`time`] - Monotonic time base and timespec arithmetic

pub mod config;
pub mod consts;
pub mod time;
