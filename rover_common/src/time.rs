//! Monotonic time base and timespec arithmetic.
//!
//! Every deadline and every logged timestamp in the workspace is an offset
//! from a single `CLOCK_MONOTONIC` origin captured once at process start.
//! [`TimeBase`] is `Copy` and handed to every task by value; tasks never
//! mutate it.

use nix::errno::Errno;
use nix::sys::time::TimeSpec;
use nix::time::{ClockId, clock_gettime};
use thiserror::Error;

/// The clock every deadline and timestamp is measured against.
pub const CLOCK: ClockId = ClockId::CLOCK_MONOTONIC;

/// Errors from the monotonic clock syscalls.
#[derive(Debug, Clone, Error)]
pub enum TimeError {
    /// `clock_gettime` failed.
    #[error("clock_gettime failed: {0}")]
    Gettime(Errno),
    /// `clock_nanosleep` failed with something other than EINTR.
    #[error("clock_nanosleep failed: {0}")]
    Sleep(Errno),
}

/// Read the monotonic clock.
pub fn monotonic_now() -> Result<TimeSpec, TimeError> {
    clock_gettime(CLOCK).map_err(TimeError::Gettime)
}

/// A fixed origin instant on `CLOCK_MONOTONIC`.
///
/// Captured once by the coordinator and shared read-only (by value) with
/// every task thread.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    origin: TimeSpec,
}

impl TimeBase {
    /// Capture the origin instant now.
    pub fn now() -> Result<Self, TimeError> {
        Ok(Self {
            origin: monotonic_now()?,
        })
    }

    /// Build a time base from an explicit origin (tests, replays).
    pub fn from_origin(origin: TimeSpec) -> Self {
        Self { origin }
    }

    /// The origin instant, used to arm per-task deadline schedulers.
    pub fn origin(&self) -> TimeSpec {
        self.origin
    }

    /// Seconds between the origin and a given instant.
    ///
    /// This is the logical time used in all log records; tasks call it
    /// with their wake instant so no extra clock read is needed per cycle.
    pub fn seconds_since(&self, instant: &TimeSpec) -> f64 {
        timespec_diff_ns(instant, &self.origin) as f64 / 1e9
    }

    /// Seconds elapsed since the origin as of now.
    pub fn elapsed(&self) -> Result<f64, TimeError> {
        Ok(self.seconds_since(&monotonic_now()?))
    }
}

/// Add nanoseconds to a `TimeSpec`, normalizing the nanosecond field.
pub fn timespec_add_ns(ts: TimeSpec, ns: i64) -> TimeSpec {
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Compute the difference (a - b) in nanoseconds.
pub fn timespec_diff_ns(a: &TimeSpec, b: &TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}
