//! Absolute-deadline scheduler.
//!
//! Each task owns one [`DeadlineScheduler`]. The first deadline is
//! `origin + period`; every call to [`DeadlineScheduler::wait_next`]
//! sleeps with `clock_nanosleep(TIMER_ABSTIME)` until the current
//! deadline, then advances it by exactly one period *from the deadline
//! just serviced* — never from the actual wake instant. A task that wakes
//! late therefore still targets the periodic grid
//! `origin + (k+1)·P`, and lateness never accumulates into drift.
//!
//! There is no deadline-miss handling: a late wake runs once immediately,
//! its (positive) jitter is reported to the caller, and the next deadline
//! is still one nominal period after the one just serviced. Periods may
//! compress to catch up but never expand to absorb lateness.

use nix::errno::Errno;
use nix::sys::time::TimeSpec;
use nix::time::{ClockNanosleepFlags, clock_nanosleep};
use rover_common::time::{CLOCK, TimeError, monotonic_now, timespec_add_ns, timespec_diff_ns};

/// One wake-up of a periodic task.
#[derive(Debug, Clone, Copy)]
pub struct Wake {
    /// The instant the task actually woke.
    pub instant: TimeSpec,
    /// The deadline this wake serviced.
    pub deadline: TimeSpec,
    /// `instant - deadline` [ns]; positive when late, near zero (or
    /// slightly negative from clock granularity) when on time.
    pub jitter_ns: i64,
}

/// Per-task absolute deadline state. Owned exclusively by its task.
#[derive(Debug)]
pub struct DeadlineScheduler {
    period_ns: i64,
    next_deadline: TimeSpec,
}

impl DeadlineScheduler {
    /// Arm the scheduler: first deadline is `origin + period_ns`.
    pub fn new(origin: TimeSpec, period_ns: i64) -> Self {
        debug_assert!(period_ns > 0);
        Self {
            period_ns,
            next_deadline: timespec_add_ns(origin, period_ns),
        }
    }

    /// The deadline the next [`wait_next`](Self::wait_next) will service.
    pub fn deadline(&self) -> TimeSpec {
        self.next_deadline
    }

    /// Block until the current deadline, measure the jitter, and advance
    /// the deadline by one period.
    ///
    /// A deadline already in the past returns immediately with positive
    /// jitter; the missed period is never skipped or coalesced.
    pub fn wait_next(&mut self) -> Result<Wake, TimeError> {
        let deadline = self.next_deadline;
        loop {
            match clock_nanosleep(CLOCK, ClockNanosleepFlags::TIMER_ABSTIME, &deadline) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(TimeError::Sleep(e)),
            }
        }
        // Jitter is read immediately after waking, before any task work,
        // so it reflects wake latency rather than compute time.
        let instant = monotonic_now()?;
        let jitter_ns = timespec_diff_ns(&instant, &deadline);
        self.next_deadline = timespec_add_ns(deadline, self.period_ns);
        Ok(Wake {
            instant,
            deadline,
            jitter_ns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: i64 = 1_000_000;

    #[test]
    fn deadlines_form_arithmetic_grid() {
        let origin = TimeSpec::new(1000, 0);
        let sched = DeadlineScheduler::new(origin, 50 * MS);
        assert_eq!(timespec_diff_ns(&sched.deadline(), &origin), 50 * MS);
    }

    #[test]
    fn wait_advances_from_deadline_not_wake() {
        // Arm in the past: every wake is late, yet deadlines must stay on
        // the grid origin + (k+1)*P.
        let now = monotonic_now().expect("clock");
        let origin = timespec_add_ns(now, -200 * MS);
        let mut sched = DeadlineScheduler::new(origin, 10 * MS);

        for k in 0..5 {
            let wake = sched.wait_next().expect("wait");
            let offset = timespec_diff_ns(&wake.deadline, &origin);
            assert_eq!(offset, (k + 1) * 10 * MS, "deadline {k} off the grid");
            // Past deadlines return immediately with positive jitter.
            assert!(wake.jitter_ns > 0);
        }
    }

    #[test]
    fn on_time_wake_has_small_jitter() {
        let now = monotonic_now().expect("clock");
        let mut sched = DeadlineScheduler::new(now, 20 * MS);
        let wake = sched.wait_next().expect("wait");
        // Woke at or shortly after the deadline; tens of ms of slack for
        // a loaded test machine.
        assert!(wake.jitter_ns >= -MS);
        assert!(wake.jitter_ns < 50 * MS);
    }

    #[test]
    fn late_wakes_do_not_change_cycle_count() {
        // 10 deadlines in the past plus a burn of wait_next calls: the
        // scheduler must deliver exactly one wake per grid point.
        let now = monotonic_now().expect("clock");
        let origin = timespec_add_ns(now, -100 * MS);
        let mut sched = DeadlineScheduler::new(origin, 10 * MS);

        let mut grid_offsets = Vec::new();
        for _ in 0..10 {
            let wake = sched.wait_next().expect("wait");
            grid_offsets.push(timespec_diff_ns(&wake.deadline, &origin));
        }
        let expected: Vec<i64> = (1..=10).map(|k| k * 10 * MS).collect();
        assert_eq!(grid_offsets, expected);
    }
}
