//! Periodic task runner: the loop shape shared by every task role.
//!
//! A task cycles Armed → Sleeping → Running → Logging:
//!
//! 1. Sleep until the absolute deadline ([`DeadlineScheduler::wait_next`]);
//!    wake jitter is captured before anything else runs.
//! 2. Check the monitor's stop flag at the top of Running — a task
//!    performs at most one more complete unit of work after stop is
//!    raised, never a partial one.
//! 3. Run the work function: read inputs, compute, publish outputs. Work
//!    functions must be short relative to the period and must not block;
//!    the jitter/compute measurement assumes a single uninterrupted burst.
//! 4. Emit one performance record and re-arm.
//!
//! The work function is the interchangeable payload: an `FnMut(f64)`
//! receiving the logical time of the wake, capturing its own `Arc` handles
//! to the monitor, mailbox or extra logs.

use crate::logger::PerfLog;
use crate::monitor::Monitor;
use crate::sched::DeadlineScheduler;
use rover_common::config::period_ns;
use rover_common::time::{TimeBase, monotonic_now, timespec_diff_ns};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Static description of one periodic task.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTask {
    /// Task name: thread name and perf-log identifier.
    pub name: &'static str,
    /// Fixed period [ns].
    pub period_ns: i64,
}

impl PeriodicTask {
    pub fn new(name: &'static str, period_ms: u64) -> Self {
        Self {
            name,
            period_ns: period_ns(period_ms),
        }
    }

    /// Spawn the task on its own named OS thread.
    ///
    /// The thread arms its deadline at `origin + period` and loops until
    /// the monitor's stop flag is observed. Spawn failure is a fatal
    /// startup error for the coordinator to surface.
    pub fn spawn<F>(
        self,
        base: TimeBase,
        monitor: Arc<Monitor>,
        perf: Arc<PerfLog>,
        work: F,
    ) -> io::Result<JoinHandle<()>>
    where
        F: FnMut(f64) + Send + 'static,
    {
        thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || run_loop(self, base, monitor, perf, work))
    }
}

fn run_loop<F>(task: PeriodicTask, base: TimeBase, monitor: Arc<Monitor>, perf: Arc<PerfLog>, mut work: F)
where
    F: FnMut(f64),
{
    let mut sched = DeadlineScheduler::new(base.origin(), task.period_ns);
    loop {
        let wake = match sched.wait_next() {
            Ok(wake) => wake,
            Err(e) => {
                // A broken monotonic clock leaves no sane way to continue;
                // take the whole task set down cooperatively.
                warn!(task = task.name, "deadline wait failed: {e}; stopping");
                monitor.request_stop();
                break;
            }
        };
        if monitor.stop_requested() {
            break;
        }

        let t = base.seconds_since(&wake.instant);
        work(t);

        let comp_ms = match monotonic_now() {
            Ok(end) => timespec_diff_ns(&end, &wake.instant) as f64 / 1e6,
            Err(e) => {
                warn!(task = task.name, "compute-time read failed: {e}");
                0.0
            }
        };
        perf.record(task.name, t, comp_ms, wake.jitter_ns as f64 / 1e6);
    }
    debug!(task = task.name, "task exited");
}
