//! Timing behavior of the periodic task runner.
//!
//! These tests run real threads against the monotonic clock, so bounds
//! are deliberately generous: they check the drift-free re-arming and
//! stop-latency contracts, not microsecond accuracy.

use rover_common::time::TimeBase;
use rover_rt::logger::PerfLog;
use rover_rt::monitor::{Gains, Monitor};
use rover_rt::task::PeriodicTask;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn test_perf_log(dir: &tempfile::TempDir) -> Arc<PerfLog> {
    Arc::new(PerfLog::create(&dir.path().join("perf.csv")).expect("perf log"))
}

/// Cycle count over a horizon is floor(H/P) +/- 1 regardless of jitter.
#[test]
fn cycle_count_tracks_horizon_over_period() {
    let dir = tempfile::tempdir().expect("tempdir");
    let perf = test_perf_log(&dir);
    let monitor = Arc::new(Monitor::new(Gains::default()));
    let base = TimeBase::now().expect("clock");
    let cycles = Arc::new(AtomicU64::new(0));

    let handle = {
        let cycles = Arc::clone(&cycles);
        PeriodicTask::new("counter", 20)
            .spawn(base, Arc::clone(&monitor), perf, move |_t| {
                cycles.fetch_add(1, Ordering::Relaxed);
            })
            .expect("spawn")
    };

    // Horizon 400 ms, period 20 ms: floor = 20 cycles.
    thread::sleep(Duration::from_millis(400));
    monitor.request_stop();
    handle.join().expect("join");

    let count = cycles.load(Ordering::Relaxed);
    assert!(
        (19..=21).contains(&count),
        "expected 20 +/- 1 cycles, got {count}"
    );
}

/// Once stop is raised, a task performs at most one further cycle and the
/// join completes within roughly one period.
#[test]
fn stop_is_observed_within_one_period() {
    let dir = tempfile::tempdir().expect("tempdir");
    let perf = test_perf_log(&dir);
    let monitor = Arc::new(Monitor::new(Gains::default()));
    let base = TimeBase::now().expect("clock");
    let cycles = Arc::new(AtomicU64::new(0));

    let handle = {
        let cycles = Arc::clone(&cycles);
        PeriodicTask::new("stopper", 50)
            .spawn(base, Arc::clone(&monitor), perf, move |_t| {
                cycles.fetch_add(1, Ordering::Relaxed);
            })
            .expect("spawn")
    };

    thread::sleep(Duration::from_millis(120));
    let before = cycles.load(Ordering::Relaxed);
    monitor.request_stop();
    let join_start = Instant::now();
    handle.join().expect("join");
    let join_latency = join_start.elapsed();
    let after = cycles.load(Ordering::Relaxed);

    assert!(
        after <= before + 1,
        "at most one more cycle after stop: before={before} after={after}"
    );
    assert!(
        join_latency < Duration::from_millis(200),
        "join took {join_latency:?}, expected about one 50 ms period"
    );
}

/// The work function receives monotonically increasing logical times on
/// the period grid.
#[test]
fn logical_time_is_monotonic_and_positive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let perf = test_perf_log(&dir);
    let monitor = Arc::new(Monitor::new(Gains::default()));
    let base = TimeBase::now().expect("clock");
    let times = Arc::new(std::sync::Mutex::new(Vec::new()));

    let handle = {
        let times = Arc::clone(&times);
        PeriodicTask::new("clocked", 10)
            .spawn(base, Arc::clone(&monitor), perf, move |t| {
                times.lock().expect("times").push(t);
            })
            .expect("spawn")
    };

    thread::sleep(Duration::from_millis(100));
    monitor.request_stop();
    handle.join().expect("join");

    let times = times.lock().expect("times");
    assert!(times.len() >= 5, "expected several cycles, got {}", times.len());
    for pair in times.windows(2) {
        assert!(pair[1] > pair[0], "logical time must increase");
    }
    // First wake services deadline origin + P = 10 ms.
    assert!(times[0] >= 0.009, "first logical time {} too early", times[0]);
}

/// All perf records written by a task land in its own stream in wake
/// order, and jitter values are finite.
#[test]
fn perf_records_are_well_formed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("perf.csv");
    let perf = Arc::new(PerfLog::create(&path).expect("perf log"));
    let monitor = Arc::new(Monitor::new(Gains::default()));
    let base = TimeBase::now().expect("clock");

    let handle = PeriodicTask::new("fmt", 20)
        .spawn(base, Arc::clone(&monitor), Arc::clone(&perf), |_t| {})
        .expect("spawn");

    thread::sleep(Duration::from_millis(150));
    monitor.request_stop();
    handle.join().expect("join");
    perf.flush().expect("flush");

    let text = std::fs::read_to_string(&path).expect("read");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("t,task,comp_ms,jitter_ms"));

    let mut prev_t = f64::NEG_INFINITY;
    let mut rows = 0;
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 4, "malformed row: {line}");
        let t: f64 = fields[0].parse().expect("t");
        assert_eq!(fields[1], "fmt");
        let comp: f64 = fields[2].parse().expect("comp_ms");
        let jitter: f64 = fields[3].parse().expect("jitter_ms");
        assert!(t > prev_t, "per-task stream must be in wake order");
        assert!(comp.is_finite() && comp >= 0.0);
        assert!(jitter.is_finite());
        prev_t = t;
        rows += 1;
    }
    assert!(rows >= 5, "expected several records, got {rows}");
}
