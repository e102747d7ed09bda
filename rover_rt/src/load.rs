//! CPU load generator for comparative jitter measurement.
//!
//! A deliberately crude perturbation source: each thread burns CPU in a
//! sine-sum loop, then sleeps 1 ms as a yield point. The generator shares
//! nothing with the task set except its own run flag — it never touches
//! the monitor or the mailbox.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

const BURN_ITERATIONS: u64 = 500_000;

/// Running CPU load threads; dropped or stopped at shutdown.
#[derive(Debug)]
pub struct LoadGenerator {
    run: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl LoadGenerator {
    /// Start `threads` busy threads named `load-0..`.
    pub fn start(threads: usize) -> io::Result<Self> {
        let run = Arc::new(AtomicBool::new(true));
        let mut handles = Vec::with_capacity(threads);
        for i in 0..threads {
            let run = Arc::clone(&run);
            let handle = thread::Builder::new()
                .name(format!("{}-{i}", rover_common::consts::TASK_LOAD))
                .spawn(move || {
                    while run.load(Ordering::Relaxed) {
                        burn();
                        thread::sleep(Duration::from_millis(1));
                    }
                })?;
            handles.push(handle);
        }
        debug!(threads, "load generator started");
        Ok(Self { run, handles })
    }

    /// Stop and join every load thread.
    pub fn stop(self) {
        self.run.store(false, Ordering::Relaxed);
        for handle in self.handles {
            let _ = handle.join();
        }
        debug!("load generator stopped");
    }
}

/// Burn roughly a millisecond of CPU.
fn burn() {
    let mut acc = 0.0f64;
    for i in 0..BURN_ITERATIONS {
        acc += (i as f64).sin();
    }
    std::hint::black_box(acc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_joins_cleanly() {
        let load = LoadGenerator::start(2).expect("start");
        assert_eq!(load.handles.len(), 2);
        thread::sleep(Duration::from_millis(20));
        load.stop();
    }

    #[test]
    fn zero_threads_is_a_noop() {
        let load = LoadGenerator::start(0).expect("start");
        load.stop();
    }
}
