//! Coordinator for the free-running simulation.
//!
//! Sequencing contract: create the log files, capture the origin once,
//! start every task thread with the same origin by value, optionally start
//! the load generator, run until the horizon elapses or stop is raised,
//! then request stop and join every task in the fixed spawn order so log
//! flushing never races an in-flight writer.

use rover_common::config::SimConfig;
use rover_common::consts;
use rover_common::time::TimeBase;
use rover_rt::error::HarnessError;
use rover_rt::load::LoadGenerator;
use rover_rt::logger::{PerfLog, TrajLog};
use rover_rt::monitor::{Gains, Monitor};
use rover_rt::task::PeriodicTask;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

use crate::tasks::{control, linearization, plant, ref_model, reference, ui};

/// Poll granularity of the horizon watch loop.
const HORIZON_POLL: Duration = Duration::from_millis(10);

/// Start the CPU load generator when requested.
///
/// The task set is already running at this point, so a load-thread spawn
/// failure degrades to an unloaded run instead of tearing the set down.
pub(crate) fn start_load(with_load: bool, threads: usize) -> Option<LoadGenerator> {
    if !with_load {
        return None;
    }
    match LoadGenerator::start(threads) {
        Ok(load) => Some(load),
        Err(e) => {
            warn!("load generator failed to start: {e}; continuing without load");
            None
        }
    }
}

/// Run options not carried by the configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Start CPU load generator threads to perturb timing.
    pub with_load: bool,
}

/// Run the free-running simulation to completion.
///
/// Returns an error only for startup failures (log creation, clock,
/// thread spawn); timing anomalies during the run are recorded as jitter
/// and never abort.
pub fn run(config: &SimConfig, options: RunOptions) -> Result<(), HarnessError> {
    // RT setup (memory locking, pinning, SCHED_FIFO) must precede every
    // thread spawn; without the `rt` feature it does nothing.
    rover_rt::rt::rt_setup(consts::DEFAULT_RT_CPU, consts::DEFAULT_RT_PRIORITY)?;

    // Log files first: a failure here aborts before any task runs.
    let perf = Arc::new(PerfLog::create(&config.perf_path(options.with_load))?);
    let traj = Arc::new(TrajLog::create(&config.traj_path())?);

    let base = TimeBase::now()?;
    let monitor = Arc::new(Monitor::new(Gains {
        alpha1: config.gains.alpha1,
        alpha2: config.gains.alpha2,
    }));

    // Operator stop via SIGINT. A second coordinator run in the same
    // process (tests) cannot re-install the handler; that is not fatal.
    {
        let m = Arc::clone(&monitor);
        if let Err(e) = ctrlc::set_handler(move || m.request_stop()) {
            warn!("ctrl-c handler not installed: {e}");
        }
    }

    let dt_plant = config.periods.plant_ms as f64 / 1e3;
    let dt_model = config.periods.ref_model_ms as f64 / 1e3;
    let r = config.robot.wheel_offset_m;

    // Fixed spawn order; joins below use the same order.
    let specs: Vec<(PeriodicTask, Box<dyn FnMut(f64) + Send>)> = vec![
        (
            PeriodicTask::new(consts::TASK_PLANT, config.periods.plant_ms),
            Box::new(plant::work(
                Arc::clone(&monitor),
                Arc::clone(&traj),
                dt_plant,
                r,
            )),
        ),
        (
            PeriodicTask::new(consts::TASK_LIN, config.periods.linearization_ms),
            Box::new(linearization::work(Arc::clone(&monitor), r)),
        ),
        (
            PeriodicTask::new(consts::TASK_CTRL, config.periods.control_ms),
            Box::new(control::work(Arc::clone(&monitor))),
        ),
        (
            PeriodicTask::new(consts::TASK_MODEL_X, config.periods.ref_model_ms),
            Box::new(ref_model::work(
                Arc::clone(&monitor),
                ref_model::Axis::X,
                dt_model,
            )),
        ),
        (
            PeriodicTask::new(consts::TASK_MODEL_Y, config.periods.ref_model_ms),
            Box::new(ref_model::work(
                Arc::clone(&monitor),
                ref_model::Axis::Y,
                dt_model,
            )),
        ),
        (
            PeriodicTask::new(consts::TASK_REF, config.periods.reference_ms),
            Box::new(reference::work(Arc::clone(&monitor))),
        ),
        (
            PeriodicTask::new(consts::TASK_UI, config.periods.ui_ms),
            Box::new(ui::work(Arc::clone(&monitor), ui::stdin_commands())),
        ),
    ];

    let mut handles: Vec<(&'static str, JoinHandle<()>)> = Vec::with_capacity(specs.len());
    for (task, work) in specs {
        let name = task.name;
        match task.spawn(base, Arc::clone(&monitor), Arc::clone(&perf), work) {
            Ok(handle) => handles.push((name, handle)),
            Err(source) => {
                // Partial task sets never run: stop whatever started.
                monitor.request_stop();
                for (_, handle) in handles {
                    let _ = handle.join();
                }
                return Err(HarnessError::Spawn { name, source });
            }
        }
    }
    info!(tasks = handles.len(), "task set started");

    let load = start_load(options.with_load, config.run.load_threads);

    while base.elapsed()? < config.run.horizon_s && !monitor.stop_requested() {
        thread::sleep(HORIZON_POLL);
    }
    monitor.request_stop();

    for (name, handle) in handles {
        if handle.join().is_err() {
            warn!(task = name, "task panicked");
        }
    }
    if let Some(load) = load {
        load.stop();
    }

    perf.flush()?;
    traj.flush()?;
    info!(
        with_load = options.with_load,
        "simulation complete after {:.2}s", base.elapsed()?
    );
    Ok(())
}
