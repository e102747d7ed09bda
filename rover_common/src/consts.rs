//! Task names and default timing parameters.
//!
//! Task names appear verbatim in the `task` column of the performance log,
//! so they are fixed constants rather than free-form strings.

/// Nanoseconds per millisecond.
pub const NS_PER_MS: i64 = 1_000_000;

/// Nanoseconds per second.
pub const NS_PER_S: i64 = 1_000_000_000;

// ─── Task names (perf log identifiers and thread names) ─────────────

/// Plant integration task.
pub const TASK_PLANT: &str = "plant";
/// Feedback linearization task.
pub const TASK_LIN: &str = "lin";
/// Proportional controller task.
pub const TASK_CTRL: &str = "ctrl";
/// Reference model, X axis.
pub const TASK_MODEL_X: &str = "model_x";
/// Reference model, Y axis.
pub const TASK_MODEL_Y: &str = "model_y";
/// Reference trajectory generator.
pub const TASK_REF: &str = "ref";
/// Operator interface task.
pub const TASK_UI: &str = "ui";
/// Lockstep driver task.
pub const TASK_DRIVER: &str = "driver";
/// Lockstep plant stepper thread.
pub const TASK_STEPPER: &str = "stepper";
/// CPU load generator threads (suffixed with an index).
pub const TASK_LOAD: &str = "load";

// ─── Default run parameters ─────────────────────────────────────────

/// Default simulation horizon [s].
pub const DEFAULT_HORIZON_S: f64 = 20.0;

/// Default number of CPU load generator threads for `--load` runs.
pub const DEFAULT_LOAD_THREADS: usize = 1;

/// Default task periods [ms].
pub const DEFAULT_PLANT_PERIOD_MS: u64 = 30;
pub const DEFAULT_LIN_PERIOD_MS: u64 = 40;
pub const DEFAULT_CTRL_PERIOD_MS: u64 = 50;
pub const DEFAULT_MODEL_PERIOD_MS: u64 = 50;
pub const DEFAULT_REF_PERIOD_MS: u64 = 120;
pub const DEFAULT_UI_PERIOD_MS: u64 = 500;
pub const DEFAULT_LOCKSTEP_PERIOD_MS: u64 = 50;

/// Distance from the wheel axle to the tracked front point [m].
pub const DEFAULT_WHEEL_OFFSET_M: f64 = 0.30;

/// Default proportional gains for controller and reference model.
pub const DEFAULT_ALPHA: f64 = 3.0;

/// Default output directory for CSV logs.
pub const DEFAULT_OUT_DIR: &str = "out";

/// CPU core the task set is pinned to when built with RT setup.
pub const DEFAULT_RT_CPU: usize = 0;

/// SCHED_FIFO priority used when built with RT setup.
pub const DEFAULT_RT_PRIORITY: i32 = 80;
