//! Lockstep simulation: one driver, one plant stepper, paired by
//! sequence number.
//!
//! The driver runs on the periodic grid, generating the open-loop input
//! for step k, publishing it under sequence k and blocking until the
//! output of that exact step is available — a deterministic
//! one-input-to-one-output pairing that validates the integrated model
//! against an externally driven input sequence. The stepper owns the
//! robot state and integrates one RK4 step per consumed input.

use rover_common::config::{SimConfig, period_ns};
use rover_common::consts;
use rover_common::time::{TimeBase, monotonic_now, timespec_diff_ns};
use rover_rt::error::HarnessError;
use rover_rt::logger::{PerfLog, SampleLog};
use rover_rt::mailbox::Mailbox;
use rover_rt::monitor::{Point, Pose, WheelInput};
use rover_rt::sched::DeadlineScheduler;
use std::f64::consts::PI;
use std::sync::Arc;
use std::thread;
use tracing::info;

use crate::coordinator::RunOptions;
use crate::tasks::plant::front_point;

/// Open-loop input law: forward at 1 m/s, turning left for the first
/// 10 s and right afterwards.
pub fn open_loop_input(t: f64) -> WheelInput {
    if t < 0.0 {
        return WheelInput { v: 0.0, w: 0.0 };
    }
    let w = if t < 10.0 { 0.2 * PI } else { -0.2 * PI };
    WheelInput { v: 1.0, w }
}

fn dynamics(pose: &Pose, input: WheelInput) -> [f64; 3] {
    [
        input.v * pose.heading.cos(),
        input.v * pose.heading.sin(),
        input.w,
    ]
}

/// Classic 4-stage Runge-Kutta step of the unicycle model with the input
/// held constant over the step.
pub fn rk4_step(pose: Pose, input: WheelInput, dt: f64) -> Pose {
    let shift = |p: &Pose, k: &[f64; 3], h: f64| Pose {
        x: p.x + h * k[0],
        y: p.y + h * k[1],
        heading: p.heading + h * k[2],
    };
    let k1 = dynamics(&pose, input);
    let k2 = dynamics(&shift(&pose, &k1, 0.5 * dt), input);
    let k3 = dynamics(&shift(&pose, &k2, 0.5 * dt), input);
    let k4 = dynamics(&shift(&pose, &k3, dt), input);
    Pose {
        x: pose.x + (dt / 6.0) * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]),
        y: pose.y + (dt / 6.0) * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]),
        heading: pose.heading + (dt / 6.0) * (k1[2] + 2.0 * k2[2] + 2.0 * k3[2] + k4[2]),
    }
}

/// Stepper loop: consume input k, integrate, publish output k. Exits
/// after the final step; no stop flag is involved because the sequence
/// gate fully determines its lifetime.
fn stepper_loop(mailbox: Arc<Mailbox<WheelInput, Point>>, dt: f64, r: f64, steps: i64) {
    let mut pose = Pose::default();
    let mut last_consumed = -1;
    while last_consumed < steps - 1 {
        let (t_k, input, seq) = mailbox.wait_input(last_consumed);
        pose = rk4_step(pose, input, dt);
        mailbox.publish_output(t_k + dt, front_point(&pose, r), seq);
        last_consumed = seq;
    }
}

/// Run the lockstep simulation to completion.
///
/// Publishes inputs with sequence 0..N-1 and no gaps, so exactly N
/// matching outputs are produced, each logical time advancing by `dt`.
pub fn run(config: &SimConfig, options: RunOptions) -> Result<(), HarnessError> {
    let dt = config.periods.lockstep_ms as f64 / 1e3;
    let steps = (config.run.horizon_s / dt).floor() as i64;
    let step_ns = period_ns(config.periods.lockstep_ms);

    rover_rt::rt::rt_setup(consts::DEFAULT_RT_CPU, consts::DEFAULT_RT_PRIORITY)?;

    let samples = Arc::new(SampleLog::create(&config.samples_path())?);
    let perf = Arc::new(PerfLog::create(&config.perf_path(options.with_load))?);
    let mailbox: Arc<Mailbox<WheelInput, Point>> = Arc::new(Mailbox::new());

    let stepper = {
        let mailbox = Arc::clone(&mailbox);
        let r = config.robot.wheel_offset_m;
        thread::Builder::new()
            .name(consts::TASK_STEPPER.to_string())
            .spawn(move || stepper_loop(mailbox, dt, r, steps))
            .map_err(|source| HarnessError::Spawn {
                name: consts::TASK_STEPPER,
                source,
            })?
    };

    let load = crate::coordinator::start_load(options.with_load, config.run.load_threads);

    info!(steps, dt, "lockstep run started");
    let base = TimeBase::now()?;
    let mut sched = DeadlineScheduler::new(base.origin(), step_ns);

    for seq in 0..steps {
        let wake = sched.wait_next()?;

        // Logical time lives on the step grid, not the wall clock.
        let t_k = seq as f64 * dt;
        let input = open_loop_input(t_k);
        mailbox.publish_input(t_k, input, seq);
        let (t_next, output) = mailbox.wait_output(seq);
        samples.record(t_next, input, output);

        let comp_ms = match monotonic_now() {
            Ok(end) => timespec_diff_ns(&end, &wake.instant) as f64 / 1e6,
            Err(_) => 0.0,
        };
        perf.record(
            consts::TASK_DRIVER,
            base.seconds_since(&wake.instant),
            comp_ms,
            wake.jitter_ns as f64 / 1e6,
        );
    }

    let _ = stepper.join();
    if let Some(load) = load {
        load.stop();
    }
    samples.flush()?;
    perf.flush()?;
    info!(steps, "lockstep run complete");
    Ok(())
}
