//! Free-running shared state monitor.
//!
//! A single mutex-guarded aggregate of every cross-task variable. Each
//! accessor pair reads or writes one field group atomically under one
//! short critical section; there is deliberately no ordering guarantee
//! across groups or across tasks. Tasks run on independent periods and
//! tolerate reading the most recent available value of another task's
//! output, the same way a real control loop tolerates sensor staleness.
//!
//! The boolean stop flag is one of the groups and is the sole cooperative
//! termination signal; every task polls it once per cycle.

use std::sync::{Mutex, MutexGuard};

/// Robot configuration (x, y, heading). Always updated as one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading [rad], kept in (-pi, pi].
    pub heading: f64,
}

/// A planar point (front-point output, reference target).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Linearized input v = (vx, vy).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Raw actuator input u = (v, w): forward speed and turn rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelInput {
    pub v: f64,
    pub w: f64,
}

/// Reference-model output and its derivative for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelState {
    pub y: f64,
    pub dy: f64,
}

/// Controller / reference-model gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub alpha1: f64,
    pub alpha2: f64,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            alpha1: rover_common::consts::DEFAULT_ALPHA,
            alpha2: rover_common::consts::DEFAULT_ALPHA,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    pose: Pose,
    output: Point,
    wheel_input: WheelInput,
    lin_input: Velocity,
    model_x: ModelState,
    model_y: ModelState,
    reference: Point,
    gains: Gains,
    stop: bool,
}

/// The shared state aggregate, created once by the coordinator and handed
/// to every task behind an `Arc`.
#[derive(Debug)]
pub struct Monitor {
    state: Mutex<State>,
}

impl Monitor {
    /// Create the monitor with configured gains; all other groups start
    /// zeroed.
    pub fn new(gains: Gains) -> Self {
        Self {
            state: Mutex::new(State {
                gains,
                ..State::default()
            }),
        }
    }

    /// A poisoned lock still yields the last-written values, so one
    /// panicking task cannot wedge the rest of the set during shutdown.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pose(&self) -> Pose {
        self.lock().pose
    }

    pub fn set_pose(&self, pose: Pose) {
        self.lock().pose = pose;
    }

    pub fn output(&self) -> Point {
        self.lock().output
    }

    pub fn set_output(&self, output: Point) {
        self.lock().output = output;
    }

    pub fn wheel_input(&self) -> WheelInput {
        self.lock().wheel_input
    }

    pub fn set_wheel_input(&self, input: WheelInput) {
        self.lock().wheel_input = input;
    }

    pub fn lin_input(&self) -> Velocity {
        self.lock().lin_input
    }

    pub fn set_lin_input(&self, input: Velocity) {
        self.lock().lin_input = input;
    }

    pub fn model_x(&self) -> ModelState {
        self.lock().model_x
    }

    pub fn set_model_x(&self, state: ModelState) {
        self.lock().model_x = state;
    }

    pub fn model_y(&self) -> ModelState {
        self.lock().model_y
    }

    pub fn set_model_y(&self, state: ModelState) {
        self.lock().model_y = state;
    }

    pub fn reference(&self) -> Point {
        self.lock().reference
    }

    pub fn set_reference(&self, reference: Point) {
        self.lock().reference = reference;
    }

    pub fn gains(&self) -> Gains {
        self.lock().gains
    }

    pub fn set_gains(&self, gains: Gains) {
        self.lock().gains = gains;
    }

    /// Raise the stop flag. Idempotent; never cleared within a run.
    pub fn request_stop(&self) {
        self.lock().stop = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.lock().stop
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(Gains::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn groups_start_zeroed_except_gains() {
        let monitor = Monitor::new(Gains {
            alpha1: 2.0,
            alpha2: 4.0,
        });
        assert_eq!(monitor.pose(), Pose::default());
        assert_eq!(monitor.reference(), Point::default());
        assert_eq!(monitor.gains().alpha1, 2.0);
        assert_eq!(monitor.gains().alpha2, 4.0);
        assert!(!monitor.stop_requested());
    }

    #[test]
    fn writes_fully_replace_group() {
        let monitor = Monitor::default();
        monitor.set_pose(Pose {
            x: 1.0,
            y: 2.0,
            heading: 0.5,
        });
        monitor.set_pose(Pose {
            x: 3.0,
            y: 4.0,
            heading: -0.5,
        });
        let pose = monitor.pose();
        assert_eq!(pose.x, 3.0);
        assert_eq!(pose.y, 4.0);
        assert_eq!(pose.heading, -0.5);
    }

    #[test]
    fn stop_flag_is_sticky() {
        let monitor = Monitor::default();
        monitor.request_stop();
        monitor.request_stop();
        assert!(monitor.stop_requested());
    }

    /// Concurrent writers always publish poses with x == y == heading;
    /// a torn read would surface as a mixed triple.
    #[test]
    fn pose_group_is_never_torn() {
        let monitor = Arc::new(Monitor::default());
        let mut handles = Vec::new();

        for w in 0..4u64 {
            let m = Arc::clone(&monitor);
            handles.push(thread::spawn(move || {
                for i in 0..2_000u64 {
                    let v = (w * 1_000_000 + i) as f64;
                    m.set_pose(Pose {
                        x: v,
                        y: v,
                        heading: v,
                    });
                }
            }));
        }
        for _ in 0..4 {
            let m = Arc::clone(&monitor);
            handles.push(thread::spawn(move || {
                for _ in 0..2_000 {
                    let p = m.pose();
                    assert_eq!(p.x, p.y, "torn pose read");
                    assert_eq!(p.y, p.heading, "torn pose read");
                }
            }));
        }
        for h in handles {
            h.join().expect("worker");
        }
    }
}
