//! Plant task: Euler integration of the unicycle model.
//!
//! State x = (x, y, theta), input u = (v, w):
//! x' = v·cos(theta), y' = v·sin(theta), theta' = w, with theta wrapped to
//! (-pi, pi]. The tracked output is the front point at distance R ahead of
//! the axle. The plant is the only task writing the trajectory log.

use rover_rt::logger::TrajLog;
use rover_rt::monitor::{Monitor, Point, Pose, WheelInput};
use std::f64::consts::PI;
use std::sync::Arc;

/// One Euler step of the unicycle dynamics.
pub fn integrate(pose: Pose, input: WheelInput, dt: f64) -> Pose {
    let mut heading = pose.heading + dt * input.w;
    if heading > PI {
        heading -= 2.0 * PI;
    }
    if heading < -PI {
        heading += 2.0 * PI;
    }
    Pose {
        x: pose.x + dt * input.v * pose.heading.cos(),
        y: pose.y + dt * input.v * pose.heading.sin(),
        heading,
    }
}

/// Front point at distance `r` ahead of the axle.
pub fn front_point(pose: &Pose, r: f64) -> Point {
    Point {
        x: pose.x + r * pose.heading.cos(),
        y: pose.y + r * pose.heading.sin(),
    }
}

/// Build the plant work function.
///
/// Seeds the pose and output groups before the task set starts so every
/// consumer sees a defined initial state.
pub fn work(
    monitor: Arc<Monitor>,
    traj: Arc<TrajLog>,
    dt: f64,
    r: f64,
) -> impl FnMut(f64) + Send + 'static {
    let initial = Pose::default();
    monitor.set_pose(initial);
    monitor.set_output(front_point(&initial, r));

    move |t| {
        let input = monitor.wheel_input();
        let pose = integrate(monitor.pose(), input, dt);
        monitor.set_pose(pose);

        let output = front_point(&pose, r);
        monitor.set_output(output);

        traj.record(t, output, monitor.reference());
    }
}
