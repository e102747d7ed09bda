//! Feedback linearization task.
//!
//! The front-point output dynamics are y' = L(theta)·u; this task inverts
//! the decoupling matrix so the controller can command front-point
//! velocities directly: u = L(theta)^-1 · v.

use rover_rt::monitor::{Monitor, Velocity, WheelInput};
use std::sync::Arc;

/// u = L(theta)^-1 · v for front-point offset `r`.
pub fn decouple(heading: f64, v: Velocity, r: f64) -> WheelInput {
    let (sin, cos) = heading.sin_cos();
    WheelInput {
        v: cos * v.vx + sin * v.vy,
        w: (-sin * v.vx + cos * v.vy) / r,
    }
}

/// Build the linearization work function.
pub fn work(monitor: Arc<Monitor>, r: f64) -> impl FnMut(f64) + Send + 'static {
    move |_t| {
        let pose = monitor.pose();
        let v = monitor.lin_input();
        monitor.set_wheel_input(decouple(pose.heading, v, r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// L(theta) applied to decouple(theta, v) must give back v: the
    /// front-point velocity is (v·cos - r·w·sin, v·sin + r·w·cos).
    #[test]
    fn decoupling_inverts_output_dynamics() {
        let r = 0.3;
        for &heading in &[0.0, 0.7, -2.1, 3.0] {
            let v = Velocity { vx: 0.8, vy: -0.4 };
            let u = decouple(heading, v, r);
            let (sin, cos) = heading.sin_cos();
            let ydot_x = u.v * cos - r * u.w * sin;
            let ydot_y = u.v * sin + r * u.w * cos;
            assert!((ydot_x - v.vx).abs() < 1e-12, "heading {heading}");
            assert!((ydot_y - v.vy).abs() < 1e-12, "heading {heading}");
        }
    }

    #[test]
    fn zero_input_yields_zero_command() {
        let u = decouple(1.3, Velocity::default(), 0.3);
        assert_eq!(u.v, 0.0);
        assert_eq!(u.w, 0.0);
    }
}
