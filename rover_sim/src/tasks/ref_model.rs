//! Reference model tasks: one first-order filter per output axis.
//!
//! Each axis runs ym' = alpha·(ref - ym), discretized with an Euler step
//! at the task period. Two task instances share this module, selected by
//! [`Axis`]; each keeps its own filter state locally and publishes
//! (ym, ym') to the monitor for the controller.

use rover_rt::monitor::{ModelState, Monitor};
use std::sync::Arc;

/// Which output axis this task instance filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One Euler step of the first-order filter; returns (next ym, ym').
pub fn filter_step(ym: f64, target: f64, alpha: f64, dt: f64) -> (f64, f64) {
    let dym = alpha * (target - ym);
    (ym + dt * dym, dym)
}

/// Build the reference-model work function for one axis.
pub fn work(monitor: Arc<Monitor>, axis: Axis, dt: f64) -> impl FnMut(f64) + Send + 'static {
    let mut ym = 0.0;
    move |_t| {
        let reference = monitor.reference();
        let gains = monitor.gains();
        let (target, alpha) = match axis {
            Axis::X => (reference.x, gains.alpha1),
            Axis::Y => (reference.y, gains.alpha2),
        };
        let (next, dym) = filter_step(ym, target, alpha, dt);
        ym = next;
        let state = ModelState { y: ym, dy: dym };
        match axis {
            Axis::X => monitor.set_model_x(state),
            Axis::Y => monitor.set_model_y(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_converges_to_constant_target() {
        let mut ym = 0.0;
        let mut dym = 0.0;
        for _ in 0..2_000 {
            (ym, dym) = filter_step(ym, 4.0, 3.0, 0.05);
        }
        assert!((ym - 4.0).abs() < 1e-6, "ym = {ym}");
        assert!(dym.abs() < 1e-6, "dym = {dym}");
    }

    #[test]
    fn derivative_matches_tracking_error() {
        let (_, dym) = filter_step(1.0, 3.0, 2.0, 0.05);
        assert!((dym - 4.0).abs() < 1e-12); // 2 * (3 - 1)
    }

    #[test]
    fn filter_is_stable_for_configured_step() {
        // alpha*dt well below 2: no oscillation blow-up.
        let mut ym = 10.0;
        for _ in 0..500 {
            (ym, _) = filter_step(ym, 0.0, 3.0, 0.05);
        }
        assert!(ym.abs() < 1e-3);
    }
}
