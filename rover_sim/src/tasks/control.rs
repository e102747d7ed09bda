//! Controller task: proportional law over the linearized output.
//!
//! With the plant linearized to y' = v, each axis tracks its reference
//! model with a feedforward-plus-proportional term:
//! vx = ym_x' + alpha1·(ym_x - y1), vy = ym_y' + alpha2·(ym_y - y2).

use rover_rt::monitor::{Gains, ModelState, Monitor, Point, Velocity};
use std::sync::Arc;

/// Proportional linearizing control law.
pub fn control_law(output: Point, model_x: ModelState, model_y: ModelState, gains: Gains) -> Velocity {
    Velocity {
        vx: model_x.dy + gains.alpha1 * (model_x.y - output.x),
        vy: model_y.dy + gains.alpha2 * (model_y.y - output.y),
    }
}

/// Build the controller work function.
pub fn work(monitor: Arc<Monitor>) -> impl FnMut(f64) + Send + 'static {
    move |_t| {
        let output = monitor.output();
        let model_x = monitor.model_x();
        let model_y = monitor.model_y();
        let gains = monitor.gains();
        monitor.set_lin_input(control_law(output, model_x, model_y, gains));
    }
}
