//! Reference trajectory generator.
//!
//! Publishes the circular reference from the lab statement:
//! xref(t) = (5/pi)·cos(0.2·pi·t), yref(t) = (5/pi)·sin(0.2·pi·t) with the
//! y component sign-flipped from t = 10 s on.

use rover_rt::monitor::{Monitor, Point};
use std::f64::consts::PI;
use std::sync::Arc;

const AMPLITUDE: f64 = 5.0 / PI;
const OMEGA: f64 = 0.2 * PI;
const FLIP_AT_S: f64 = 10.0;

pub fn xref(t: f64) -> f64 {
    AMPLITUDE * (OMEGA * t).cos()
}

pub fn yref(t: f64) -> f64 {
    let s = AMPLITUDE * (OMEGA * t).sin();
    if t < FLIP_AT_S { s } else { -s }
}

/// Build the reference work function.
pub fn work(monitor: Arc<Monitor>) -> impl FnMut(f64) + Send + 'static {
    move |t| {
        monitor.set_reference(Point {
            x: xref(t),
            y: yref(t),
        });
    }
}
