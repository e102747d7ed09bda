//! Monitor accessor benchmark — the critical sections every task crosses
//! each cycle must stay far below the shortest task period (30 ms).

use criterion::{Criterion, criterion_group, criterion_main};
use rover_rt::monitor::{Gains, Monitor, Pose, Velocity};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn bench_uncontended(c: &mut Criterion) {
    let monitor = Monitor::new(Gains::default());

    c.bench_function("set_pose_uncontended", |b| {
        let mut k = 0.0f64;
        b.iter(|| {
            k += 1.0;
            monitor.set_pose(black_box(Pose {
                x: k,
                y: k,
                heading: 0.1,
            }));
        });
    });

    c.bench_function("read_cycle_inputs_uncontended", |b| {
        b.iter(|| {
            // A controller cycle's read set: output, both models, gains.
            black_box(monitor.output());
            black_box(monitor.model_x());
            black_box(monitor.model_y());
            black_box(monitor.gains());
        });
    });
}

fn bench_contended(c: &mut Criterion) {
    c.bench_function("set_lin_input_under_reader_load", |b| {
        let monitor = Arc::new(Monitor::new(Gains::default()));
        let readers: Vec<_> = (0..2)
            .map(|_| {
                let m = Arc::clone(&monitor);
                thread::spawn(move || {
                    while !m.stop_requested() {
                        black_box(m.lin_input());
                    }
                })
            })
            .collect();

        b.iter(|| {
            monitor.set_lin_input(black_box(Velocity { vx: 1.0, vy: -1.0 }));
        });

        monitor.request_stop();
        for r in readers {
            let _ = r.join();
        }
    });
}

criterion_group!(benches, bench_uncontended, bench_contended);
criterion_main!(benches);
