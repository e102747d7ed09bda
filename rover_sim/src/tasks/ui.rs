//! Operator interface task.
//!
//! Prints a status line once per cycle and drains operator commands from
//! stdin without ever blocking the cycle: a detached reader thread blocks
//! on stdin and forwards raw lines over a channel; the task parses them
//! with `try_recv`. Malformed input is discarded with a warning and the
//! cycle continues unaffected.
//!
//! Commands:
//! - `a1=NUM` / `a2=NUM`: update one gain
//! - `alpha A B`: update both gains
//! - `q`: request stop

use rover_rt::monitor::{Gains, Monitor};
use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread;
use tracing::{info, warn};

/// A parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetAlpha1(f64),
    SetAlpha2(f64),
    SetGains(f64, f64),
    Quit,
}

/// Parse one input line; `None` for anything unrecognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line == "q" {
        return Some(Command::Quit);
    }
    if let Some(rest) = line.strip_prefix("a1=") {
        return rest.trim().parse().ok().map(Command::SetAlpha1);
    }
    if let Some(rest) = line.strip_prefix("a2=") {
        return rest.trim().parse().ok().map(Command::SetAlpha2);
    }
    if let Some(rest) = line.strip_prefix("alpha") {
        let mut parts = rest.split_whitespace();
        let a1 = parts.next()?.parse().ok()?;
        let a2 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        return Some(Command::SetGains(a1, a2));
    }
    None
}

/// Start the detached stdin reader.
///
/// The reader thread stays blocked in `read_line` until EOF or process
/// exit; it is intentionally not joined — shutdown must never wait on an
/// operator keystroke.
pub fn stdin_commands() -> Receiver<String> {
    let (tx, rx) = channel();
    let _ = thread::Builder::new().name("ui-stdin".into()).spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn apply(monitor: &Monitor, command: Command) {
    match command {
        Command::SetAlpha1(a1) => {
            let gains = monitor.gains();
            monitor.set_gains(Gains { alpha1: a1, ..gains });
            info!(alpha1 = a1, "gain updated");
        }
        Command::SetAlpha2(a2) => {
            let gains = monitor.gains();
            monitor.set_gains(Gains { alpha2: a2, ..gains });
            info!(alpha2 = a2, "gain updated");
        }
        Command::SetGains(alpha1, alpha2) => {
            monitor.set_gains(Gains { alpha1, alpha2 });
            info!(alpha1, alpha2, "gains updated");
        }
        Command::Quit => {
            info!("stop requested by operator");
            monitor.request_stop();
        }
    }
}

/// Build the UI work function.
pub fn work(monitor: Arc<Monitor>, commands: Receiver<String>) -> impl FnMut(f64) + Send + 'static {
    info!("commands: 'a1=NUM', 'a2=NUM', 'alpha A B', 'q' to stop");
    move |t| {
        let pose = monitor.pose();
        let output = monitor.output();
        let reference = monitor.reference();
        let gains = monitor.gains();
        info!(
            "[t={t:6.2}s] pos=({:.3}, {:.3}) th={:.3} | y=({:.3}, {:.3}) | ref=({:.3}, {:.3}) | alpha=({:.2}, {:.2})",
            pose.x,
            pose.y,
            pose.heading,
            output.x,
            output.y,
            reference.x,
            reference.y,
            gains.alpha1,
            gains.alpha2,
        );

        while let Ok(line) = commands.try_recv() {
            match parse_command(&line) {
                Some(command) => apply(&monitor, command),
                None => warn!(line = %line, "ignoring unrecognized command"),
            }
        }
    }
}
