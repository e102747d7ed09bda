//! Append-only, lock-protected CSV record sinks.
//!
//! One open/close lifecycle per run: creation (including the header row)
//! happens before any task starts and a failure there is fatal; appends
//! come from any task at any time and are serialized but not ordered
//! across tasks. A failed append is reported through `tracing` and the
//! task keeps running — mid-run log trouble must never perturb the
//! schedule.

use crate::monitor::{Point, WheelInput};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Shared shape of all CSV sinks: a mutex-guarded buffered writer.
#[derive(Debug)]
struct CsvSink {
    writer: Mutex<BufWriter<File>>,
}

impl CsvSink {
    /// Create the file (and its parent directory) and write the header.
    fn create(path: &Path, header: &str) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{header}")?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Append one row. Serialized across tasks; errors are logged, not
    /// propagated.
    fn append(&self, row: fmt::Arguments<'_>) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writer.write_fmt(row).and_then(|_| writer.write_all(b"\n")) {
            warn!("log append failed: {e}");
        }
    }

    fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .flush()
    }
}

/// Performance log: one row per task cycle, shared by all tasks.
///
/// Columns: `t,task,comp_ms,jitter_ms`.
#[derive(Debug)]
pub struct PerfLog {
    sink: CsvSink,
}

impl PerfLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            sink: CsvSink::create(path, "t,task,comp_ms,jitter_ms")?,
        })
    }

    pub fn record(&self, task: &str, t: f64, comp_ms: f64, jitter_ms: f64) {
        self.sink
            .append(format_args!("{t:.6},{task},{comp_ms:.3},{jitter_ms:.3}"));
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Trajectory log: one row per plant cycle.
///
/// Columns: `t,y1,y2,xref,yref`.
#[derive(Debug)]
pub struct TrajLog {
    sink: CsvSink,
}

impl TrajLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            sink: CsvSink::create(path, "t,y1,y2,xref,yref")?,
        })
    }

    pub fn record(&self, t: f64, output: Point, reference: Point) {
        self.sink.append(format_args!(
            "{t:.6},{:.6},{:.6},{:.6},{:.6}",
            output.x, output.y, reference.x, reference.y
        ));
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Lockstep sample log: one row per driver step.
///
/// Columns: `t,v,w,yx,yy`.
#[derive(Debug)]
pub struct SampleLog {
    sink: CsvSink,
}

impl SampleLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            sink: CsvSink::create(path, "t,v,w,yx,yy")?,
        })
    }

    pub fn record(&self, t: f64, input: WheelInput, output: Point) {
        self.sink.append(format_args!(
            "{t:.6},{:.6},{:.6},{:.6},{:.6}",
            input.v, input.w, output.x, output.y
        ));
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}
