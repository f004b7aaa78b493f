//! JSON-lines output backend.
//!
//! Creates two files in the configured output directory:
//! - `step_summaries.jsonl`, one [`StepRow`] object per line
//! - `snapshots.jsonl`, one full [`Snapshot`] per line
//!
//! Snapshot lines use the same encoding as [`Snapshot::to_json`] and can be
//! read back with [`Snapshot::from_json`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use er_sim::Snapshot;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepRow};

pub struct JsonlWriter {
    steps:     BufWriter<File>,
    snapshots: BufWriter<File>,
    finished:  bool,
}

impl JsonlWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let steps = BufWriter::new(File::create(dir.join("step_summaries.jsonl"))?);
        let snapshots = BufWriter::new(File::create(dir.join("snapshots.jsonl"))?);
        Ok(Self { steps, snapshots, finished: false })
    }
}

impl OutputWriter for JsonlWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        serde_json::to_writer(&mut self.steps, row)?;
        self.steps.write_all(b"\n")?;
        Ok(())
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()> {
        serde_json::to_writer(&mut self.snapshots, snapshot)?;
        self.snapshots.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
