//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `step_summaries.csv`
//! - `victim_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use er_sim::Snapshot;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepRow, VictimRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    steps:    Writer<File>,
    victims:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut steps = Writer::from_path(dir.join("step_summaries.csv"))?;
        steps.write_record(StepRow::HEADER)?;

        let mut victims = Writer::from_path(dir.join("victim_snapshots.csv"))?;
        victims.write_record(VictimRow::HEADER)?;

        Ok(Self { steps, victims, finished: false })
    }

    /// Write a batch of victim rows.
    pub fn write_victims(&mut self, rows: &[VictimRow]) -> OutputResult<()> {
        for row in rows {
            self.victims.write_record(&[
                row.step.to_string(),
                row.victim.to_string(),
                row.row.to_string(),
                row.col.to_string(),
                row.severity.to_string(),
                format!("{:.4}", row.survival),
            ])?;
        }
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        self.steps.write_record(&[
            row.step.to_string(),
            row.action.to_string(),
            format!("{:.4}", row.coverage),
            row.spread_events.to_string(),
            row.newly_hazardous.to_string(),
            (row.seeded as u8).to_string(),
            row.lost_this_step.to_string(),
            row.saved.to_string(),
            row.lost.to_string(),
            row.remaining.to_string(),
            row.delivered.to_string(),
            row.resources_used.to_string(),
            row.rescue_attempts.to_string(),
            format!("{:.4}", row.risk_exposure),
            format!("{:.4}", row.total_hazard),
            format!("{:.6}", row.efficiency),
        ])?;
        Ok(())
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()> {
        self.write_victims(&VictimRow::from_snapshot(snapshot))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.victims.flush()?;
        Ok(())
    }
}
