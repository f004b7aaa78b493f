//! `er-output` — run output writers for the emergency-response engine.
//!
//! Two backends are provided:
//!
//! | Backend        | Files created                                          |
//! |----------------|--------------------------------------------------------|
//! | [`CsvWriter`]  | `step_summaries.csv`, `victim_snapshots.csv`           |
//! | [`JsonlWriter`]| `step_summaries.jsonl`, `snapshots.jsonl`              |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `er_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use er_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod jsonl;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use jsonl::JsonlWriter;
pub use observer::SimOutputObserver;
pub use row::{StepRow, VictimRow};
pub use writer::OutputWriter;
