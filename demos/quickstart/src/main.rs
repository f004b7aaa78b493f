//! quickstart — one emergency-response run from the command line.
//!
//! ```text
//! quickstart [CONFIG.json] [OUTPUT_DIR]
//! ```
//!
//! Without a config file the default 20×20 earthquake scenario is used.
//! Output lands in `output/quickstart` unless a directory is given:
//! step summaries and victim snapshots as CSV, full snapshots as JSON lines,
//! and the resolved config as `config.json`.  Set `RUST_LOG=debug` for the
//! per-step trace.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use er_core::{SimConfig, Tick};
use er_output::{CsvWriter, JsonlWriter, OutputWriter, SimOutputObserver};
use er_sim::{AgentAction, Metrics, SimBuilder, SimObserver, Snapshot, StepReport};

const DEFAULT_OUTPUT_DIR: &str = "output/quickstart";

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Feeds every callback to both output backends and counts rescues and losses
/// for the console.
struct ConsoleObserver<A: OutputWriter, B: OutputWriter> {
    csv:     SimOutputObserver<A>,
    jsonl:   SimOutputObserver<B>,
    rescues: u32,
    losses:  u32,
}

impl<A: OutputWriter, B: OutputWriter> SimObserver for ConsoleObserver<A, B> {
    fn on_step_start(&mut self, step: Tick) {
        self.csv.on_step_start(step);
        self.jsonl.on_step_start(step);
    }

    fn on_step_end(&mut self, report: &StepReport) {
        if matches!(&report.action, AgentAction::Rescue { outcome } if outcome.is_success()) {
            self.rescues += 1;
        }
        self.losses += report.lost.len() as u32;
        self.csv.on_step_end(report);
        self.jsonl.on_step_end(report);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.csv.on_snapshot(snapshot);
        self.jsonl.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_step: Tick, metrics: &Metrics) {
        self.csv.on_sim_end(final_step, metrics);
        self.jsonl.on_sim_end(final_step, metrics);
    }
}

// ── Map rendering ─────────────────────────────────────────────────────────────

/// One character per cell: agent `@`, base `B`, victim `V`, cache `C`,
/// heavy hazard `#`, light hazard `+`, otherwise the terrain letter.
fn render(snapshot: &Snapshot) -> String {
    let mut rows: Vec<Vec<char>> = snapshot.terrain.iter().map(|r| r.chars().collect()).collect();
    let mut put = |row: u32, col: u32, ch: char| {
        if let Some(cell) = rows.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            *cell = ch;
        }
    };
    for h in &snapshot.hazards {
        put(h.cell.row, h.cell.col, if h.intensity >= 0.5 { '#' } else { '+' });
    }
    for c in &snapshot.caches {
        put(c.position.row, c.position.col, 'C');
    }
    for v in &snapshot.victims {
        put(v.position.row, v.position.col, 'V');
    }
    put(snapshot.base.row, snapshot.base.col, 'B');
    put(snapshot.agent.position.row, snapshot.agent.position.col, '@');

    rows.into_iter().map(|r| r.into_iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::from_path(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        None => SimConfig::default(),
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    println!("=== quickstart — emergency-response simulation ===");
    println!(
        "Grid: {n}×{n}  |  Disaster: {}  |  Seed: {}  |  Steps: {}",
        config.disaster,
        config.seed,
        config.total_steps,
        n = config.grid_size,
    );
    println!();

    // 1. Build the sim from a generated scenario.
    let mut sim = SimBuilder::new(config.clone()).build()?;
    let start = sim.snapshot();
    println!("Initial map ({} victims, {} caches):", start.victims.len(), start.caches.len());
    println!("{}", render(&start));
    println!();

    // 2. Set up output.
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    std::fs::write(out_dir.join("config.json"), config.to_json_pretty()?)?;
    let mut obs = ConsoleObserver {
        csv:     SimOutputObserver::new(CsvWriter::new(&out_dir)?),
        jsonl:   SimOutputObserver::new(JsonlWriter::new(&out_dir)?),
        rescues: 0,
        losses:  0,
    };

    // 3. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "run finished");

    for e in [obs.csv.take_error(), obs.jsonl.take_error()].into_iter().flatten() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    let end = sim.snapshot();
    let m = &end.metrics;
    println!("Final map after {} steps:", m.steps);
    println!("{}", render(&end));
    println!();
    println!("{:<22} {:>10}", "Metric", "Value");
    println!("{}", "-".repeat(33));
    println!("{:<22} {:>10}", "victims", m.initial_victims);
    println!("{:<22} {:>10}", "saved", m.saved);
    println!("{:<22} {:>10}", "delivered", m.delivered);
    println!("{:<22} {:>10}", "lost", m.lost);
    println!("{:<22} {:>10}", "remaining", m.remaining);
    println!("{:<22} {:>10}", "rescue attempts", m.rescue_attempts);
    println!("{:<22} {:>10}", "resources used", m.resources_used);
    println!("{:<22} {:>10}", "resources collected", m.resources_collected);
    println!("{:<22} {:>10.2}", "risk exposure", m.risk_exposure);
    println!("{:<22} {:>10.2}", "total hazard", m.total_hazard);
    println!("{:<22} {:>10.4}", "efficiency", m.efficiency_score);
    println!();
    println!(
        "{} successful rescues and {} losses observed in {:.3} s; output in {}",
        obs.rescues,
        obs.losses,
        elapsed.as_secs_f64(),
        out_dir.display()
    );

    Ok(())
}
