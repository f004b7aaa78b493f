//! Plain data row types written by output backends.

use serde::Serialize;

use er_sim::{Snapshot, StepReport};

/// Summary of one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRow {
    pub step:            u64,
    /// [`AgentAction::label`][er_sim::AgentAction::label] of the agent's action.
    pub action:          &'static str,
    /// Hazard coverage ratio at the start of the step.
    pub coverage:        f64,
    pub spread_events:   u32,
    pub newly_hazardous: u32,
    pub seeded:          bool,
    /// Victims lost during this step alone.
    pub lost_this_step:  u32,
    pub saved:           u32,
    pub lost:            u32,
    pub remaining:       u32,
    pub delivered:       u32,
    pub resources_used:  u32,
    pub rescue_attempts: u32,
    pub risk_exposure:   f64,
    pub total_hazard:    f64,
    pub efficiency:      f64,
}

impl StepRow {
    pub const HEADER: [&'static str; 16] = [
        "step",
        "action",
        "coverage",
        "spread_events",
        "newly_hazardous",
        "seeded",
        "lost_this_step",
        "saved",
        "lost",
        "remaining",
        "delivered",
        "resources_used",
        "rescue_attempts",
        "risk_exposure",
        "total_hazard",
        "efficiency",
    ];

    pub fn from_report(report: &StepReport) -> Self {
        let m = &report.metrics;
        Self {
            step:            report.step.0,
            action:          report.action.label(),
            coverage:        report.spread.coverage_before,
            spread_events:   report.spread.spread_events,
            newly_hazardous: report.spread.newly_hazardous,
            seeded:          report.spread.seeded.is_some(),
            lost_this_step:  report.lost.len() as u32,
            saved:           m.saved,
            lost:            m.lost,
            remaining:       m.remaining,
            delivered:       m.delivered,
            resources_used:  m.resources_used,
            rescue_attempts: m.rescue_attempts,
            risk_exposure:   m.risk_exposure,
            total_hazard:    m.total_hazard,
            efficiency:      m.efficiency_score,
        }
    }
}

/// One active victim at a snapshot step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VictimRow {
    pub step:     u64,
    pub victim:   u32,
    pub row:      u32,
    pub col:      u32,
    pub severity: u8,
    pub survival: f64,
}

impl VictimRow {
    pub const HEADER: [&'static str; 6] = ["step", "victim", "row", "col", "severity", "survival"];

    /// One row per active victim, in id order.
    pub fn from_snapshot(snapshot: &Snapshot) -> Vec<Self> {
        snapshot
            .victims
            .iter()
            .map(|v| VictimRow {
                step:     snapshot.step.0,
                victim:   v.id.0,
                row:      v.position.row,
                col:      v.position.col,
                severity: v.severity.get(),
                survival: v.survival,
            })
            .collect()
    }
}
