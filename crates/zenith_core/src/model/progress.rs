//! Progress summary projection used by coaching prompts and dashboards.

use crate::model::goal::{Goal, GoalStatus};
use serde::Serialize;

/// One row of a progress summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEntry {
    pub title: String,
    /// Completion percentage rounded to one decimal; `None` for zero targets.
    pub percent: Option<f64>,
    pub status: GoalStatus,
}

impl ProgressEntry {
    /// Renders the percentage the way the UI shows it, e.g. `23.7%`.
    pub fn percent_label(&self) -> String {
        match self.percent {
            Some(value) => format!("{value:.1}%"),
            None => "n/a".to_string(),
        }
    }
}

/// Summarizes progress for each goal, preserving input order.
pub fn summarize_progress(goals: &[Goal]) -> Vec<ProgressEntry> {
    goals
        .iter()
        .map(|goal| ProgressEntry {
            title: goal.title.clone(),
            percent: goal
                .progress_ratio()
                .map(|ratio| (ratio * 1000.0).round() / 10.0),
            status: goal.status(),
        })
        .collect()
}
