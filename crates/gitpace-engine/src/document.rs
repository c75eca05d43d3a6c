//! The exported analysis document.

use std::path::Path;

use chrono::{DateTime, Utc};
use gitpace_core::{CommitRecord, FileRecord, GitpaceConfig, GitpaceError, ScenarioRates, Session};
use gitpace_effort::{ActivityTimeline, AggregateStatistics, EffortEstimate, SessionSummary};
use gitpace_history::gateway::QueryFailure;
use serde::{Deserialize, Serialize};

/// Everything one analysis run produced, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub settings: RunSettings,
    pub statistics: AggregateStatistics,
    pub estimate: EffortEstimate,
    pub sessions: Vec<Session>,
    pub session_summary: SessionSummary,
    pub timeline: ActivityTimeline,
    /// Newest first, as mined.
    pub commits: Vec<CommitRecord>,
    pub files: Vec<FileRecord>,
    pub diagnostics: Diagnostics,
}

/// The configuration values that shaped the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSettings {
    pub idle_gap_secs: i64,
    pub scenario_rates: ScenarioRates,
    pub overhead_multiplier: f64,
    pub min_actual_days: f64,
    pub hours_per_workday: f64,
    pub workers: usize,
}

impl RunSettings {
    pub fn from_config(config: &GitpaceConfig) -> Self {
        Self {
            idle_gap_secs: config.sessions.idle_gap_secs,
            scenario_rates: config.estimation.scenarios.clone(),
            overhead_multiplier: config.estimation.overhead_multiplier,
            min_actual_days: config.estimation.min_actual_days,
            hours_per_workday: config.estimation.hours_per_workday,
            workers: config.history.worker_count(),
        }
    }
}

/// History queries that failed during the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub failed_queries: usize,
    pub failures: Vec<QueryFailure>,
}

impl Diagnostics {
    pub fn new(failures: Vec<QueryFailure>) -> Self {
        Self {
            failed_queries: failures.len(),
            failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl AnalysisDocument {
    pub fn to_json_pretty(&self) -> Result<String, GitpaceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON document to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), GitpaceError> {
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }
}
