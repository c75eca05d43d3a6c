//! Human-effort estimation.
//!
//! Two independent views of how long the measured output would take a human
//! contributor (by line volume and by flat per-file cost), compared against
//! the measured wall-clock span of the history.

use gitpace_core::{EstimationConfig, FileCategory, Session};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateStatistics;

const TESTING_SHARE: f64 = 0.3;
const PLANNING_SHARE: f64 = 0.2;
const DOCUMENTATION_SHARE: f64 = 0.15;
const REVIEW_SHARE: f64 = 0.15;

/// Complete estimate for one run. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortEstimate {
    pub line_based: ScenarioDays,
    pub file_based: FileBasedEstimate,
    pub actual: ActualEffort,
    /// Average-scenario days over actual days; `None` when actual days is 0.
    pub efficiency_multiplier: Option<f64>,
    /// Average-scenario days minus actual days.
    pub time_saved_days: f64,
    pub velocity: Velocity,
}

/// Line-based day counts per scenario, overhead included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDays {
    pub conservative: f64,
    pub average: f64,
    pub optimistic: f64,
}

/// Flat per-file cost model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBasedEstimate {
    pub script_files: u64,
    pub configuration_files: u64,
    pub other_files: u64,
    /// Sum of per-file hours before the overhead multiplier.
    pub base_hours: f64,
    /// `base_hours` times the overhead multiplier.
    pub scaled_hours: f64,
    pub days: f64,
    /// Breakdown of `base_hours`; shares do not sum to one.
    pub phases: PhaseHours,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseHours {
    pub development: f64,
    pub testing: f64,
    pub planning: f64,
    pub documentation: f64,
    pub review: f64,
}

impl PhaseHours {
    fn from_base(hours: f64) -> Self {
        Self {
            development: hours,
            testing: hours * TESTING_SHARE,
            planning: hours * PLANNING_SHARE,
            documentation: hours * DOCUMENTATION_SHARE,
            review: hours * REVIEW_SHARE,
        }
    }
}

/// Measured effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualEffort {
    /// Time span in days, raised to the configured floor.
    pub days: f64,
    /// Unfloored time span in hours.
    pub hours: f64,
    /// Sum of session durations in hours.
    pub active_hours: f64,
    pub sessions: usize,
}

/// Output per day at one pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceRates {
    pub lines_per_day: f64,
    pub files_per_day: f64,
    pub commits_per_day: f64,
}

impl PaceRates {
    fn over(stats: &AggregateStatistics, days: f64) -> Option<Self> {
        if days <= 0.0 {
            return None;
        }
        Some(Self {
            lines_per_day: stats.totals.lines as f64 / days,
            files_per_day: stats.totals.files as f64 / days,
            commits_per_day: stats.totals.commits as f64 / days,
        })
    }
}

/// Measured pace against the average-scenario human pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Velocity {
    pub actual: Option<PaceRates>,
    pub human: Option<PaceRates>,
}

/// Days for `lines` at `rate` lines/day, scaled by `overhead`.
///
/// A non-positive rate yields 0.
///
/// # Examples
///
/// ```
/// use gitpace_effort::estimate::line_days;
///
/// assert!((line_days(4000, 125.0, 1.8) - 57.6).abs() < 1e-9);
/// assert_eq!(line_days(4000, 0.0, 1.8), 0.0);
/// ```
pub fn line_days(lines: u64, rate: f64, overhead: f64) -> f64 {
    if rate > 0.0 {
        lines as f64 / rate * overhead
    } else {
        0.0
    }
}

/// Estimate human effort for the analysed repository.
///
/// Deterministic: identical inputs give identical output.
///
/// # Examples
///
/// ```
/// use gitpace_core::EstimationConfig;
/// use gitpace_effort::aggregate::AggregateStatistics;
/// use gitpace_effort::estimate::estimate_effort;
///
/// let mut stats = AggregateStatistics::default();
/// stats.totals.lines = 4000;
///
/// let estimate = estimate_effort(&stats, &[], &EstimationConfig::default());
/// assert_eq!(estimate.actual.days, 0.5);
/// let multiplier = estimate.efficiency_multiplier.unwrap();
/// assert!((multiplier - 115.2).abs() < 1e-9);
/// ```
pub fn estimate_effort(
    stats: &AggregateStatistics,
    sessions: &[Session],
    config: &EstimationConfig,
) -> EffortEstimate {
    let overhead = config.overhead_multiplier;
    let lines = stats.totals.lines;

    let line_based = ScenarioDays {
        conservative: line_days(lines, config.scenarios.conservative, overhead),
        average: line_days(lines, config.scenarios.average, overhead),
        optimistic: line_days(lines, config.scenarios.optimistic, overhead),
    };

    let file_based = file_estimate(stats, config);

    let span = &stats.time_span;
    let actual = ActualEffort {
        days: span.days.max(config.min_actual_days),
        hours: span.hours,
        active_hours: sessions.iter().map(Session::duration_hours).sum(),
        sessions: sessions.len(),
    };

    let efficiency_multiplier = if actual.days == 0.0 {
        None
    } else {
        Some(line_based.average / actual.days)
    };

    EffortEstimate {
        time_saved_days: line_based.average - actual.days,
        velocity: Velocity {
            actual: PaceRates::over(stats, actual.days),
            human: PaceRates::over(stats, line_based.average),
        },
        line_based,
        file_based,
        actual,
        efficiency_multiplier,
    }
}

fn file_estimate(stats: &AggregateStatistics, config: &EstimationConfig) -> FileBasedEstimate {
    let model = &config.file_hours;
    let counts = &stats.categories;
    let base_hours = [
        FileCategory::Script,
        FileCategory::Configuration,
        FileCategory::Other,
    ]
    .into_iter()
    .map(|category| counts.get(category) as f64 * model.hours_for(category))
    .sum::<f64>();

    let days = if config.hours_per_workday > 0.0 {
        base_hours / config.hours_per_workday * config.overhead_multiplier
    } else {
        0.0
    };

    FileBasedEstimate {
        script_files: counts.script,
        configuration_files: counts.configuration,
        other_files: counts.other,
        base_hours,
        scaled_hours: base_hours * config.overhead_multiplier,
        days,
        phases: PhaseHours::from_base(base_hours),
    }
}
