//! Commit activity by hour of day and calendar day (UTC).

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};
use gitpace_core::CommitRecord;
use serde::{Deserialize, Serialize};

/// Commit counts bucketed by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTimeline {
    /// Hour of day (0-23) → commits. Hours without commits are absent.
    pub commits_by_hour: BTreeMap<u32, u64>,
    /// `YYYY-MM-DD` → commits.
    pub commits_by_day: BTreeMap<String, u64>,
    /// Hour with the most commits; earliest hour wins ties.
    pub peak_hour: Option<u32>,
    /// Day with the most commits; earliest day wins ties.
    pub busiest_day: Option<String>,
    /// Number of distinct days with at least one commit.
    pub active_days: usize,
}

/// Bucket commits by UTC hour and day.
///
/// Timestamps outside chrono's representable range are skipped.
///
/// # Examples
///
/// ```
/// use gitpace_core::{ChangeStats, CommitRecord};
/// use gitpace_effort::timeline::build_timeline;
///
/// let commit = CommitRecord {
///     hash: "h1".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1_700_000_000, // 2023-11-14 22:13:20 UTC
///     message: "init".into(),
///     stats: ChangeStats::default(),
/// };
///
/// let timeline = build_timeline(&[commit]);
/// assert_eq!(timeline.peak_hour, Some(22));
/// assert_eq!(timeline.busiest_day.as_deref(), Some("2023-11-14"));
/// ```
pub fn build_timeline(commits: &[CommitRecord]) -> ActivityTimeline {
    let mut commits_by_hour: BTreeMap<u32, u64> = BTreeMap::new();
    let mut commits_by_day: BTreeMap<String, u64> = BTreeMap::new();

    for commit in commits {
        let Some(when) = DateTime::from_timestamp(commit.timestamp, 0) else {
            continue;
        };
        *commits_by_hour.entry(when.hour()).or_default() += 1;
        *commits_by_day
            .entry(when.format("%Y-%m-%d").to_string())
            .or_default() += 1;
    }

    ActivityTimeline {
        peak_hour: busiest(&commits_by_hour).copied(),
        busiest_day: busiest(&commits_by_day).cloned(),
        active_days: commits_by_day.len(),
        commits_by_hour,
        commits_by_day,
    }
}

/// First key holding the maximum count.
fn busiest<K>(counts: &BTreeMap<K, u64>) -> Option<&K> {
    let mut best: Option<(&K, u64)> = None;
    for (key, &count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}
