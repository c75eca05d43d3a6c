//! Work-session segmentation.
//!
//! Consecutive commits separated by at most the idle gap belong to the same
//! session; a longer silence starts a new one.

use gitpace_core::{CommitRecord, Session};
use serde::{Deserialize, Serialize};

/// Split ascending `timestamps` into sessions.
///
/// A timestamp joins the open session when `timestamp - end <= idle_gap_secs`.
/// The gap saturates, so timestamps at the ends of the `i64` range split cleanly.
/// Input must already be sorted; see [`segment_sessions`] for unsorted commits.
///
/// # Examples
///
/// ```
/// use gitpace_effort::sessions::segment_timestamps;
///
/// let sessions = segment_timestamps(&[0, 1800, 3600, 20_000], 7200);
/// assert_eq!(sessions.len(), 2);
/// assert_eq!(sessions[0].commits, 3);
/// assert_eq!(sessions[0].duration_secs(), 3600);
/// assert_eq!(sessions[1].start, 20_000);
/// ```
pub fn segment_timestamps(timestamps: &[i64], idle_gap_secs: i64) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();
    for &ts in timestamps {
        match sessions.last_mut() {
            Some(open) if ts.saturating_sub(open.end) <= idle_gap_secs => {
                open.end = ts;
                open.commits += 1;
            }
            _ => sessions.push(Session {
                start: ts,
                end: ts,
                commits: 1,
            }),
        }
    }
    sessions
}

/// Segment commits in any order into chronological sessions.
pub fn segment_sessions(commits: &[CommitRecord], idle_gap_secs: i64) -> Vec<Session> {
    let mut timestamps: Vec<i64> = commits.iter().map(|c| c.timestamp).collect();
    timestamps.sort();
    segment_timestamps(&timestamps, idle_gap_secs)
}

/// Summary figures over a list of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub count: usize,
    /// Sum of session durations in hours. Single-commit sessions add zero.
    pub total_active_hours: f64,
    pub average_session_hours: f64,
    pub average_commits_per_session: f64,
    pub longest_session_hours: f64,
}

impl SessionSummary {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }
        let count = sessions.len();
        let total_active_hours: f64 = sessions.iter().map(Session::duration_hours).sum();
        let total_commits: u64 = sessions.iter().map(|s| s.commits).sum();
        let longest_session_hours = sessions
            .iter()
            .map(Session::duration_hours)
            .fold(0.0, f64::max);

        Self {
            count,
            total_active_hours,
            average_session_hours: total_active_hours / count as f64,
            average_commits_per_session: total_commits as f64 / count as f64,
            longest_session_hours,
        }
    }
}
