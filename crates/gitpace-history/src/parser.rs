//! Commit history parsing.
//!
//! Turns the raw commit log into [`CommitRecord`]s and enriches each one
//! with [`ChangeStats`] from its diff-stat summary and numeric per-file
//! listing. Malformed lines are skipped; nothing here fails.

use std::sync::OnceLock;

use gitpace_core::{ChangeStats, CommitRecord, FileDelta, HistoryConfig};
use regex::Regex;

use crate::gateway::{HistoryQuery, QueryFailure, QueryOutput};
use crate::pool::map_bounded;

/// Options shared by the commit miner and the file inventory.
///
/// # Examples
///
/// ```
/// use gitpace_history::parser::MiningOptions;
///
/// let opts = MiningOptions { workers: 2, ..MiningOptions::default() };
/// assert_eq!(opts.workers, 2);
/// assert!(opts.exclude.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MiningOptions {
    /// Maximum concurrent per-commit / per-file queries (1 = sequential).
    pub workers: usize,
    /// Glob patterns for tracked paths to leave out of the inventory.
    pub exclude: Vec<String>,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

impl MiningOptions {
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self {
            workers: config.worker_count(),
            exclude: config.exclude.clone(),
        }
    }
}

/// Commits mined from the log plus every query that failed along the way.
#[derive(Debug, Clone, Default)]
pub struct MinedHistory {
    /// Commits in log order (newest first).
    pub commits: Vec<CommitRecord>,
    pub failures: Vec<QueryFailure>,
}

/// Totals from a diff-stat summary line.
///
/// # Examples
///
/// ```
/// use gitpace_history::parser::{parse_change_summary, SummaryCounts};
///
/// let counts = parse_change_summary(" 3 files changed, 10 insertions(+), 2 deletions(-)");
/// assert_eq!(counts, SummaryCounts { files_changed: 3, insertions: 10, deletions: 2 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
}

fn summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?",
        )
        .expect("diff-stat summary pattern is valid")
    })
}

/// Extract the totals from a diff-stat summary.
///
/// Searches anywhere in `text`, so a full `--stat` listing works as well as a
/// bare summary line. Missing clauses count zero; no match yields all zeros.
///
/// # Examples
///
/// ```
/// use gitpace_history::parser::parse_change_summary;
///
/// let counts = parse_change_summary("1 file changed, 5 insertions(+)");
/// assert_eq!((counts.files_changed, counts.insertions, counts.deletions), (1, 5, 0));
/// ```
pub fn parse_change_summary(text: &str) -> SummaryCounts {
    let Some(caps) = summary_pattern().captures(text) else {
        return SummaryCounts::default();
    };
    let group = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    SummaryCounts {
        files_changed: group(1),
        insertions: group(2),
        deletions: group(3),
    }
}

/// Parse a numeric per-file listing (`insertions\tdeletions\tpath`).
///
/// `-` counts as zero (binary files). Lines without a tab, with fewer than
/// three fields, or with a non-numeric count are skipped.
///
/// # Examples
///
/// ```
/// use gitpace_history::parser::parse_numstat;
///
/// let deltas = parse_numstat("4\t1\tsrc/main.rs\n-\t-\tlogo.png\nnoise\n");
/// assert_eq!(deltas.len(), 2);
/// assert_eq!(deltas[0].insertions, 4);
/// assert_eq!(deltas[1].path, "logo.png");
/// assert_eq!(deltas[1].insertions, 0);
/// ```
pub fn parse_numstat(text: &str) -> Vec<FileDelta> {
    text.lines().filter_map(parse_numstat_line).collect()
}

fn parse_numstat_line(line: &str) -> Option<FileDelta> {
    if !line.contains('\t') {
        return None;
    }
    let mut fields = line.splitn(3, '\t');
    let insertions = parse_count(fields.next()?)?;
    let deletions = parse_count(fields.next()?)?;
    let path = fields.next()?;
    if path.is_empty() {
        return None;
    }
    Some(FileDelta {
        path: path.to_string(),
        insertions,
        deletions,
    })
}

fn parse_count(field: &str) -> Option<u64> {
    match field.trim() {
        "-" => Some(0),
        other => other.parse().ok(),
    }
}

/// Parse the commit log into records with empty [`ChangeStats`].
///
/// Each line is `hash|author|email|timestamp|message`; a message containing
/// `|` is rejoined from every field after the fourth. Lines with fewer than
/// five fields or a non-integer timestamp are skipped. Order is preserved.
///
/// # Examples
///
/// ```
/// use gitpace_history::parser::parse_commit_log;
///
/// let commits = parse_commit_log("abc|alice|a@x.io|1700000000|fix: a | b\ngarbage\n");
/// assert_eq!(commits.len(), 1);
/// assert_eq!(commits[0].message, "fix: a | b");
/// ```
pub fn parse_commit_log(text: &str) -> Vec<CommitRecord> {
    text.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<CommitRecord> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 5 {
        return None;
    }
    let hash = parts[0].trim();
    if hash.is_empty() {
        return None;
    }
    let timestamp = parts[3].trim().parse::<i64>().ok()?;
    Some(CommitRecord {
        hash: hash.to_string(),
        author: parts[1].to_string(),
        email: parts[2].to_string(),
        timestamp,
        message: parts[4..].join("|"),
        stats: ChangeStats::default(),
    })
}

/// Query and parse the change statistics of one commit.
///
/// Returns the stats together with any failed queries; a failed query
/// contributes nothing to the stats.
pub fn fetch_change_stats(
    gateway: &dyn HistoryQuery,
    hash: &str,
) -> (ChangeStats, Vec<QueryFailure>) {
    let summary = gateway.commit_summary(hash);
    let numstat = gateway.commit_numstat(hash);

    let counts = parse_change_summary(summary.text());
    let stats = ChangeStats {
        files_changed: counts.files_changed,
        insertions: counts.insertions,
        deletions: counts.deletions,
        files: parse_numstat(numstat.text()),
    };

    let failures = [summary, numstat]
        .into_iter()
        .filter_map(|output| match output {
            QueryOutput::Failed(failure) => Some(failure),
            _ => None,
        })
        .collect();
    (stats, failures)
}

/// Mine the full commit history.
///
/// Per-commit statistic queries run on up to `options.workers` threads;
/// the returned commits keep log order (newest first).
///
/// # Examples
///
/// ```
/// use gitpace_history::gateway::{QueryKind, ReplayGateway};
/// use gitpace_history::parser::{mine_commits, MiningOptions};
///
/// let gateway = ReplayGateway::new()
///     .with(QueryKind::CommitLog, None, "h1|alice|a@x.io|1700000000|init\n")
///     .with(QueryKind::CommitSummary, Some("h1"), " 1 file changed, 12 insertions(+)\n")
///     .with(QueryKind::CommitNumstat, Some("h1"), "12\t0\tsrc/lib.rs\n");
///
/// let mined = mine_commits(&gateway, &MiningOptions::default());
/// assert_eq!(mined.commits[0].stats.insertions, 12);
/// assert!(mined.failures.is_empty());
/// ```
pub fn mine_commits(gateway: &dyn HistoryQuery, options: &MiningOptions) -> MinedHistory {
    let log = gateway.commit_log();
    let mut failures: Vec<QueryFailure> = log.failure().cloned().into_iter().collect();
    let entries = parse_commit_log(log.text());

    let enriched = map_bounded(entries, options.workers, |mut commit| {
        let (stats, errors) = fetch_change_stats(gateway, &commit.hash);
        commit.stats = stats;
        (commit, errors)
    });

    let mut commits = Vec::with_capacity(enriched.len());
    for (commit, errors) in enriched {
        commits.push(commit);
        failures.extend(errors);
    }

    MinedHistory { commits, failures }
}
