//! Whole-repository statistics.
//!
//! A pure reduction over file and commit records: totals, language
//! breakdown, effort-category counts, time span, and contributors.

use std::collections::{BTreeMap, HashMap};

use gitpace_core::{CommitRecord, FileCategory, FileRecord};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Aggregate metrics for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatistics {
    pub totals: Totals,
    /// Language tag → totals, sorted by tag.
    pub languages: BTreeMap<String, LanguageTotals>,
    /// File counts per effort category.
    pub categories: CategoryCounts,
    pub time_span: TimeSpan,
    /// Per-author commit and line counts, most active first.
    pub contributors: Vec<Contributor>,
}

/// Repository-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub files: u64,
    pub lines: u64,
    pub size_bytes: u64,
    /// `size_bytes` in MiB, rounded to two decimals.
    pub size_mb: f64,
    pub commits: u64,
    pub insertions: u64,
    pub deletions: u64,
    /// `insertions - deletions`; negative when the history shrank the tree.
    pub net_lines: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageTotals {
    pub files: u64,
    pub lines: u64,
    pub size_bytes: u64,
}

/// Number of files in each effort category.
///
/// # Examples
///
/// ```
/// use gitpace_core::FileCategory;
/// use gitpace_effort::aggregate::CategoryCounts;
///
/// let counts = CategoryCounts { script: 3, configuration: 2, other: 5 };
/// assert_eq!(counts.get(FileCategory::Configuration), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub script: u64,
    pub configuration: u64,
    pub other: u64,
}

impl CategoryCounts {
    pub fn get(&self, category: FileCategory) -> u64 {
        match category {
            FileCategory::Script => self.script,
            FileCategory::Configuration => self.configuration,
            FileCategory::Other => self.other,
        }
    }

    fn add(&mut self, category: FileCategory) {
        match category {
            FileCategory::Script => self.script += 1,
            FileCategory::Configuration => self.configuration += 1,
            FileCategory::Other => self.other += 1,
        }
    }
}

/// Elapsed time between the earliest and latest commit.
///
/// Zero in every unit when there are no commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    pub first_commit: Option<i64>,
    pub last_commit: Option<i64>,
    pub seconds: i64,
    pub hours: f64,
    pub days: f64,
}

impl TimeSpan {
    /// Span covering `timestamps` (any order).
    ///
    /// # Examples
    ///
    /// ```
    /// use gitpace_effort::aggregate::TimeSpan;
    ///
    /// let span = TimeSpan::from_timestamps([7200, 0, 3600]);
    /// assert_eq!(span.seconds, 7200);
    /// assert_eq!(span.hours, 2.0);
    ///
    /// let empty = TimeSpan::from_timestamps([]);
    /// assert_eq!(empty.days, 0.0);
    /// assert!(empty.first_commit.is_none());
    /// ```
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = i64>) -> Self {
        let mut bounds: Option<(i64, i64)> = None;
        for ts in timestamps {
            bounds = Some(match bounds {
                None => (ts, ts),
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
            });
        }
        let Some((first, last)) = bounds else {
            return Self::default();
        };
        let seconds = last.saturating_sub(first);
        Self {
            first_commit: Some(first),
            last_commit: Some(last),
            seconds,
            hours: seconds as f64 / SECONDS_PER_HOUR,
            days: seconds as f64 / SECONDS_PER_DAY,
        }
    }
}

/// Commit activity of one author (keyed by name and email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub commits: u64,
    pub insertions: u64,
    pub deletions: u64,
}

/// Reduce file and commit records into [`AggregateStatistics`].
///
/// # Examples
///
/// ```
/// use gitpace_core::{ChangeStats, CommitRecord, FileRecord};
/// use gitpace_effort::aggregate::aggregate;
///
/// let mut file = FileRecord::empty("src/main.rs");
/// file.lines = 120;
/// let commit = CommitRecord {
///     hash: "h1".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1_700_000_000,
///     message: "init".into(),
///     stats: ChangeStats { files_changed: 1, insertions: 130, deletions: 10, files: vec![] },
/// };
///
/// let stats = aggregate(&[file], &[commit]);
/// assert_eq!(stats.totals.lines, 120);
/// assert_eq!(stats.totals.net_lines, 120);
/// assert_eq!(stats.languages["Rust"].files, 1);
/// ```
pub fn aggregate(files: &[FileRecord], commits: &[CommitRecord]) -> AggregateStatistics {
    let mut totals = Totals::default();
    let mut languages: BTreeMap<String, LanguageTotals> = BTreeMap::new();
    let mut categories = CategoryCounts::default();

    for file in files {
        totals.files += 1;
        totals.lines += file.lines;
        totals.size_bytes += file.size_bytes;
        categories.add(file.category);

        let entry = languages.entry(file.language.clone()).or_default();
        entry.files += 1;
        entry.lines += file.lines;
        entry.size_bytes += file.size_bytes;
    }
    totals.size_mb = round2(totals.size_bytes as f64 / 1024.0 / 1024.0);

    // Key: (author name, email)
    let mut by_author: HashMap<(String, String), Contributor> = HashMap::new();
    for commit in commits {
        totals.commits += 1;
        totals.insertions += commit.stats.insertions;
        totals.deletions += commit.stats.deletions;

        let contributor = by_author
            .entry((commit.author.clone(), commit.email.clone()))
            .or_insert_with(|| Contributor {
                name: commit.author.clone(),
                email: commit.email.clone(),
                commits: 0,
                insertions: 0,
                deletions: 0,
            });
        contributor.commits += 1;
        contributor.insertions += commit.stats.insertions;
        contributor.deletions += commit.stats.deletions;
    }
    totals.net_lines = totals.insertions as i64 - totals.deletions as i64;

    let mut contributors: Vec<Contributor> = by_author.into_values().collect();
    contributors.sort_by(|a, b| {
        b.commits
            .cmp(&a.commits)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.email.cmp(&b.email))
    });

    AggregateStatistics {
        totals,
        languages,
        categories,
        time_span: TimeSpan::from_timestamps(commits.iter().map(|c| c.timestamp)),
        contributors,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitpace_core::ChangeStats;

    fn file(path: &str, lines: u64, size: u64, category: FileCategory) -> FileRecord {
        let mut record = FileRecord::empty(path);
        record.lines = lines;
        record.size_bytes = size;
        record.category = category;
        record
    }

    fn commit(author: &str, timestamp: i64, insertions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            hash: format!("hash_{timestamp}"),
            author: author.into(),
            email: format!("{author}@example.com"),
            timestamp,
            message: "test commit".into(),
            stats: ChangeStats {
                files_changed: 1,
                insertions,
                deletions,
                files: Vec::new(),
            },
        }
    }

    #[test]
    fn empty_inputs_give_zero_statistics() {
        let stats = aggregate(&[], &[]);
        assert_eq!(stats, AggregateStatistics::default());
        assert_eq!(stats.time_span.seconds, 0);
        assert_eq!(stats.time_span.hours, 0.0);
        assert!(stats.contributors.is_empty());
    }

    #[test]
    fn totals_and_language_breakdown() {
        let files = vec![
            file("a.py", 100, 2048, FileCategory::Script),
            file("b.py", 50, 1024, FileCategory::Script),
            file("README.md", 20, 512, FileCategory::Configuration),
            file("Makefile", 10, 128, FileCategory::Other),
            file("data.xyz", 5, 64, FileCategory::Other),
        ];
        let stats = aggregate(&files, &[]);
        assert_eq!(stats.totals.files, 5);
        assert_eq!(stats.totals.lines, 185);
        assert_eq!(stats.totals.size_bytes, 3776);
        assert_eq!(
            stats.languages["Python"],
            LanguageTotals {
                files: 2,
                lines: 150,
                size_bytes: 3072
            }
        );
        assert_eq!(stats.languages["Other"].files, 2);
        assert_eq!(stats.languages["Markdown"].lines, 20);
        assert_eq!(
            stats.categories,
            CategoryCounts {
                script: 2,
                configuration: 1,
                other: 2
            }
        );
    }

    #[test]
    fn size_in_megabytes_is_rounded() {
        let files = vec![file("big.bin", 0, 1_572_864, FileCategory::Other)];
        assert_eq!(aggregate(&files, &[]).totals.size_mb, 1.5);
    }

    #[test]
    fn net_lines_can_be_negative() {
        let commits = vec![commit("alice", 100, 10, 40)];
        let stats = aggregate(&[], &commits);
        assert_eq!(stats.totals.net_lines, -30);
    }

    #[test]
    fn time_span_uses_min_and_max_regardless_of_order() {
        let commits = vec![
            commit("alice", 90_000, 1, 0),
            commit("bob", 3_600, 1, 0),
            commit("alice", 176_400, 1, 0),
        ];
        let stats = aggregate(&[], &commits);
        assert_eq!(stats.time_span.first_commit, Some(3_600));
        assert_eq!(stats.time_span.last_commit, Some(176_400));
        assert_eq!(stats.time_span.seconds, 172_800);
        assert_eq!(stats.time_span.hours, 48.0);
        assert_eq!(stats.time_span.days, 2.0);
    }

    #[test]
    fn time_span_across_the_whole_i64_range_saturates() {
        let span = TimeSpan::from_timestamps([i64::MAX, i64::MIN]);
        assert_eq!(span.first_commit, Some(i64::MIN));
        assert_eq!(span.last_commit, Some(i64::MAX));
        assert_eq!(span.seconds, i64::MAX);
        assert!(span.days > 0.0);
    }

    #[test]
    fn contributors_sorted_by_commits_then_name() {
        let commits = vec![
            commit("bob", 1, 5, 0),
            commit("alice", 2, 3, 1),
            commit("carol", 3, 1, 0),
            commit("carol", 4, 2, 2),
        ];
        let stats = aggregate(&[], &commits);
        let names: Vec<&str> = stats.contributors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
        assert_eq!(stats.contributors[0].insertions, 3);
        assert_eq!(stats.contributors[0].deletions, 2);
    }
}
