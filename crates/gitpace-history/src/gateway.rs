//! Read-only history queries behind a single trait.
//!
//! Every query shape the miner needs is one method on [`HistoryQuery`].
//! Implementations never fail outright: a query that cannot run yields
//! [`QueryOutput::Failed`], which consumers read as empty text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The five query shapes issued against a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    /// Full log, one `hash|author|email|timestamp|subject` line per commit.
    CommitLog,
    /// Human-readable diff-stat summary of one commit.
    CommitSummary,
    /// Numeric `insertions\tdeletions\tpath` listing of one commit.
    CommitNumstat,
    /// Tracked paths at the current snapshot, one per line.
    TrackedFiles,
    /// History of one path, one `hash|timestamp|author` line per commit.
    FileLog,
}

/// Why a query produced no text.
///
/// # Examples
///
/// ```
/// use gitpace_history::gateway::{QueryFailure, QueryKind};
///
/// let failure = QueryFailure::new(QueryKind::FileLog, Some("src/lib.rs"), "exit status 128");
/// assert_eq!(failure.subject.as_deref(), Some("src/lib.rs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFailure {
    /// Which query failed.
    pub kind: QueryKind,
    /// Commit hash or path the query was about, if any.
    pub subject: Option<String>,
    /// Underlying error message.
    pub reason: String,
}

impl QueryFailure {
    pub fn new(kind: QueryKind, subject: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.map(String::from),
            reason: reason.into(),
        }
    }
}

/// Result of one history query.
///
/// `Empty` means the query ran and there was nothing to report; `Failed`
/// means it could not run. Both read as empty text.
///
/// # Examples
///
/// ```
/// use gitpace_history::gateway::{QueryFailure, QueryKind, QueryOutput};
///
/// assert!(matches!(QueryOutput::from_text("  \n"), QueryOutput::Empty));
/// assert_eq!(QueryOutput::from_text("a.rs\n").text(), "a.rs\n");
///
/// let failed = QueryOutput::Failed(QueryFailure::new(QueryKind::CommitLog, None, "boom"));
/// assert_eq!(failed.text(), "");
/// assert!(failed.failure().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
    Text(String),
    Empty,
    Failed(QueryFailure),
}

impl QueryOutput {
    /// Wrap raw output, mapping whitespace-only text to [`QueryOutput::Empty`].
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            QueryOutput::Empty
        } else {
            QueryOutput::Text(text)
        }
    }

    /// The text, or `""` for empty and failed queries.
    pub fn text(&self) -> &str {
        match self {
            QueryOutput::Text(text) => text,
            QueryOutput::Empty | QueryOutput::Failed(_) => "",
        }
    }

    pub fn failure(&self) -> Option<&QueryFailure> {
        match self {
            QueryOutput::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Read access to a repository's history.
///
/// Implementations must be safe to call from several worker threads at once;
/// per-commit and per-file queries are dispatched concurrently.
pub trait HistoryQuery: Send + Sync {
    /// Full commit log, newest first.
    fn commit_log(&self) -> QueryOutput;

    /// Diff-stat summary (`N files changed, ...`) for `hash`.
    fn commit_summary(&self, hash: &str) -> QueryOutput;

    /// Numeric per-file delta listing for `hash`.
    fn commit_numstat(&self, hash: &str) -> QueryOutput;

    /// Paths tracked at HEAD.
    fn tracked_files(&self) -> QueryOutput;

    /// Commits touching `path`, newest first.
    fn file_log(&self, path: &str) -> QueryOutput;
}

/// Serves canned query output, e.g. text captured from an earlier run.
///
/// Queries with no registered output return [`QueryOutput::Empty`].
///
/// # Examples
///
/// ```
/// use gitpace_history::gateway::{HistoryQuery, QueryKind, ReplayGateway};
///
/// let gateway = ReplayGateway::new()
///     .with(QueryKind::CommitLog, None, "abc|alice|a@x.io|1700000000|init\n")
///     .with(QueryKind::CommitSummary, Some("abc"), " 1 file changed, 2 insertions(+)\n");
///
/// assert!(gateway.commit_log().text().starts_with("abc|"));
/// assert!(gateway.commit_numstat("abc").text().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplayGateway {
    outputs: HashMap<(QueryKind, String), QueryOutput>,
}

impl ReplayGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text returned for `kind` about `subject`.
    #[must_use]
    pub fn with(mut self, kind: QueryKind, subject: Option<&str>, text: &str) -> Self {
        self.outputs.insert(
            (kind, subject.unwrap_or_default().to_string()),
            QueryOutput::from_text(text),
        );
        self
    }

    /// Register a failure for `kind` about `subject`.
    #[must_use]
    pub fn failing(mut self, kind: QueryKind, subject: Option<&str>, reason: &str) -> Self {
        self.outputs.insert(
            (kind, subject.unwrap_or_default().to_string()),
            QueryOutput::Failed(QueryFailure::new(kind, subject, reason)),
        );
        self
    }

    fn lookup(&self, kind: QueryKind, subject: &str) -> QueryOutput {
        self.outputs
            .get(&(kind, subject.to_string()))
            .cloned()
            .unwrap_or(QueryOutput::Empty)
    }
}

impl HistoryQuery for ReplayGateway {
    fn commit_log(&self) -> QueryOutput {
        self.lookup(QueryKind::CommitLog, "")
    }

    fn commit_summary(&self, hash: &str) -> QueryOutput {
        self.lookup(QueryKind::CommitSummary, hash)
    }

    fn commit_numstat(&self, hash: &str) -> QueryOutput {
        self.lookup(QueryKind::CommitNumstat, hash)
    }

    fn tracked_files(&self) -> QueryOutput {
        self.lookup(QueryKind::TrackedFiles, "")
    }

    fn file_log(&self, path: &str) -> QueryOutput {
        self.lookup(QueryKind::FileLog, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_queries_are_empty() {
        let gateway = ReplayGateway::new();
        assert_eq!(gateway.commit_log(), QueryOutput::Empty);
        assert_eq!(gateway.file_log("missing.rs"), QueryOutput::Empty);
    }

    #[test]
    fn failures_carry_subject_and_kind() {
        let gateway = ReplayGateway::new().failing(QueryKind::CommitNumstat, Some("abc"), "gone");
        let output = gateway.commit_numstat("abc");
        let failure = output.failure().unwrap();
        assert_eq!(failure.kind, QueryKind::CommitNumstat);
        assert_eq!(failure.subject.as_deref(), Some("abc"));
        assert_eq!(failure.reason, "gone");
        assert_eq!(output.text(), "");
    }

    #[test]
    fn subjects_are_kept_apart() {
        let gateway = ReplayGateway::new()
            .with(QueryKind::FileLog, Some("a.rs"), "h1|1|alice\n")
            .with(QueryKind::FileLog, Some("b.rs"), "h2|2|bob\n");
        assert!(gateway.file_log("a.rs").text().contains("alice"));
        assert!(gateway.file_log("b.rs").text().contains("bob"));
    }

    #[test]
    fn failure_serializes_camel_case() {
        let failure = QueryFailure::new(QueryKind::TrackedFiles, None, "no HEAD");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "trackedFiles");
        assert!(json["subject"].is_null());
    }
}
