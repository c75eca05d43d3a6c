//! History queries answered by shelling out to the `git` CLI.

use std::path::PathBuf;
use std::process::Command;

use crate::gateway::{HistoryQuery, QueryFailure, QueryKind, QueryOutput};

/// Fields of one commit-log line, `hash|author|email|timestamp|subject`.
const COMMIT_LOG_FORMAT: &str = "--format=%H|%an|%ae|%at|%s";

/// Fields of one file-history line, `hash|timestamp|author`.
const FILE_LOG_FORMAT: &str = "--format=%H|%at|%an";

/// [`HistoryQuery`] that runs `git` as a subprocess in the repository root.
///
/// A spawn error or non-zero exit status becomes [`QueryOutput::Failed`].
///
/// # Examples
///
/// ```no_run
/// use gitpace_history::command::GitCliGateway;
/// use gitpace_history::gateway::HistoryQuery;
///
/// let gateway = GitCliGateway::new(".");
/// for line in gateway.tracked_files().text().lines() {
///     println!("{line}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GitCliGateway {
    root: PathBuf,
}

impl GitCliGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, kind: QueryKind, subject: Option<&str>, args: &[&str]) -> QueryOutput {
        let output = match Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(&self.root)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return QueryOutput::Failed(QueryFailure::new(
                    kind,
                    subject,
                    format!("failed to run git: {e}"),
                ))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return QueryOutput::Failed(QueryFailure::new(
                kind,
                subject,
                format!("git {} failed ({}): {}", args[0], output.status, stderr.trim()),
            ));
        }

        QueryOutput::from_text(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistoryQuery for GitCliGateway {
    fn commit_log(&self) -> QueryOutput {
        self.git(QueryKind::CommitLog, None, &["log", COMMIT_LOG_FORMAT])
    }

    fn commit_summary(&self, hash: &str) -> QueryOutput {
        self.git(
            QueryKind::CommitSummary,
            Some(hash),
            &["show", "--stat", "--no-renames", "--format=", hash],
        )
    }

    fn commit_numstat(&self, hash: &str) -> QueryOutput {
        self.git(
            QueryKind::CommitNumstat,
            Some(hash),
            &["show", "--numstat", "--no-renames", "--format=", hash],
        )
    }

    fn tracked_files(&self) -> QueryOutput {
        self.git(
            QueryKind::TrackedFiles,
            None,
            &["ls-tree", "-r", "HEAD", "--name-only"],
        )
    }

    fn file_log(&self, path: &str) -> QueryOutput {
        self.git(
            QueryKind::FileLog,
            Some(path),
            &["log", FILE_LOG_FORMAT, "--", path],
        )
    }
}
