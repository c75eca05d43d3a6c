//! History queries answered in-process through libgit2.
//!
//! Produces the same text shapes as the `git` CLI so both backends feed the
//! same parsers.

use std::path::{Path, PathBuf};

use git2::{
    Commit, Diff, DiffOptions, DiffStatsFormat, ObjectType, Oid, Patch, Repository, Sort,
    Tree, TreeWalkMode, TreeWalkResult,
};
use gitpace_core::GitpaceError;

use crate::gateway::{HistoryQuery, QueryFailure, QueryKind, QueryOutput};

/// [`HistoryQuery`] backed by `git2`.
///
/// Each query opens its own `Repository` handle, so the gateway can be
/// shared across worker threads.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitpace_history::gateway::HistoryQuery;
/// use gitpace_history::libgit::Git2Gateway;
///
/// let gateway = Git2Gateway::open(Path::new(".")).unwrap();
/// println!("{}", gateway.commit_log().text());
/// ```
#[derive(Debug, Clone)]
pub struct Git2Gateway {
    root: PathBuf,
}

impl Git2Gateway {
    /// Discover the repository containing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitpaceError::Git`] if no repository is found.
    pub fn open(path: &Path) -> Result<Self, GitpaceError> {
        let repo = Repository::discover(path)
            .map_err(|e| GitpaceError::Git(format!("failed to open repository: {e}")))?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo.path().to_path_buf());
        Ok(Self { root })
    }

    /// Working-tree root of the repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repo(&self) -> Result<Repository, git2::Error> {
        Repository::open(&self.root)
    }

    fn run(
        &self,
        kind: QueryKind,
        subject: Option<&str>,
        query: impl FnOnce(&Repository) -> Result<String, git2::Error>,
    ) -> QueryOutput {
        match self.repo().and_then(|repo| query(&repo)) {
            Ok(text) => QueryOutput::from_text(text),
            Err(e) => QueryOutput::Failed(QueryFailure::new(kind, subject, e.message())),
        }
    }
}

impl HistoryQuery for Git2Gateway {
    fn commit_log(&self) -> QueryOutput {
        self.run(QueryKind::CommitLog, None, |repo| {
            let mut out = String::new();
            for commit in walk_head(repo)? {
                let author = commit.author();
                out.push_str(&format!(
                    "{}|{}|{}|{}|{}\n",
                    commit.id(),
                    author.name().unwrap_or("unknown"),
                    author.email().unwrap_or("unknown"),
                    author.when().seconds(),
                    commit.summary().unwrap_or(""),
                ));
            }
            Ok(out)
        })
    }

    fn commit_summary(&self, hash: &str) -> QueryOutput {
        self.run(QueryKind::CommitSummary, Some(hash), |repo| {
            let commit = repo.find_commit(Oid::from_str(hash)?)?;
            let diff = diff_first_parent(repo, &commit, &mut DiffOptions::new())?;
            let buf = diff.stats()?.to_buf(DiffStatsFormat::SHORT, 80)?;
            Ok(buf.as_str().unwrap_or_default().to_string())
        })
    }

    fn commit_numstat(&self, hash: &str) -> QueryOutput {
        self.run(QueryKind::CommitNumstat, Some(hash), |repo| {
            let commit = repo.find_commit(Oid::from_str(hash)?)?;
            let diff = diff_first_parent(repo, &commit, &mut DiffOptions::new())?;

            let mut out = String::new();
            for (idx, delta) in diff.deltas().enumerate() {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();

                // libgit2 yields no patch for binary content; report it the way
                // `git show --numstat` does.
                match Patch::from_diff(&diff, idx)? {
                    Some(patch) if !patch.delta().flags().is_binary() => {
                        let (_, added, deleted) = patch.line_stats()?;
                        out.push_str(&format!("{added}\t{deleted}\t{path}\n"));
                    }
                    _ => out.push_str(&format!("-\t-\t{path}\n")),
                }
            }
            Ok(out)
        })
    }

    fn tracked_files(&self) -> QueryOutput {
        self.run(QueryKind::TrackedFiles, None, |repo| {
            if repo.is_empty()? {
                return Ok(String::new());
            }
            let tree = repo.head()?.peel_to_tree()?;
            let mut out = String::new();
            tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
                if entry.kind() == Some(ObjectType::Blob) {
                    if let Some(name) = entry.name() {
                        out.push_str(dir);
                        out.push_str(name);
                        out.push('\n');
                    }
                }
                TreeWalkResult::Ok
            })?;
            Ok(out)
        })
    }

    fn file_log(&self, path: &str) -> QueryOutput {
        self.run(QueryKind::FileLog, Some(path), |repo| {
            let mut out = String::new();
            for commit in walk_head(repo)? {
                if !touches_path(&commit, Path::new(path))? {
                    continue;
                }
                let author = commit.author();
                out.push_str(&format!(
                    "{}|{}|{}\n",
                    commit.id(),
                    author.when().seconds(),
                    author.name().unwrap_or("unknown"),
                ));
            }
            Ok(out)
        })
    }
}

/// Commits reachable from HEAD, newest first. An unborn HEAD has no commits.
fn walk_head(repo: &Repository) -> Result<Vec<Commit<'_>>, git2::Error> {
    if repo.is_empty()? {
        return Ok(Vec::new());
    }
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut commits = Vec::new();
    for oid in revwalk {
        commits.push(repo.find_commit(oid?)?);
    }
    Ok(commits)
}

/// Whether `commit` changed the entry at `path`.
///
/// A commit is skipped when the entry matches any of its parents, so a merge
/// that only brings in a side branch's version is not a touch.
fn touches_path(commit: &Commit<'_>, path: &Path) -> Result<bool, git2::Error> {
    let entry = |tree: &Tree<'_>| {
        tree.get_path(path)
            .ok()
            .map(|entry| (entry.id(), entry.filemode()))
    };
    let current = entry(&commit.tree()?);
    if commit.parent_count() == 0 {
        return Ok(current.is_some());
    }
    for parent in commit.parents() {
        if entry(&parent.tree()?) == current {
            return Ok(false);
        }
    }
    Ok(true)
}

fn diff_first_parent<'r>(
    repo: &'r Repository,
    commit: &Commit<'_>,
    opts: &mut DiffOptions,
) -> Result<Diff<'r>, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };
    repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(opts))
}
