//! Throwaway repositories for tests.

use std::path::Path;

use git2::{Commit, Oid, Repository, Signature, Time};

/// Write `files` into the working tree, stage them, and commit on HEAD.
pub(crate) fn commit_files(
    repo: &Repository,
    files: &[(&str, &[u8])],
    author: &str,
    timestamp: i64,
    message: &str,
) -> Oid {
    commit_with_extra_parent(repo, None, files, author, timestamp, message)
}

/// Like [`commit_files`], but records `other` as a second parent.
pub(crate) fn merge_files(
    repo: &Repository,
    other: Oid,
    files: &[(&str, &[u8])],
    author: &str,
    timestamp: i64,
    message: &str,
) -> Oid {
    commit_with_extra_parent(repo, Some(other), files, author, timestamp, message)
}

/// Move HEAD's branch back to `target`, resetting index and working tree.
pub(crate) fn reset_hard(repo: &Repository, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.reset(&object, git2::ResetType::Hard, None).unwrap();
}

fn commit_with_extra_parent(
    repo: &Repository,
    other: Option<Oid>,
    files: &[(&str, &[u8])],
    author: &str,
    timestamp: i64,
    message: &str,
) -> Oid {
    let workdir = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (rel, content) in files {
        let full = workdir.join(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        index.add_path(Path::new(rel)).unwrap();
    }
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = Signature::new(
        author,
        &format!("{author}@example.com"),
        &Time::new(timestamp, 0),
    )
    .unwrap();
    let mut parents: Vec<Commit<'_>> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    if let Some(oid) = other {
        parents.push(repo.find_commit(oid).unwrap());
    }
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}
