//! File inventory at the current snapshot.
//!
//! Enumerates tracked paths, measures each file on disk, and replays its
//! commit history for first/last touch, touch count, and authors.

use std::collections::HashSet;
use std::path::Path;

use gitpace_core::{FileHourModel, FileRecord};

use crate::gateway::{HistoryQuery, QueryFailure};
use crate::parser::MiningOptions;
use crate::pool::map_bounded;

/// Number of leading bytes inspected for NUL when detecting binary files.
const BINARY_CHECK_SIZE: usize = 8192;

/// Every tracked file plus the queries that failed while building it.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// One record per tracked path, in enumeration order.
    pub files: Vec<FileRecord>,
    pub failures: Vec<QueryFailure>,
}

/// One row of a file's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTouch {
    pub hash: String,
    pub timestamp: i64,
    pub author: String,
}

/// Parse `hash|timestamp|author` rows, skipping malformed ones.
///
/// # Examples
///
/// ```
/// use gitpace_history::inventory::parse_file_log;
///
/// let rows = parse_file_log("h2|200|bob\nbroken\nh1|100|alice\n");
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].author, "alice");
/// ```
pub fn parse_file_log(text: &str) -> Vec<FileTouch> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 3 || parts[0].trim().is_empty() {
                return None;
            }
            let timestamp = parts[1].trim().parse::<i64>().ok()?;
            Some(FileTouch {
                hash: parts[0].trim().to_string(),
                timestamp,
                author: parts[2..].join("|"),
            })
        })
        .collect()
}

/// Fold a newest-first history into `record`.
pub fn apply_file_history(record: &mut FileRecord, touches: &[FileTouch]) {
    let (Some(newest), Some(oldest)) = (touches.first(), touches.last()) else {
        return;
    };
    record.last_commit = Some(newest.hash.clone());
    record.last_seen = Some(newest.timestamp);
    record.first_commit = Some(oldest.hash.clone());
    record.first_seen = Some(oldest.timestamp);
    record.commit_count = touches.len() as u64;
    record.authors = touches.iter().map(|t| t.author.clone()).collect();
}

/// Count lines of a text file. Binary, missing, or unreadable files count 0.
pub fn count_lines(path: &Path) -> u64 {
    let Ok(bytes) = std::fs::read(path) else {
        return 0;
    };
    let check_len = bytes.len().min(BINARY_CHECK_SIZE);
    if bytes[..check_len].contains(&0) {
        return 0;
    }
    String::from_utf8_lossy(&bytes).lines().count() as u64
}

/// Tracked paths minus excluded ones, de-duplicated, in listing order.
fn enumerate_paths(listing: &str, exclude: &[String]) -> Vec<String> {
    let patterns: Vec<glob::Pattern> = exclude
        .iter()
        .filter_map(|pat| glob::Pattern::new(pat).ok())
        .collect();

    let mut seen = HashSet::new();
    listing
        .lines()
        .map(str::trim_end)
        .filter(|path| !path.is_empty())
        .filter(|path| !patterns.iter().any(|p| p.matches(path)))
        .filter(|path| seen.insert(path.to_string()))
        .map(String::from)
        .collect()
}

/// Build the file inventory for the snapshot checked out at `root`.
///
/// Every enumerated path yields exactly one record; files that are missing
/// on disk keep a zero size and line count.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gitpace_core::FileHourModel;
/// use gitpace_history::gateway::{QueryKind, ReplayGateway};
/// use gitpace_history::inventory::build_inventory;
/// use gitpace_history::parser::MiningOptions;
///
/// let gateway = ReplayGateway::new()
///     .with(QueryKind::TrackedFiles, None, "deploy.sh\n")
///     .with(QueryKind::FileLog, Some("deploy.sh"), "h2|200|bob\nh1|100|alice\n");
///
/// let inventory = build_inventory(
///     &gateway,
///     Path::new("/nonexistent"),
///     &MiningOptions::default(),
///     &FileHourModel::default(),
/// );
/// let record = &inventory.files[0];
/// assert_eq!(record.commit_count, 2);
/// assert_eq!(record.first_commit.as_deref(), Some("h1"));
/// assert_eq!(record.size_bytes, 0);
/// ```
pub fn build_inventory(
    gateway: &dyn HistoryQuery,
    root: &Path,
    options: &MiningOptions,
    hour_model: &FileHourModel,
) -> Inventory {
    let listing = gateway.tracked_files();
    let mut failures: Vec<QueryFailure> = listing.failure().cloned().into_iter().collect();
    let paths = enumerate_paths(listing.text(), &options.exclude);

    let built = map_bounded(paths, options.workers, |path| {
        let mut record = FileRecord::empty(&path);
        record.category = hour_model.categorize(&record.extension);

        let full = root.join(&path);
        if let Ok(meta) = std::fs::metadata(&full) {
            if meta.is_file() {
                record.size_bytes = meta.len();
                record.lines = count_lines(&full);
            }
        }

        let log = gateway.file_log(&path);
        apply_file_history(&mut record, &parse_file_log(log.text()));
        (record, log.failure().cloned())
    });

    let mut files = Vec::with_capacity(built.len());
    for (record, failure) in built {
        files.push(record);
        failures.extend(failure);
    }

    Inventory { files, failures }
}
