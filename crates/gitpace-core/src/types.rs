use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One commit from the project history, with its change statistics.
///
/// # Examples
///
/// ```
/// use gitpace_core::{ChangeStats, CommitRecord};
///
/// let commit = CommitRecord {
///     hash: "9fceb02".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1_700_000_000,
///     message: "feat: add parser".into(),
///     stats: ChangeStats::default(),
/// };
/// assert_eq!(commit.stats.files_changed, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Commit time in epoch seconds.
    pub timestamp: i64,
    /// Subject line.
    pub message: String,
    /// Change statistics for this commit.
    pub stats: ChangeStats,
}

/// Insertions and deletions for one commit.
///
/// `files_changed` comes from the summary line; `files` from the per-file
/// listing. The two normally agree but the listing may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStats {
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub files: Vec<FileDelta>,
}

/// Per-file line delta within one commit. Binary files count zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDelta {
    pub path: String,
    pub insertions: u64,
    pub deletions: u64,
}

/// Coarse effort class of a file, used by the file-based hour model.
///
/// # Examples
///
/// ```
/// use gitpace_core::FileCategory;
///
/// assert_eq!(FileCategory::Configuration.to_string(), "configuration");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Source scripts (by default `.sh`, `.py`, `.js`, `.ts`).
    Script,
    /// Configuration and prose (by default `.json`, `.yml`, `.yaml`, `.md`).
    Configuration,
    /// Everything else.
    #[default]
    Other,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCategory::Script => write!(f, "script"),
            FileCategory::Configuration => write!(f, "configuration"),
            FileCategory::Other => write!(f, "other"),
        }
    }
}

/// A tracked file at the current snapshot, with its authorship history.
///
/// # Examples
///
/// ```
/// use gitpace_core::{FileCategory, FileRecord};
///
/// let record = FileRecord::empty("docs/guide.md");
/// assert_eq!(record.extension, "md");
/// assert_eq!(record.language, "Markdown");
/// assert_eq!(record.commit_count, 0);
/// assert!(record.first_commit.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Path relative to the repository root.
    pub path: String,
    /// On-disk size in bytes (0 if missing).
    pub size_bytes: u64,
    /// Line count (0 for binary or unreadable files).
    pub lines: u64,
    /// Lowercase extension without the dot; empty if none.
    pub extension: String,
    /// Language tag derived from the extension.
    pub language: String,
    /// Effort class for the file-based estimate.
    pub category: FileCategory,
    /// Oldest commit touching this file.
    pub first_commit: Option<String>,
    /// Newest commit touching this file.
    pub last_commit: Option<String>,
    /// Timestamp of the oldest touching commit.
    pub first_seen: Option<i64>,
    /// Timestamp of the newest touching commit.
    pub last_seen: Option<i64>,
    /// Number of commits touching this file.
    pub commit_count: u64,
    /// Distinct author names, sorted.
    pub authors: BTreeSet<String>,
}

impl FileRecord {
    /// A zero-valued record for `path`, with extension and language filled in.
    pub fn empty(path: &str) -> Self {
        let extension = extension_of(path);
        Self {
            path: path.to_string(),
            size_bytes: 0,
            lines: 0,
            language: language_tag(&extension).to_string(),
            extension,
            category: FileCategory::Other,
            first_commit: None,
            last_commit: None,
            first_seen: None,
            last_seen: None,
            commit_count: 0,
            authors: BTreeSet::new(),
        }
    }
}

/// A maximal run of commits separated by no more than the idle gap.
///
/// # Examples
///
/// ```
/// use gitpace_core::Session;
///
/// let session = Session { start: 1000, end: 4600, commits: 3 };
/// assert_eq!(session.duration_secs(), 3600);
/// assert_eq!(session.duration_hours(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Timestamp of the first commit.
    pub start: i64,
    /// Timestamp of the last commit (`end >= start`).
    pub end: i64,
    /// Number of commits in the session.
    pub commits: u64,
}

impl Session {
    /// Saturates at `i64::MAX` for sessions spanning the whole `i64` range.
    pub fn duration_secs(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_secs() as f64 / 3600.0
    }
}

/// Lowercase extension of `path` without the dot.
///
/// Dotfiles such as `.gitignore` have no extension.
///
/// # Examples
///
/// ```
/// use gitpace_core::extension_of;
///
/// assert_eq!(extension_of("src/Main.RS"), "rs");
/// assert_eq!(extension_of("Makefile"), "");
/// assert_eq!(extension_of(".gitignore"), "");
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// ```
pub fn extension_of(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Language tag for an extension (without the dot). Unknown → `"Other"`.
///
/// # Examples
///
/// ```
/// use gitpace_core::language_tag;
///
/// assert_eq!(language_tag("rs"), "Rust");
/// assert_eq!(language_tag("yml"), "YAML");
/// assert_eq!(language_tag("xyz"), "Other");
/// assert_eq!(language_tag(""), "Other");
/// ```
pub fn language_tag(extension: &str) -> &'static str {
    match extension {
        "rs" => "Rust",
        "py" => "Python",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "sh" | "bash" | "zsh" => "Shell",
        "go" => "Go",
        "java" => "Java",
        "kt" | "kts" => "Kotlin",
        "swift" => "Swift",
        "c" | "h" => "C",
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => "C++",
        "cs" => "C#",
        "rb" => "Ruby",
        "php" => "PHP",
        "html" | "htm" => "HTML",
        "css" | "scss" | "sass" => "CSS",
        "json" => "JSON",
        "yml" | "yaml" => "YAML",
        "toml" => "TOML",
        "xml" => "XML",
        "sql" => "SQL",
        "md" | "markdown" => "Markdown",
        "txt" => "Text",
        _ => "Other",
    }
}

/// Output format for the command-line surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain key/value summary.
    #[default]
    Text,
    /// The full exported document, camelCase JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
