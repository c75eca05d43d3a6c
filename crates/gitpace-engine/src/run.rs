use std::fmt;
use std::path::PathBuf;

use chrono::Utc;
use gitpace_core::GitpaceConfig;
use gitpace_effort::{aggregate, build_timeline, estimate_effort, segment_sessions, SessionSummary};
use gitpace_history::gateway::HistoryQuery;
use gitpace_history::inventory::build_inventory;
use gitpace_history::parser::{mine_commits, MiningOptions};

use crate::document::{AnalysisDocument, Diagnostics, RunSettings};

/// Phase of an analysis run, reported to the progress callback on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MiningCommits,
    BuildingInventory,
    Aggregating,
    SegmentingSessions,
    Estimating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::MiningCommits => "mining commits",
            Stage::BuildingInventory => "building file inventory",
            Stage::Aggregating => "aggregating statistics",
            Stage::SegmentingSessions => "segmenting work sessions",
            Stage::Estimating => "estimating effort",
        };
        f.write_str(label)
    }
}

/// One analysis of one repository.
///
/// Holds the history gateway, the snapshot root used for on-disk file
/// measurements, and the configuration. Every record produced belongs to the
/// returned [`AnalysisDocument`].
///
/// # Examples
///
/// ```
/// use gitpace_core::GitpaceConfig;
/// use gitpace_engine::AnalysisRun;
/// use gitpace_history::gateway::{QueryKind, ReplayGateway};
///
/// let gateway = ReplayGateway::new()
///     .with(QueryKind::CommitLog, None, "h1|alice|alice@example.com|1700000000|init\n")
///     .with(QueryKind::CommitSummary, Some("h1"), " 1 file changed, 40 insertions(+)\n");
/// let config = GitpaceConfig::default();
///
/// let document = AnalysisRun::new(&gateway, "/nonexistent", &config).execute();
/// assert_eq!(document.statistics.totals.commits, 1);
/// assert_eq!(document.sessions.len(), 1);
/// assert_eq!(document.estimate.actual.days, 0.5);
/// ```
pub struct AnalysisRun<'a> {
    gateway: &'a dyn HistoryQuery,
    root: PathBuf,
    config: &'a GitpaceConfig,
    progress: Option<&'a dyn Fn(Stage)>,
}

impl<'a> AnalysisRun<'a> {
    pub fn new(
        gateway: &'a dyn HistoryQuery,
        root: impl Into<PathBuf>,
        config: &'a GitpaceConfig,
    ) -> Self {
        Self {
            gateway,
            root: root.into(),
            config,
            progress: None,
        }
    }

    /// Report each [`Stage`] to `callback` as the run enters it.
    #[must_use]
    pub fn with_progress(mut self, callback: &'a dyn Fn(Stage)) -> Self {
        self.progress = Some(callback);
        self
    }

    fn report(&self, stage: Stage) {
        if let Some(callback) = self.progress {
            callback(stage);
        }
    }

    /// Run every stage and assemble the document.
    ///
    /// Never fails: query failures are collected into the document's
    /// diagnostics and an empty history yields zero-valued statistics.
    pub fn execute(self) -> AnalysisDocument {
        let options = MiningOptions::from_config(&self.config.history);

        self.report(Stage::MiningCommits);
        let mined = mine_commits(self.gateway, &options);

        self.report(Stage::BuildingInventory);
        let inventory = build_inventory(
            self.gateway,
            &self.root,
            &options,
            &self.config.estimation.file_hours,
        );

        self.report(Stage::Aggregating);
        let statistics = aggregate(&inventory.files, &mined.commits);
        let timeline = build_timeline(&mined.commits);

        self.report(Stage::SegmentingSessions);
        let sessions = segment_sessions(&mined.commits, self.config.sessions.idle_gap_secs);
        let session_summary = SessionSummary::from_sessions(&sessions);

        self.report(Stage::Estimating);
        let estimate = estimate_effort(&statistics, &sessions, &self.config.estimation);

        let mut failures = mined.failures;
        failures.extend(inventory.failures);

        AnalysisDocument {
            generated_at: Utc::now(),
            repository: self.root.display().to_string(),
            settings: RunSettings::from_config(self.config),
            statistics,
            estimate,
            sessions,
            session_summary,
            timeline,
            commits: mined.commits,
            files: inventory.files,
            diagnostics: Diagnostics::new(failures),
        }
    }
}
