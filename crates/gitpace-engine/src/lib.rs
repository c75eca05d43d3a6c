//! Analysis orchestration for gitpace.
//!
//! [`AnalysisRun`] threads a history gateway and configuration through
//! mining, inventory, aggregation, session segmentation and estimation, and
//! returns a single [`AnalysisDocument`].

pub mod document;
pub mod run;

pub use document::{AnalysisDocument, Diagnostics, RunSettings};
pub use run::{AnalysisRun, Stage};
