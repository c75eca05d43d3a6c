//! Pure analytics over mined history.
//!
//! - [`aggregate`] reduces commit and file records to repository statistics
//! - [`sessions`] splits commits into work sessions by idle gap
//! - [`timeline`] buckets commits by hour of day and calendar day
//! - [`estimate`] turns statistics into human-effort scenarios
//!
//! Nothing here performs I/O.

pub mod aggregate;
pub mod estimate;
pub mod sessions;
pub mod timeline;

pub use aggregate::{aggregate, AggregateStatistics};
pub use estimate::{estimate_effort, EffortEstimate};
pub use sessions::{segment_sessions, SessionSummary};
pub use timeline::{build_timeline, ActivityTimeline};
