//! Summary statistics over a window of recent commits.
//!
//! Everything here is a pure function of the commit records handed in.

pub mod activity;
pub mod churn;

pub use activity::{CommitActivity, Contributor, PeakHour, commit_activity};
pub use churn::{ChurnEntry, CodeChurn, code_churn};

/// Number of contributors kept in a ranking.
pub const TOP_CONTRIBUTORS: usize = 10;

/// Number of per-commit entries kept in a churn timeline.
pub const CHURN_TIMELINE_LEN: usize = 10;
