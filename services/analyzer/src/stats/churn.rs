//! Lines added and removed across recent commits.

use serde::Serialize;

use super::CHURN_TIMELINE_LEN;
use crate::config::UtcOffset;
use crate::source::CommitRecord;

const MESSAGE_SUMMARY_CHARS: usize = 50;

/// Line changes made by a single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChurnEntry {
    /// Commit SHA
    pub sha: String,
    /// Local date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Local time, `HH:MM:SS`
    pub time: Option<String>,
    /// First line of the message, at most 50 characters
    pub message: String,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Lines added plus lines deleted
    pub total_changes: u64,
}

/// Code churn over a window of recent commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeChurn {
    /// Commits examined
    pub commits_analyzed: usize,
    /// Lines added across the window
    pub total_additions: u64,
    /// Lines deleted across the window
    pub total_deletions: u64,
    /// Additions minus deletions
    pub net_change: i64,
    /// Mean lines added per commit, to two decimals
    pub avg_additions_per_commit: f64,
    /// Mean lines deleted per commit, to two decimals
    pub avg_deletions_per_commit: f64,
    /// The most recent commits, newest first
    pub timeline: Vec<ChurnEntry>,
}

fn summarize_message(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(MESSAGE_SUMMARY_CHARS)
        .collect()
}

fn average(total: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = total as f64 / count as f64;
    (mean * 100.0).round() / 100.0
}

fn churn_entry(commit: &CommitRecord, offset: UtcOffset) -> ChurnEntry {
    let local = commit
        .author_timestamp
        .map(|timestamp| timestamp.with_timezone(&offset.fixed()));

    ChurnEntry {
        sha: commit.sha.clone(),
        date: local.map(|t| t.format("%Y-%m-%d").to_string()),
        time: local.map(|t| t.format("%H:%M:%S").to_string()),
        message: summarize_message(&commit.message),
        additions: commit.additions,
        deletions: commit.deletions,
        total_changes: commit.additions + commit.deletions,
    }
}

/// Summarize lines added and removed.
///
/// Totals and averages cover every commit given; the timeline keeps the
/// first ten, which are the newest when commits arrive newest first.
pub fn code_churn(commits: &[CommitRecord], offset: UtcOffset) -> CodeChurn {
    let total_additions: u64 = commits.iter().map(|c| c.additions).sum();
    let total_deletions: u64 = commits.iter().map(|c| c.deletions).sum();

    CodeChurn {
        commits_analyzed: commits.len(),
        total_additions,
        total_deletions,
        net_change: total_additions as i64 - total_deletions as i64,
        avg_additions_per_commit: average(total_additions, commits.len()),
        avg_deletions_per_commit: average(total_deletions, commits.len()),
        timeline: commits
            .iter()
            .take(CHURN_TIMELINE_LEN)
            .map(|commit| churn_entry(commit, offset))
            .collect(),
    }
}
