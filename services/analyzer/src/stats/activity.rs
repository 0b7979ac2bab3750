//! When commits happen and who makes them.

use std::collections::{BTreeMap, HashMap};

use chrono::Timelike as _;
use serde::Serialize;

use super::TOP_CONTRIBUTORS;
use crate::config::UtcOffset;
use crate::source::CommitRecord;

/// The hour of day with the most commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeakHour {
    /// Hour of day, 0-23, in the configured offset
    pub hour: u32,
    /// Commits made during that hour
    pub commits: u64,
}

/// An author and how many commits they made in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    /// Author display name
    pub name: String,
    /// Commit count
    pub commits: u64,
}

/// Commit timing and authorship over a window of recent commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitActivity {
    /// Size of the window that was asked for
    pub total_commits: usize,
    /// Commits actually examined, fewer than requested for short histories
    pub commits_analyzed: usize,
    /// Busiest hour
    pub peak_hour: PeakHour,
    /// Commit count for each hour which saw any commits
    pub hourly_distribution: BTreeMap<u32, u64>,
    /// Most active authors, busiest first
    pub top_contributors: Vec<Contributor>,
    /// Offset the hours are expressed in
    pub utc_offset: String,
}

/// Bucket commit times into local hours of the day.
///
/// Commits without a timestamp are skipped.
pub fn hourly_histogram(commits: &[CommitRecord], offset: UtcOffset) -> BTreeMap<u32, u64> {
    let tz = offset.fixed();
    let mut histogram = BTreeMap::new();
    for timestamp in commits.iter().filter_map(|c| c.author_timestamp) {
        *histogram.entry(timestamp.with_timezone(&tz).hour()).or_insert(0) += 1;
    }
    histogram
}

/// The busiest hour, with ties going to the earliest hour.
///
/// An empty histogram yields hour 0 with no commits.
pub fn peak_hour(histogram: &BTreeMap<u32, u64>) -> PeakHour {
    let mut peak = PeakHour::default();
    for (&hour, &commits) in histogram {
        if commits > peak.commits {
            peak = PeakHour { hour, commits };
        }
    }
    peak
}

/// Rank authors by commit count, keeping at most `limit`.
///
/// Authors with equal counts stay in the order they were first seen.
pub fn top_contributors(commits: &[CommitRecord], limit: usize) -> Vec<Contributor> {
    let mut ranking: Vec<Contributor> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for commit in commits {
        match index.get(commit.author_name.as_str()).copied() {
            Some(i) => ranking[i].commits += 1,
            None => {
                index.insert(&commit.author_name, ranking.len());
                ranking.push(Contributor {
                    name: commit.author_name.clone(),
                    commits: 1,
                });
            }
        }
    }

    ranking.sort_by(|a, b| b.commits.cmp(&a.commits));
    ranking.truncate(limit);
    ranking
}

/// Summarize commit timing and authorship.
///
/// `requested` is the window size the caller asked for and is reported as is.
pub fn commit_activity(
    commits: &[CommitRecord],
    requested: usize,
    offset: UtcOffset,
) -> CommitActivity {
    let hourly_distribution = hourly_histogram(commits, offset);

    CommitActivity {
        total_commits: requested,
        commits_analyzed: commits.len(),
        peak_hour: peak_hour(&hourly_distribution),
        hourly_distribution,
        top_contributors: top_contributors(commits, TOP_CONTRIBUTORS),
        utc_offset: offset.to_string(),
    }
}
