//! Activity aggregation pipeline
//!
//! Reduces a user's repositories and recent public events into cumulative
//! totals and month-bucketed time series for four metrics: stars, commits,
//! pull requests and issues. The reduction is a pure single-pass fold; the
//! only side effects of an aggregation are the two upstream fetches.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants;
use crate::error::{ExploreError, Result};
use crate::github::{Event, GithubClient, RepoSummary};

/// One month bucket of a time series, `month` is "YYYY-MM" (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub month: String,
    pub value: u64,
}

/// Aggregated activity statistics for one profile. Immutable once
/// produced; each total equals the sum of its per-month series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_stars: u64,
    pub total_commits: u64,
    pub total_pull_requests: u64,
    pub total_issues: u64,
    pub stars_per_month: Vec<MonthPoint>,
    pub commits_per_month: Vec<MonthPoint>,
    pub prs_per_month: Vec<MonthPoint>,
    pub issues_per_month: Vec<MonthPoint>,
}

/// Calendar month key for a timestamp, truncated in UTC
pub fn month_key(ts: &DateTime<Utc>) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}

/// Pure reduction of (repositories, events) into an `AggregateResult`.
///
/// Stars are bucketed by each repository's update timestamp. Push events
/// contribute their commit count, pull request events count 1 each, and
/// issue events count 1 each unless the issue is actually a pull request
/// riding the issues feed. Every other event kind is ignored. Months with
/// no contribution are omitted rather than zero-filled.
pub fn reduce(repos: &[RepoSummary], events: &[Event]) -> AggregateResult {
    let mut total_stars = 0u64;
    let mut total_commits = 0u64;
    let mut total_pull_requests = 0u64;
    let mut total_issues = 0u64;

    let mut stars: BTreeMap<String, u64> = BTreeMap::new();
    let mut commits: BTreeMap<String, u64> = BTreeMap::new();
    let mut prs: BTreeMap<String, u64> = BTreeMap::new();
    let mut issues: BTreeMap<String, u64> = BTreeMap::new();

    for repo in repos {
        total_stars += repo.stargazers_count;
        if repo.stargazers_count > 0 {
            *stars.entry(month_key(&repo.updated_at)).or_insert(0) += repo.stargazers_count;
        }
    }

    for event in events {
        let month = month_key(&event.created_at);
        match event.event_type.as_str() {
            constants::PUSH_EVENT => {
                let count = event.commit_count();
                total_commits += count;
                if count > 0 {
                    *commits.entry(month).or_insert(0) += count;
                }
            }
            constants::PULL_REQUEST_EVENT => {
                total_pull_requests += 1;
                *prs.entry(month).or_insert(0) += 1;
            }
            constants::ISSUES_EVENT if !event.is_pull_request_issue() => {
                total_issues += 1;
                *issues.entry(month).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    AggregateResult {
        total_stars,
        total_commits,
        total_pull_requests,
        total_issues,
        stars_per_month: to_series(stars),
        commits_per_month: to_series(commits),
        prs_per_month: to_series(prs),
        issues_per_month: to_series(issues),
    }
}

// BTreeMap iteration order gives the ascending-by-month ordering the
// chart consumers require
fn to_series(buckets: BTreeMap<String, u64>) -> Vec<MonthPoint> {
    buckets
        .into_iter()
        .map(|(month, value)| MonthPoint { month, value })
        .collect()
}

/// Aggregate activity statistics for `username`.
///
/// Rejects an empty username before any fetch, issues the repository and
/// event fetches concurrently (they have no ordering dependency), then
/// runs the pure reduction. All-or-nothing: any fetch error aborts the
/// aggregation with no partial result.
pub async fn aggregate(client: &GithubClient, username: &str) -> Result<AggregateResult> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ExploreError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }

    let (repos, events) = futures::try_join!(
        client.fetch_repos(username),
        client.fetch_events(username)
    )?;
    debug!(
        "aggregating {} repos and {} events for {}",
        repos.len(),
        events.len(),
        username
    );

    Ok(reduce(&repos, &events))
}
