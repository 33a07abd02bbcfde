//! GitHub REST API wire types and client
//!
//! This module contains the types describing the slices of the GitHub v3
//! REST API that GitProfile consumes, and the client that fetches them.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::constants;
use crate::context::Context;
use crate::error::{ExploreError, Result};

/// Repository summary as returned by the repository listing and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub stargazers_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub forks_count: u64,
}

/// Public activity event from the user events feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payload: EventPayload,
}

/// Event payload, only the fields the aggregation cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub commits: Option<Vec<EventCommit>>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub issue: Option<EventIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCommit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
}

/// Issue attached to an IssuesEvent. Pull requests ride the issues feed
/// too; they carry a `pull_request` marker object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventIssue {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl Event {
    /// Number of commits carried by a push event. The commits array is
    /// authoritative; the payload `size` field covers pushes where the
    /// array was elided.
    pub fn commit_count(&self) -> u64 {
        match &self.payload.commits {
            Some(commits) => commits.len() as u64,
            None => self.payload.size.unwrap_or(0),
        }
    }

    /// True when an IssuesEvent is actually about a pull request
    pub fn is_pull_request_issue(&self) -> bool {
        self.payload
            .issue
            .as_ref()
            .map(|issue| issue.pull_request.is_some())
            .unwrap_or(false)
    }
}

/// User profile as returned by the users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
}

/// Remaining API quota from the rate_limit endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}

/// Authenticated GitHub REST client. All fetch state (token, base URL,
/// page caps) is injected through the `Context` at construction time.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    repos_per_page: u32,
    events_per_page: u32,
    popular_per_page: u32,
}

impl GithubClient {
    pub fn new(ctx: &Context) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !ctx.github_token.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", ctx.github_token))?,
            );
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(constants::GITHUB_ACCEPT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(ctx.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: ctx.api_base.trim_end_matches('/').to_string(),
            repos_per_page: ctx.repos_per_page,
            events_per_page: ctx.events_per_page,
            popular_per_page: ctx.popular_per_page,
        })
    }

    /// Single GET returning the response body as JSON. 403/429 are
    /// surfaced as `UpstreamUnavailable`; no retries here, each call is
    /// independent and idempotent.
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if let Some(err) = status_error(status, url) {
            return Err(err);
        }
        Ok(resp.json().await?)
    }

    /// Fetch one page of the user's repositories, capped at
    /// `repos_per_page` (the upstream per_page maximum)
    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let url = format!(
            "{}/users/{}/repos?per_page={}",
            self.api_base, username, self.repos_per_page
        );
        let body = self.get_json(&url).await?;
        parse_array(body, "repository list")
    }

    /// Fetch one page of the user's recent public events, capped at
    /// `events_per_page`
    pub async fn fetch_events(&self, username: &str) -> Result<Vec<Event>> {
        let url = format!(
            "{}/users/{}/events?per_page={}",
            self.api_base, username, self.events_per_page
        );
        let body = self.get_json(&url).await?;
        parse_array(body, "event list")
    }

    /// Fetch the user's profile record
    pub async fn fetch_user(&self, username: &str) -> Result<UserProfile> {
        let url = format!("{}/users/{}", self.api_base, username);
        let body = self.get_json(&url).await?;
        serde_json::from_value(body).map_err(ExploreError::from)
    }

    /// Most-starred repositories for a language, `popular_per_page` items
    pub async fn popular_repos(&self, language: &str) -> Result<Vec<RepoSummary>> {
        let url = format!(
            "{}/search/repositories?q=language:{}&sort=stars&order=desc&per_page={}",
            self.api_base, language, self.popular_per_page
        );
        let body = self.get_json(&url).await?;
        let items = body
            .get("items")
            .cloned()
            .ok_or_else(|| {
                ExploreError::MalformedData("search response missing items field".to_string())
            })?;
        parse_array(items, "search results")
    }

    /// Repositories the user has starred, used as the recommendation feed
    pub async fn starred_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let url = format!(
            "{}/users/{}/starred?per_page={}",
            self.api_base, username, self.repos_per_page
        );
        let body = self.get_json(&url).await?;
        parse_array(body, "starred list")
    }

    /// Remaining API points and reset time
    pub async fn rate_limit(&self) -> Result<RateLimit> {
        let url = format!("{}/rate_limit", self.api_base);
        let body = self.get_json(&url).await?;
        let rate = body
            .get("rate")
            .ok_or_else(|| {
                ExploreError::MalformedData("rate_limit response missing rate field".to_string())
            })?;
        let limit = rate.get("limit").and_then(Value::as_u64).unwrap_or(0);
        let remaining = rate.get("remaining").and_then(Value::as_u64).unwrap_or(0);
        let reset_ts = rate.get("reset").and_then(Value::as_i64).unwrap_or(0);
        let reset = DateTime::from_timestamp(reset_ts, 0).unwrap_or_else(Utc::now);
        Ok(RateLimit {
            limit,
            remaining,
            reset,
        })
    }
}

/// Classify a non-success HTTP status. Rate limits and access denials
/// (403/429) are the transient retry-later condition from the error
/// taxonomy; other non-2xx statuses are generic upstream failures.
fn status_error(status: StatusCode, url: &str) -> Option<ExploreError> {
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Some(ExploreError::UpstreamUnavailable(format!(
            "GitHub returned HTTP {} for {}",
            status.as_u16(),
            url
        )));
    }
    if !status.is_success() {
        return Some(ExploreError::Generic(format!(
            "GitHub returned HTTP {} for {}",
            status.as_u16(),
            url
        )));
    }
    None
}

/// Deserialize a JSON array element-wise. GitHub reports errors as an
/// object with a `message` field where a list was expected; that shape
/// must surface as `MalformedData`, never be coerced.
fn parse_array<T: DeserializeOwned>(body: Value, what: &str) -> Result<Vec<T>> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ExploreError::from))
            .collect(),
        other => Err(ExploreError::MalformedData(format!(
            "expected {} as a JSON array, got {}",
            what,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_limit_status_maps_to_upstream_unavailable() {
        for code in [StatusCode::FORBIDDEN, StatusCode::TOO_MANY_REQUESTS] {
            match status_error(code, "https://api.github.com/users/x/events") {
                Some(ExploreError::UpstreamUnavailable(msg)) => {
                    assert!(msg.contains(&code.as_u16().to_string()));
                }
                other => panic!("expected UpstreamUnavailable, got {:?}", other),
            }
        }
    }

    #[test]
    fn server_error_status_maps_to_generic() {
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "https://api.github.com") {
            Some(ExploreError::Generic(msg)) => assert!(msg.contains("500")),
            other => panic!("expected Generic, got {:?}", other),
        }
    }

    #[test]
    fn success_status_is_not_an_error() {
        assert!(status_error(StatusCode::OK, "https://api.github.com").is_none());
    }

    #[test]
    fn error_object_instead_of_list_is_malformed() {
        let body = json!({"message": "API rate limit exceeded"});
        let result: Result<Vec<RepoSummary>> = parse_array(body, "repository list");
        match result {
            Err(ExploreError::MalformedData(msg)) => assert!(msg.contains("an object")),
            other => panic!("expected MalformedData, got {:?}", other),
        }
    }

    #[test]
    fn repo_list_parses_github_wire_shape() {
        let body = json!([{
            "name": "gitprofile",
            "stargazers_count": 7,
            "created_at": "2023-06-01T10:00:00Z",
            "updated_at": "2024-01-15T12:30:00Z",
            "language": "Rust",
            "html_url": "https://github.com/octocat/gitprofile",
            "description": null,
            "forks_count": 2,
            "fork": false
        }]);
        let repos: Vec<RepoSummary> = parse_array(body, "repository list").unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "gitprofile");
        assert_eq!(repos[0].stargazers_count, 7);
        assert_eq!(repos[0].language.as_deref(), Some("Rust"));
    }

    #[test]
    fn push_event_commit_count_prefers_commits_array() {
        let event: Event = serde_json::from_value(json!({
            "type": "PushEvent",
            "created_at": "2024-03-05T08:00:00Z",
            "payload": {
                "size": 9,
                "commits": [
                    {"sha": "a1", "message": "one"},
                    {"sha": "b2", "message": "two"}
                ]
            }
        }))
        .unwrap();
        assert_eq!(event.commit_count(), 2);
    }

    #[test]
    fn push_event_commit_count_falls_back_to_size() {
        let event: Event = serde_json::from_value(json!({
            "type": "PushEvent",
            "created_at": "2024-03-05T08:00:00Z",
            "payload": {"size": 4}
        }))
        .unwrap();
        assert_eq!(event.commit_count(), 4);
    }

    #[test]
    fn issues_event_detects_pull_request_marker() {
        let event: Event = serde_json::from_value(json!({
            "type": "IssuesEvent",
            "created_at": "2024-03-05T08:00:00Z",
            "payload": {
                "action": "opened",
                "issue": {"number": 12, "pull_request": {"url": "https://api.github.com/x"}}
            }
        }))
        .unwrap();
        assert!(event.is_pull_request_issue());

        let plain: Event = serde_json::from_value(json!({
            "type": "IssuesEvent",
            "created_at": "2024-03-05T08:00:00Z",
            "payload": {"action": "opened", "issue": {"number": 13}}
        }))
        .unwrap();
        assert!(!plain.is_pull_request_issue());
    }
}
