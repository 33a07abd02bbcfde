// Constants used throughout the GitProfile system

// Upstream API defaults
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const USER_AGENT: &str = "gitprofile/0.1";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

// Fetch caps. Both listing endpoints are fetched as a single page, which
// matches the upstream per_page maximum of 100. The public events feed
// itself never serves more than the ~300 most recent items.
pub const DEFAULT_REPOS_PER_PAGE: u32 = 100;
pub const DEFAULT_EVENTS_PER_PAGE: u32 = 100;
pub const DEFAULT_POPULAR_PER_PAGE: u32 = 10;

// Event kinds that contribute to the aggregation
pub const PUSH_EVENT: &str = "PushEvent";
pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";
pub const ISSUES_EVENT: &str = "IssuesEvent";

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 4000;
