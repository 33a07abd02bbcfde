use serde::{Deserialize, Serialize};

use crate::constants;

/// Environment context packed in structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    // From GITPROFILE_GITHUB_TOKEN (falls back to GITHUB_TOKEN), default ""
    // Bearer credential for upstream GitHub API calls. The token is only
    // ever handed to the client explicitly, fetch logic never reads the
    // environment itself.
    pub github_token: String,

    // From GITPROFILE_API_BASE, default "https://api.github.com"
    pub api_base: String,

    // From GITPROFILE_REPOS_PER_PAGE, default 100
    // Repository fetch cap, a single page at the upstream per_page maximum
    pub repos_per_page: u32,

    // From GITPROFILE_EVENTS_PER_PAGE, default 100
    // Public events fetch cap, a single page; the feed itself is bounded
    // at roughly the 300 most recent items
    pub events_per_page: u32,

    // From GITPROFILE_POPULAR_PER_PAGE, default 10
    // Page size for the popular-repositories language search
    pub popular_per_page: u32,

    // From GITPROFILE_HTTP_TIMEOUT, default 30 seconds
    pub http_timeout_secs: u64,

    // From GITPROFILE_API_HOST, default "127.0.0.1"
    pub api_host: String,

    // From GITPROFILE_API_PORT, default 4000
    pub api_port: u16,

    // From GITPROFILE_DEBUG Debug level: 0-no, 1-info, 2-verbose, default 0
    pub debug: i32,

    // From GITPROFILE_CTXOUT output all context data (this struct), default false
    pub ctx_out: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            github_token: String::new(),
            api_base: constants::DEFAULT_API_BASE.to_string(),
            repos_per_page: constants::DEFAULT_REPOS_PER_PAGE,
            events_per_page: constants::DEFAULT_EVENTS_PER_PAGE,
            popular_per_page: constants::DEFAULT_POPULAR_PER_PAGE,
            http_timeout_secs: constants::DEFAULT_HTTP_TIMEOUT_SECS,
            api_host: constants::DEFAULT_API_HOST.to_string(),
            api_port: constants::DEFAULT_API_PORT,
            debug: 0,
            ctx_out: false,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load context from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut ctx = Self::default();

        if let Ok(token) = std::env::var("GITPROFILE_GITHUB_TOKEN") {
            ctx.github_token = token;
        } else if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            ctx.github_token = token;
        }

        if let Ok(api_base) = std::env::var("GITPROFILE_API_BASE") {
            ctx.api_base = api_base.trim_end_matches('/').to_string();
        }

        if let Ok(per_page) = std::env::var("GITPROFILE_REPOS_PER_PAGE") {
            ctx.repos_per_page = per_page.parse().unwrap_or(constants::DEFAULT_REPOS_PER_PAGE);
        }

        if let Ok(per_page) = std::env::var("GITPROFILE_EVENTS_PER_PAGE") {
            ctx.events_per_page = per_page.parse().unwrap_or(constants::DEFAULT_EVENTS_PER_PAGE);
        }

        if let Ok(per_page) = std::env::var("GITPROFILE_POPULAR_PER_PAGE") {
            ctx.popular_per_page = per_page.parse().unwrap_or(constants::DEFAULT_POPULAR_PER_PAGE);
        }

        if let Ok(timeout) = std::env::var("GITPROFILE_HTTP_TIMEOUT") {
            ctx.http_timeout_secs = timeout.parse().unwrap_or(constants::DEFAULT_HTTP_TIMEOUT_SECS);
        }

        if let Ok(host) = std::env::var("GITPROFILE_API_HOST") {
            ctx.api_host = host;
        }

        if let Ok(port) = std::env::var("GITPROFILE_API_PORT") {
            ctx.api_port = port.parse().unwrap_or(constants::DEFAULT_API_PORT);
        }

        if let Ok(debug) = std::env::var("GITPROFILE_DEBUG") {
            ctx.debug = debug.parse().unwrap_or(0);
        }

        ctx.ctx_out = std::env::var("GITPROFILE_CTXOUT").is_ok();

        Ok(ctx)
    }

    /// Socket address string for the API server
    pub fn api_bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_matches_constants() {
        let ctx = Context::default();
        assert_eq!(ctx.api_base, "https://api.github.com");
        assert_eq!(ctx.repos_per_page, 100);
        assert_eq!(ctx.events_per_page, 100);
        assert_eq!(ctx.popular_per_page, 10);
        assert_eq!(ctx.http_timeout_secs, 30);
        assert!(ctx.github_token.is_empty());
        assert_eq!(ctx.api_bind_addr(), "127.0.0.1:4000");
    }
}
