use clap::Command;
use gitprofile_core::{Context, GithubClient, Result};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let _matches = Command::new("gitprofile-health")
        .version("0.1.0")
        .about("Health check for the GitProfile upstream API")
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    info!("Starting GitProfile health check...");

    if ctx.github_token.is_empty() {
        info!("No GitHub token configured, checking the unauthenticated quota");
    }

    let client = GithubClient::new(&ctx)?;

    info!("Testing GitHub API connectivity...");
    match client.rate_limit().await {
        Ok(rate) => {
            info!(
                "✓ GitHub API reachable: {}/{} points remaining, resets at {}",
                rate.remaining,
                rate.limit,
                rate.reset.format("%Y-%m-%d %H:%M:%S UTC")
            );
            if rate.remaining == 0 {
                error!("✗ Rate limit exhausted, aggregations will fail until reset");
                std::process::exit(1);
            }
        }
        Err(err) => {
            error!("✗ GitHub API unreachable: {}", err);
            std::process::exit(1);
        }
    }

    info!("Health check passed");

    Ok(())
}
