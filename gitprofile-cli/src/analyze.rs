use clap::{Arg, Command};
use gitprofile_core::{aggregate, Context, GithubClient, Result};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let matches = Command::new("gitprofile-analyze")
        .version("0.1.0")
        .about("Aggregate GitHub activity statistics for a profile")
        .arg(
            Arg::new("username")
                .help("GitHub username to analyze")
                .required(true),
        )
        .get_matches();

    let username = matches
        .get_one::<String>("username")
        .expect("username is required");

    let start_time = std::time::Instant::now();

    // Initialize context from environment
    let ctx = Context::from_env()?;

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    if ctx.github_token.is_empty() {
        info!("No GitHub token configured, requests count against the unauthenticated quota");
    }

    let client = GithubClient::new(&ctx)?;

    let result = match aggregate(&client, username).await {
        Ok(result) => result,
        Err(err) => {
            error!("Failed to aggregate activity for '{}': {}", username, err);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    let elapsed = start_time.elapsed();
    info!("Aggregation for '{}' completed in {:?}", username, elapsed);
    info!("Statistics:");
    info!("  Stars: {}", result.total_stars);
    info!("  Commits: {}", result.total_commits);
    info!("  Pull requests: {}", result.total_pull_requests);
    info!("  Issues: {}", result.total_issues);

    Ok(())
}
