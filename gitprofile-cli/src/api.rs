use clap::Command;
use gitprofile_core::{
    aggregate, Context, ExploreError, GithubClient, LikeOutcome, MemoryStore, ProfileStore, Result,
};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Deserialize)]
struct RecommendedQuery {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LikeQuery {
    liker: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let _matches = Command::new("gitprofile-api")
        .version("0.1.0")
        .about("GitProfile HTTP API server")
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    info!("Starting GitProfile API server...");

    let client = GithubClient::new(&ctx)?;
    let store: Arc<dyn ProfileStore> = Arc::new(MemoryStore::new());

    let addr: SocketAddr = ctx.api_bind_addr().parse()?;
    info!("API server binding to: {}", addr);
    info!("Endpoints:");
    info!("  GET  /api/v1/health - Health check");
    info!("  GET  /api/v1/analysis/:username - Aggregated activity statistics");
    info!("  GET  /api/v1/profile/:username - Profile and repository listing");
    info!("  GET  /api/v1/popular/:language - Popular repositories by language");
    info!("  GET  /api/v1/recommended?username= - Starred repositories feed");
    info!("  POST /api/v1/likes/:username?liker= - Like a profile");
    info!("  GET  /api/v1/likes/:username - List profile likers");

    warp::serve(routes(client, store)).run(addr).await;

    Ok(())
}

/// Full filter tree for the API server
fn routes(
    client: GithubClient,
    store: Arc<dyn ProfileStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("api" / "v1" / "health").and(warp::get()).map(|| {
        json_reply(
            &json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now(),
            }),
            StatusCode::OK,
        )
    });

    let analysis = warp::path!("api" / "v1" / "analysis" / String)
        .and(warp::get())
        .and(with_client(client.clone()))
        .and_then(analysis_handler);

    let profile = warp::path!("api" / "v1" / "profile" / String)
        .and(warp::get())
        .and(with_client(client.clone()))
        .and_then(profile_handler);

    let popular = warp::path!("api" / "v1" / "popular" / String)
        .and(warp::get())
        .and(with_client(client.clone()))
        .and_then(popular_handler);

    let recommended = warp::path!("api" / "v1" / "recommended")
        .and(warp::get())
        .and(warp::query::<RecommendedQuery>())
        .and(with_client(client))
        .and_then(recommended_handler);

    let like = warp::path!("api" / "v1" / "likes" / String)
        .and(warp::post())
        .and(warp::query::<LikeQuery>())
        .and(with_store(store.clone()))
        .and_then(like_handler);

    let likers = warp::path!("api" / "v1" / "likes" / String)
        .and(warp::get())
        .and(with_store(store))
        .and_then(likers_handler);

    health
        .or(analysis)
        .or(profile)
        .or(popular)
        .or(recommended)
        .or(like)
        .or(likers)
}

fn with_client(
    client: GithubClient,
) -> impl Filter<Extract = (GithubClient,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

fn with_store(
    store: Arc<dyn ProfileStore>,
) -> impl Filter<Extract = (Arc<dyn ProfileStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

async fn analysis_handler(
    username: String,
    client: GithubClient,
) -> std::result::Result<impl Reply, Infallible> {
    match aggregate(&client, &username).await {
        Ok(result) => Ok(json_reply(&result, StatusCode::OK)),
        Err(err) => {
            error!("Analysis for '{}' failed: {}", username, err);
            Ok(error_reply(&err))
        }
    }
}

async fn profile_handler(
    username: String,
    client: GithubClient,
) -> std::result::Result<impl Reply, Infallible> {
    let fetched = futures::try_join!(client.fetch_user(&username), client.fetch_repos(&username));
    match fetched {
        Ok((user, repos)) => Ok(json_reply(
            &json!({"user": user, "repos": repos}),
            StatusCode::OK,
        )),
        Err(err) => {
            error!("Profile fetch for '{}' failed: {}", username, err);
            Ok(error_reply(&err))
        }
    }
}

async fn popular_handler(
    language: String,
    client: GithubClient,
) -> std::result::Result<impl Reply, Infallible> {
    match client.popular_repos(&language).await {
        Ok(repos) => Ok(json_reply(&json!({"repos": repos}), StatusCode::OK)),
        Err(err) => {
            error!("Popular repos for '{}' failed: {}", language, err);
            Ok(error_reply(&err))
        }
    }
}

async fn recommended_handler(
    query: RecommendedQuery,
    client: GithubClient,
) -> std::result::Result<impl Reply, Infallible> {
    let username = match query.username.as_deref().map(str::trim) {
        Some(username) if !username.is_empty() => username.to_string(),
        _ => {
            let err = ExploreError::InvalidInput("GitHub username is required".to_string());
            return Ok(error_reply(&err));
        }
    };
    match client.starred_repos(&username).await {
        Ok(repos) => Ok(json_reply(&json!({"repos": repos}), StatusCode::OK)),
        Err(err) => {
            error!("Recommended repos for '{}' failed: {}", username, err);
            Ok(error_reply(&err))
        }
    }
}

async fn like_handler(
    username: String,
    query: LikeQuery,
    store: Arc<dyn ProfileStore>,
) -> std::result::Result<impl Reply, Infallible> {
    let liker = query.liker.unwrap_or_default();
    match store.like(&liker, &username) {
        Ok(outcome) => Ok(json_reply(
            &json!({
                "liked": username,
                "alreadyLiked": outcome == LikeOutcome::AlreadyLiked,
                "likeCount": store.liked_by_count(&username),
            }),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn likers_handler(
    username: String,
    store: Arc<dyn ProfileStore>,
) -> std::result::Result<impl Reply, Infallible> {
    let likers = store.likes_received(&username);
    Ok(json_reply(
        &json!({"username": username, "likers": likers}),
        StatusCode::OK,
    ))
}

fn json_reply<T: serde::Serialize>(
    body: &T,
    status: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

/// Map an error to its HTTP status and a `{"error": ...}` body. Every
/// failure surfaces to the caller; nothing is logged-and-swallowed.
fn error_reply(err: &ExploreError) -> warp::reply::WithStatus<warp::reply::Json> {
    json_reply(&json!({"error": err.to_string()}), error_status(err))
}

fn error_status(err: &ExploreError) -> StatusCode {
    match err {
        ExploreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ExploreError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ExploreError::MalformedData(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let client = GithubClient::new(&Context::default()).unwrap();
        let store: Arc<dyn ProfileStore> = Arc::new(MemoryStore::new());
        routes(client, store)
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        assert_eq!(
            error_status(&ExploreError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&ExploreError::UpstreamUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_status(&ExploreError::MalformedData("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&ExploreError::Generic("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn health_endpoint_replies_ok() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/health")
            .reply(&test_routes())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn likes_round_trip_through_the_api() {
        let filter = test_routes();

        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/likes/bob?liker=alice")
            .reply(&filter)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["alreadyLiked"], false);
        assert_eq!(body["likeCount"], 1);

        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/likes/bob")
            .reply(&filter)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["likers"], serde_json::json!(["alice"]));
    }

    #[tokio::test]
    async fn like_without_liker_is_rejected() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/likes/bob")
            .reply(&test_routes())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recommended_without_username_is_rejected() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/v1/recommended")
            .reply(&test_routes())
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
