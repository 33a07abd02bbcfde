//! GitProfile Core Library
//!
//! This library contains the core functionality for GitProfile, a GitHub
//! profile activity explorer. It provides the configuration context, the
//! GitHub REST client, the activity aggregation pipeline and the profile
//! store interface used by all GitProfile tools.

pub mod constants;
pub mod context;
pub mod error;
pub mod github;
pub mod stats;
pub mod store;

// Re-export commonly used items
pub use context::Context;
pub use error::{ExploreError, Result};
pub use github::GithubClient;
pub use stats::{aggregate, reduce, AggregateResult, MonthPoint};
pub use store::{LikeOutcome, MemoryStore, ProfileStore};
