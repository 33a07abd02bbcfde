//! Profile store collaborator interface
//!
//! Persistence of user records and likes is an external collaborator of
//! this system: a key-value store keyed by username. Only the interface
//! lives here; `MemoryStore` is the reference implementation the API
//! server runs with.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use crate::error::{ExploreError, Result};

/// Outcome of recording a like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Recorded,
    AlreadyLiked,
}

pub trait ProfileStore: Send + Sync {
    /// Record that `liker` liked `liked`'s profile. Liking the same
    /// profile twice is a no-op reported as `AlreadyLiked`.
    fn like(&self, liker: &str, liked: &str) -> Result<LikeOutcome>;

    /// Usernames that have liked `username`'s profile, sorted
    fn likes_received(&self, username: &str) -> Vec<String>;

    fn liked_by_count(&self, username: &str) -> usize;
}

/// In-memory profile store keyed by the liked username
#[derive(Debug, Default)]
pub struct MemoryStore {
    likes: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn like(&self, liker: &str, liked: &str) -> Result<LikeOutcome> {
        let liker = liker.trim();
        let liked = liked.trim();
        if liker.is_empty() || liked.is_empty() {
            return Err(ExploreError::InvalidInput(
                "both liker and liked usernames are required".to_string(),
            ));
        }
        if liker == liked {
            return Err(ExploreError::InvalidInput(
                "cannot like your own profile".to_string(),
            ));
        }

        let mut likes = self
            .likes
            .write()
            .map_err(|_| ExploreError::Generic("profile store lock poisoned".to_string()))?;
        let inserted = likes
            .entry(liked.to_string())
            .or_default()
            .insert(liker.to_string());
        Ok(if inserted {
            LikeOutcome::Recorded
        } else {
            LikeOutcome::AlreadyLiked
        })
    }

    fn likes_received(&self, username: &str) -> Vec<String> {
        self.likes
            .read()
            .ok()
            .and_then(|likes| likes.get(username).map(|s| s.iter().cloned().collect()))
            .unwrap_or_default()
    }

    fn liked_by_count(&self, username: &str) -> usize {
        self.likes
            .read()
            .ok()
            .and_then(|likes| likes.get(username).map(BTreeSet::len))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likes_are_recorded_once() {
        let store = MemoryStore::new();
        assert_eq!(store.like("alice", "bob").unwrap(), LikeOutcome::Recorded);
        assert_eq!(
            store.like("alice", "bob").unwrap(),
            LikeOutcome::AlreadyLiked
        );
        assert_eq!(store.liked_by_count("bob"), 1);
        assert_eq!(store.likes_received("bob"), vec!["alice".to_string()]);
    }

    #[test]
    fn likers_are_listed_sorted() {
        let store = MemoryStore::new();
        store.like("carol", "bob").unwrap();
        store.like("alice", "bob").unwrap();
        assert_eq!(
            store.likes_received("bob"),
            vec!["alice".to_string(), "carol".to_string()]
        );
    }

    #[test]
    fn self_like_and_empty_names_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.like("bob", "bob"),
            Err(ExploreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.like("", "bob"),
            Err(ExploreError::InvalidInput(_))
        ));
        assert_eq!(store.liked_by_count("bob"), 0);
    }
}
