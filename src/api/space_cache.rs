// src/api/space_cache.rs
//! Memo of space key → space id lookups.
//!
//! Entries are never invalidated: space keys are not renamed during a
//! session, so the mapping is a pure function of the key for the lifetime
//! of the client that owns it.

use crate::error::AppError;
use dashmap::DashMap;
use std::future::Future;

#[derive(Debug, Default)]
pub struct SpaceIdCache {
    ids: DashMap<String, String>,
}

impl SpaceIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached id for `key`, or runs `lookup` once and stores its result.
    ///
    /// A failed lookup stores nothing, so the next call asks again.
    pub async fn resolve<F, Fut>(&self, key: &str, lookup: F) -> Result<String, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, AppError>>,
    {
        if let Some(id) = self.ids.get(key) {
            log::debug!("Space key {} resolved from cache", key);
            return Ok(id.value().clone());
        }

        let id = lookup().await?;
        self.ids.insert(key.to_string(), id.clone());
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_resolution_makes_no_lookup() {
        let cache = SpaceIdCache::new();
        let lookups = AtomicUsize::new(0);

        for _ in 0..3 {
            let id = cache
                .resolve("DEV", || async {
                    lookups.fetch_add(1, Ordering::SeqCst);
                    Ok("98304".to_string())
                })
                .await
                .unwrap();
            assert_eq!(id, "98304");
        }

        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = SpaceIdCache::new();
        let result = cache
            .resolve("NOPE", || async { Err(AppError::NotFound("space NOPE".into())) })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
