// src/api/pagination.rs
//! Pagination shared by both dialects.
//!
//! The modern dialect hands out opaque cursors, the legacy dialect numeric
//! offsets. Both are carried as an opaque `Option<String>` token so one
//! loop serves every listing endpoint.

use crate::constants::{API_PAGE_SIZE, MAX_PAGES_PER_LISTING};
use crate::error::AppError;

/// One fetched page of results plus the token for the next one.
#[derive(Debug)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Page size to request for a listing with an optional overall limit.
pub fn page_size(limit: Option<usize>) -> usize {
    match limit {
        Some(n) if n > 0 => n.min(API_PAGE_SIZE),
        _ => API_PAGE_SIZE,
    }
}

/// Follows pagination until `limit` items are collected or the server runs dry.
pub async fn collect_pages<T, F, Fut>(mut fetch: F, limit: Option<usize>) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<Batch<T>, AppError>>,
{
    let limit = limit.filter(|n| *n > 0);
    let mut all_items = Vec::new();
    let mut token = None;
    let mut pages_fetched = 0usize;

    loop {
        if pages_fetched >= MAX_PAGES_PER_LISTING {
            log::debug!("Reached maximum page limit: {}", MAX_PAGES_PER_LISTING);
            break;
        }

        let batch = fetch(token).await?;
        pages_fetched += 1;
        let fetched = batch.items.len();
        all_items.extend(batch.items);

        if limit.is_some_and(|n| all_items.len() >= n) {
            break;
        }
        match batch.next {
            Some(next) if fetched > 0 => token = Some(next),
            _ => break,
        }
    }

    if let Some(n) = limit {
        all_items.truncate(n);
    }
    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn page_size_respects_limit() {
        assert_eq!(page_size(None), 100);
        assert_eq!(page_size(Some(0)), 100);
        assert_eq!(page_size(Some(25)), 25);
        assert_eq!(page_size(Some(500)), 100);
    }

    #[tokio::test]
    async fn follows_tokens_until_exhausted() {
        let seen = RefCell::new(Vec::new());
        let seen_ref = &seen;
        let items = collect_pages(
            move |token: Option<String>| async move {
                seen_ref.borrow_mut().push(token.clone());
                Ok(match token.as_deref() {
                    None => Batch { items: vec![1, 2], next: Some("b".to_string()) },
                    Some("b") => Batch { items: vec![3], next: None },
                    Some(_) => Batch { items: vec![], next: None },
                })
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(*seen.borrow(), vec![None, Some("b".to_string())]);
    }

    #[tokio::test]
    async fn stops_once_limit_is_met() {
        let items = collect_pages(
            |_token: Option<String>| async {
                Ok(Batch { items: vec![1, 2, 3], next: Some("more".to_string()) })
            },
            Some(5),
        )
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 1, 2]);
    }

    #[tokio::test]
    async fn endless_servers_are_capped() {
        let calls = RefCell::new(0usize);
        let calls_ref = &calls;
        let items = collect_pages(
            move |_token: Option<String>| async move {
                *calls_ref.borrow_mut() += 1;
                Ok(Batch { items: vec![0u8], next: Some("again".to_string()) })
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(items.len(), MAX_PAGES_PER_LISTING);
        assert_eq!(*calls.borrow(), MAX_PAGES_PER_LISTING);
    }

    #[tokio::test]
    async fn errors_abort_the_listing() {
        let result: Result<Vec<u8>, _> = collect_pages(
            |_token: Option<String>| async { Err(AppError::NotFound("space".into())) },
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
