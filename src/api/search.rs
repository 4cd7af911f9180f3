// src/api/search.rs
//! CQL search. Only the legacy path family offers it, so both dialects
//! route here regardless of instance type.

use super::parser::parse_body;
use super::responses::{LegacyContent, LegacySearchResponse, OffsetPage, ToDomain};
use super::transport::Transport;
use crate::error::AppError;
use crate::model::SearchResult;

fn cql_query(cql: &str, limit: Option<usize>) -> Vec<(&'static str, String)> {
    let mut query = vec![("cql", cql.to_string())];
    if let Some(n) = limit.filter(|n| *n > 0) {
        query.push(("limit", n.to_string()));
    }
    query
}

/// Rich search with highlighted excerpts (`/rest/api/search`).
pub async fn search_cql(
    transport: &Transport,
    cql: &str,
    limit: Option<usize>,
) -> Result<SearchResult, AppError> {
    let url = transport.legacy_url("search");
    let bytes = transport
        .request(reqwest::Method::GET, &url, &cql_query(cql, limit), None::<&()>)
        .await?;
    let response: LegacySearchResponse = parse_body(&bytes, &url)?;
    log::debug!(
        "CQL search returned {} of {} results",
        response.size,
        response.total_size
    );
    Ok(response.to_domain())
}

/// Content-only search (`/rest/api/content/search`), returned in legacy shape.
pub async fn search_content_cql(
    transport: &Transport,
    cql: &str,
    limit: Option<usize>,
    expand: &[&str],
) -> Result<Vec<LegacyContent>, AppError> {
    let url = transport.legacy_url("content/search");
    let mut query = cql_query(cql, limit);
    if !expand.is_empty() {
        query.push(("expand", expand.join(",")));
    }
    let page: OffsetPage<LegacyContent> = transport.get_json(&url, &query).await?;
    Ok(page.results)
}
