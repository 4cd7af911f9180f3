// src/api/responses.rs
//! Wire shapes of both API dialects and their conversion to the canonical model.
//!
//! The modern dialect returns flat objects with ids for related entities and
//! cursor links for pagination. The legacy dialect nests related entities
//! (space, version author, labels) behind `expand` parameters and paginates
//! by offset. Everything here is converted through [`ToDomain`] so the rest
//! of the crate only sees [`crate::model`] types.

use crate::model::{
    Ancestor, BodyContent, ContentSummary, Label, Page, SearchHit, SearchResult, Space, Version,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Trait for converting dialect wire types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> T;
}

/// `_links` block shared by both dialects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webui: Option<String>,
}

// ---------------------------------------------------------------------------
// Modern dialect (/api/v2)
// ---------------------------------------------------------------------------

/// Generic cursor-paginated response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl<T> CursorPage<T> {
    /// Cursor for the following page, taken from the `next` link.
    ///
    /// The link is relative to the site root and may carry a context path,
    /// so only its `cursor` parameter is kept and re-sent to the endpoint
    /// that produced this page.
    pub fn next_cursor(&self) -> Option<String> {
        let next = self.links.as_ref()?.next.as_deref()?;
        let url = Url::parse("http://localhost/").ok()?.join(next).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "cursor")
            .map(|(_, value)| value.into_owned())
    }
}

/// A page as returned by the modern dialect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModernPage {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub body: Option<ModernBody>,
    #[serde(default)]
    pub labels: Option<CursorPage<Label>>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModernBody {
    #[serde(default)]
    pub storage: Option<BodyContent>,
    #[serde(default)]
    pub atlas_doc_format: Option<BodyContent>,
}

impl ToDomain<Page> for ModernPage {
    fn to_domain(self) -> Page {
        Page {
            id: self.id,
            status: self.status.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            space_id: self.space_id.unwrap_or_default(),
            space_key: None,
            parent_id: self.parent_id.unwrap_or_default(),
            author_id: self.author_id.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_default(),
            version: self.version,
            body: self.body.and_then(|b| b.storage.or(b.atlas_doc_format)),
            labels: self.labels.map(|l| l.results),
            web_url: self.links.and_then(|l| l.webui).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Legacy dialect (/rest/api)
// ---------------------------------------------------------------------------

/// Offset-paginated list wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct OffsetPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub start: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub limit: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub size: usize,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl<T> OffsetPage<T> {
    /// Offset of the following page, if the server advertised one.
    pub fn next_start(&self) -> Option<usize> {
        let has_next = self
            .links
            .as_ref()
            .map(|l| l.next.is_some())
            .unwrap_or(false);
        let size = if self.size == 0 {
            self.results.len()
        } else {
            self.size
        };
        (has_next && size > 0).then(|| self.start + size)
    }
}

/// A content object (page, blog post, comment) as returned by the legacy dialect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyContent {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<LegacySpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<LegacyBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LegacyVersion>,
    #[serde(
        default,
        deserialize_with = "crate::model::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ancestors: Vec<LegacyContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LegacyMetadata>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySpace {
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "crate::model::null_as_default")]
    pub space_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<BodyContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<BodyContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyVersion {
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub number: u32,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub when: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<LegacyUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Server/DC only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LegacyLabels>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyLabels {
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub results: Vec<Label>,
}

impl ToDomain<Page> for LegacyContent {
    fn to_domain(self) -> Page {
        let version = self.version.map(|v| Version {
            number: v.number,
            message: v.message,
            created_at: v.when,
            author_id: v
                .by
                .and_then(|by| by.account_id.filter(|id| !id.is_empty()).or(by.username))
                .unwrap_or_default(),
        });

        Page {
            id: self.id,
            status: self.status.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            space_id: self
                .space
                .as_ref()
                .map(|s| s.id.to_string())
                .unwrap_or_default(),
            space_key: self.space.map(|s| s.key).filter(|k| !k.is_empty()),
            parent_id: self
                .ancestors
                .last()
                .map(|a| a.id.clone())
                .unwrap_or_default(),
            author_id: String::new(),
            created_at: String::new(),
            version,
            body: self.body.and_then(|b| b.storage),
            labels: self.metadata.and_then(|m| m.labels).map(|l| l.results),
            web_url: self.links.and_then(|l| l.webui).unwrap_or_default(),
        }
    }
}

impl ToDomain<Ancestor> for LegacyContent {
    fn to_domain(self) -> Ancestor {
        Ancestor {
            id: self.id,
            title: self.title.unwrap_or_default(),
        }
    }
}

impl ToDomain<Space> for LegacySpace {
    fn to_domain(self) -> Space {
        Space {
            id: self.id.to_string(),
            key: self.key,
            name: self.name,
            space_type: self.space_type,
            status: self.status.unwrap_or_default(),
            homepage_id: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// CQL search (legacy only)
// ---------------------------------------------------------------------------

/// Response of `/rest/api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchResponse {
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub results: Vec<LegacySearchItem>,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub start: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub limit: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub size: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub total_size: usize,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub cql_query: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchItem {
    #[serde(default)]
    pub content: Option<LegacyContent>,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub url: String,
    #[serde(default)]
    pub result_global_container: Option<ResultContainer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultContainer {
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::model::null_as_default")]
    pub display_url: String,
}

impl ToDomain<SearchResult> for LegacySearchResponse {
    fn to_domain(self) -> SearchResult {
        let hits = self
            .results
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                excerpt: item.excerpt,
                url: item.url,
                content: item.content.map(|c| ContentSummary {
                    id: c.id,
                    content_type: c.content_type.unwrap_or_default(),
                    status: c.status.unwrap_or_default(),
                    title: c.title.unwrap_or_default(),
                    space_key: c.space.map(|s| s.key),
                }),
                container: item.result_global_container.map(|c| c.title),
            })
            .collect();

        SearchResult {
            hits,
            start: self.start,
            limit: self.limit,
            size: self.size,
            total_size: self.total_size,
            cql_query: self.cql_query,
        }
    }
}
