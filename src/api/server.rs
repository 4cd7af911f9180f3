// src/api/server.rs
//! Legacy dialect (`/rest/api`), spoken by Confluence Server and Data Center.
//!
//! Related entities are pulled in with `expand` parameters and listings
//! are offset paginated. Responses are normalized to the canonical model
//! before they leave this module.

use super::pagination::{collect_pages, page_size, Batch};
use super::requests::{
    ContentRef, LabelEntry, LegacyBodyPayload, LegacyCreatePage, LegacyUpdatePage, SpaceRef,
    StorageBody, VersionBump,
};
use super::responses::{LegacyContent, LegacySpace, OffsetPage, ToDomain};
use super::space_cache::SpaceIdCache;
use super::transport::Transport;
use super::ConfluenceApi;
use crate::error::AppError;
use crate::model::{Ancestor, Label, NewPage, Page, PageUpdate, Space};
use crate::types::InstanceType;
use reqwest::Method;
use serde::de::DeserializeOwned;

const PAGE_EXPAND: &str = "version,space,ancestors,metadata.labels";
const LISTING_EXPAND: &str = "version,space";

pub struct ServerApi {
    transport: Transport,
    spaces: SpaceIdCache,
}

impl ServerApi {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            spaces: SpaceIdCache::new(),
        }
    }

    /// Walks an offset-paginated listing. The pagination token is the next `start`.
    async fn collect_offset<T>(
        &self,
        segments: &[&str],
        base_query: Vec<(&'static str, String)>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let url = self.transport.legacy_endpoint(segments)?;
        let transport = &self.transport;
        let url = &url;
        let base_query = &base_query;

        collect_pages(
            move |token: Option<String>| async move {
                let start = token
                    .as_deref()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut query = base_query.clone();
                query.push(("limit", page_size(limit).to_string()));
                if start > 0 {
                    query.push(("start", start.to_string()));
                }
                let page: OffsetPage<T> = transport.get_json(url, &query).await?;
                let next = page.next_start().map(|n| n.to_string());
                Ok::<_, AppError>(Batch {
                    items: page.results,
                    next,
                })
            },
            limit,
        )
        .await
    }

    async fn get_content(&self, id: &str, expand: &str) -> Result<LegacyContent, AppError> {
        let url = self.transport.legacy_endpoint(&["content", id])?;
        self.transport
            .get_json(&url, &[("expand", expand.to_string())])
            .await
    }
}

#[async_trait::async_trait]
impl ConfluenceApi for ServerApi {
    fn instance_type(&self) -> InstanceType {
        InstanceType::Server
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn get_page(&self, id: &str, include_body: bool) -> Result<Page, AppError> {
        let expand = if include_body {
            format!("{},body.storage", PAGE_EXPAND)
        } else {
            PAGE_EXPAND.to_string()
        };
        Ok(self.get_content(id, &expand).await?.to_domain())
    }

    async fn list_pages(
        &self,
        space_key: &str,
        title: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Page>, AppError> {
        let mut query = vec![
            ("type", "page".to_string()),
            ("spaceKey", space_key.to_string()),
            ("expand", LISTING_EXPAND.to_string()),
        ];
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            query.push(("title", title.to_string()));
        }
        let pages: Vec<LegacyContent> = self.collect_offset(&["content"], query, limit).await?;
        Ok(pages.into_iter().map(ToDomain::to_domain).collect())
    }

    async fn get_children(&self, id: &str, limit: Option<usize>) -> Result<Vec<Page>, AppError> {
        let query = vec![("expand", "version".to_string())];
        let pages: Vec<LegacyContent> = self
            .collect_offset(&["content", id, "child", "page"], query, limit)
            .await?;
        Ok(pages.into_iter().map(ToDomain::to_domain).collect())
    }

    async fn get_ancestors(&self, id: &str) -> Result<Vec<Ancestor>, AppError> {
        let content = self.get_content(id, "ancestors").await?;
        Ok(content
            .ancestors
            .into_iter()
            .map(ToDomain::to_domain)
            .collect())
    }

    async fn create_page(&self, page: &NewPage) -> Result<Page, AppError> {
        let request = LegacyCreatePage {
            content_type: "page",
            title: page.title.clone(),
            space: SpaceRef {
                key: page.space_key.clone(),
            },
            ancestors: page
                .parent_id
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| ContentRef { id: p.clone() })
                .collect(),
            body: StorageBody::from_text(Some(&page.body))
                .map(|storage| LegacyBodyPayload { storage }),
        };
        let url = self.transport.legacy_url("content");
        let created: LegacyContent = self.transport.send_json(Method::POST, &url, &request).await?;
        log::info!("Created page {} in space {}", created.id, page.space_key);
        Ok(created.to_domain())
    }

    async fn submit_update(
        &self,
        id: &str,
        title: &str,
        update: &PageUpdate,
        version: u32,
    ) -> Result<Page, AppError> {
        let request = LegacyUpdatePage {
            content_type: "page",
            title: title.to_string(),
            version: VersionBump {
                number: version,
                message: update.message.clone().unwrap_or_default(),
            },
            body: StorageBody::from_text(update.body.as_deref())
                .map(|storage| LegacyBodyPayload { storage }),
        };
        let url = self.transport.legacy_endpoint(&["content", id])?;
        let updated: LegacyContent = self.transport.send_json(Method::PUT, &url, &request).await?;
        Ok(updated.to_domain())
    }

    async fn delete_page(&self, id: &str) -> Result<(), AppError> {
        let url = self.transport.legacy_endpoint(&["content", id])?;
        self.transport.delete(&url, &[]).await
    }

    async fn list_spaces(&self, limit: Option<usize>) -> Result<Vec<Space>, AppError> {
        let spaces: Vec<LegacySpace> = self.collect_offset(&["space"], Vec::new(), limit).await?;
        Ok(spaces.into_iter().map(ToDomain::to_domain).collect())
    }

    async fn get_space(&self, key: &str) -> Result<Space, AppError> {
        let url = self.transport.legacy_endpoint(&["space", key])?;
        let space: LegacySpace = self.transport.get_json(&url, &[]).await?;
        Ok(space.to_domain())
    }

    async fn resolve_space_id(&self, key: &str) -> Result<String, AppError> {
        self.spaces
            .resolve(key, || async move { self.get_space(key).await.map(|space| space.id) })
            .await
    }

    async fn get_labels(&self, id: &str) -> Result<Vec<Label>, AppError> {
        let content = self.get_content(id, "metadata.labels").await?;
        Ok(content
            .metadata
            .and_then(|m| m.labels)
            .map(|l| l.results)
            .unwrap_or_default())
    }

    async fn add_labels(&self, id: &str, names: &[String]) -> Result<(), AppError> {
        let entries = LabelEntry::global(names);
        if entries.is_empty() {
            return Ok(());
        }
        let url = self.transport.legacy_endpoint(&["content", id, "label"])?;
        self.transport
            .request(Method::POST, &url, &[], Some(&entries))
            .await
            .map(|_| ())
    }

    async fn remove_label(&self, id: &str, name: &str) -> Result<(), AppError> {
        let url = self
            .transport
            .legacy_endpoint(&["content", id, "label", name])?;
        self.transport.delete(&url, &[]).await
    }
}
