// src/api/cloud.rs
//! Modern dialect (`/api/v2`), spoken by Confluence Cloud.
//!
//! Objects are flat and reference related entities by id; listings are
//! cursor paginated. Spaces are addressed by numeric id, so every
//! operation taking a space key resolves it first through the memo.

use super::pagination::{collect_pages, page_size, Batch};
use super::requests::{LabelEntry, ModernCreatePage, ModernUpdatePage, StorageBody, VersionBump};
use super::responses::{CursorPage, ModernPage, ToDomain};
use super::space_cache::SpaceIdCache;
use super::transport::Transport;
use super::ConfluenceApi;
use crate::error::AppError;
use crate::model::{Ancestor, Label, NewPage, Page, PageUpdate, Space};
use crate::types::InstanceType;
use reqwest::Method;
use serde::de::DeserializeOwned;

pub struct CloudApi {
    transport: Transport,
    spaces: SpaceIdCache,
}

impl CloudApi {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            spaces: SpaceIdCache::new(),
        }
    }

    /// Walks a cursor-paginated listing.
    async fn collect_cursor<T>(
        &self,
        segments: &[&str],
        base_query: Vec<(&'static str, String)>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let url = self.transport.modern_endpoint(segments)?;
        let transport = &self.transport;
        let url = &url;
        let base_query = &base_query;

        collect_pages(
            move |cursor: Option<String>| async move {
                let mut query = base_query.clone();
                query.push(("limit", page_size(limit).to_string()));
                if let Some(cursor) = cursor {
                    query.push(("cursor", cursor));
                }
                let page: CursorPage<T> = transport.get_json(url, &query).await?;
                let next = page.next_cursor();
                Ok::<_, AppError>(Batch {
                    items: page.results,
                    next,
                })
            },
            limit,
        )
        .await
    }
}

#[async_trait::async_trait]
impl ConfluenceApi for CloudApi {
    fn instance_type(&self) -> InstanceType {
        InstanceType::Cloud
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn get_page(&self, id: &str, include_body: bool) -> Result<Page, AppError> {
        let url = self.transport.modern_endpoint(&["pages", id])?;
        let mut query = Vec::new();
        if include_body {
            query.push(("body-format", "storage".to_string()));
        }
        let page: ModernPage = self.transport.get_json(&url, &query).await?;
        Ok(page.to_domain())
    }

    async fn list_pages(
        &self,
        space_key: &str,
        title: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Page>, AppError> {
        let space_id = self.resolve_space_id(space_key).await?;
        let mut query = vec![("space-id", space_id)];
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            query.push(("title", title.to_string()));
        }
        let pages: Vec<ModernPage> = self.collect_cursor(&["pages"], query, limit).await?;
        Ok(pages.into_iter().map(ToDomain::to_domain).collect())
    }

    async fn get_children(&self, id: &str, limit: Option<usize>) -> Result<Vec<Page>, AppError> {
        let pages: Vec<ModernPage> = self
            .collect_cursor(&["pages", id, "children"], Vec::new(), limit)
            .await?;
        Ok(pages.into_iter().map(ToDomain::to_domain).collect())
    }

    async fn get_ancestors(&self, id: &str) -> Result<Vec<Ancestor>, AppError> {
        let url = self.transport.modern_endpoint(&["pages", id, "ancestors"])?;
        let page: CursorPage<Ancestor> = self.transport.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    async fn create_page(&self, page: &NewPage) -> Result<Page, AppError> {
        let space_id = self.resolve_space_id(&page.space_key).await?;
        let request = ModernCreatePage {
            space_id,
            status: "current",
            title: page.title.clone(),
            parent_id: page.parent_id.clone().filter(|p| !p.is_empty()),
            body: StorageBody::from_text(Some(&page.body)),
        };
        let url = self.transport.modern_url("pages");
        let created: ModernPage = self.transport.send_json(Method::POST, &url, &request).await?;
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
        let request = ModernUpdatePage {
            id: id.to_string(),
            status: "current",
            title: title.to_string(),
            body: StorageBody::from_text(update.body.as_deref()),
            version: VersionBump {
                number: version,
                message: update.message.clone().unwrap_or_default(),
            },
        };
        let url = self.transport.modern_endpoint(&["pages", id])?;
        let updated: ModernPage = self.transport.send_json(Method::PUT, &url, &request).await?;
        Ok(updated.to_domain())
    }

    async fn delete_page(&self, id: &str) -> Result<(), AppError> {
        let url = self.transport.modern_endpoint(&["pages", id])?;
        self.transport.delete(&url, &[]).await
    }

    async fn list_spaces(&self, limit: Option<usize>) -> Result<Vec<Space>, AppError> {
        self.collect_cursor(&["spaces"], Vec::new(), limit).await
    }

    async fn get_space(&self, key: &str) -> Result<Space, AppError> {
        let id = self.resolve_space_id(key).await?;
        let url = self.transport.modern_endpoint(&["spaces", id.as_str()])?;
        self.transport.get_json(&url, &[]).await
    }

    async fn resolve_space_id(&self, key: &str) -> Result<String, AppError> {
        let transport = &self.transport;
        self.spaces
            .resolve(key, || async move {
                let url = transport.modern_url("spaces");
                let page: CursorPage<Space> = transport
                    .get_json(&url, &[("keys", key.to_string())])
                    .await?;
                page.results
                    .into_iter()
                    .next()
                    .map(|space| space.id)
                    .ok_or_else(|| AppError::NotFound(format!("space \"{}\"", key)))
            })
            .await
    }

    async fn get_labels(&self, id: &str) -> Result<Vec<Label>, AppError> {
        self.collect_cursor(&["pages", id, "labels"], Vec::new(), None)
            .await
    }

    async fn add_labels(&self, id: &str, names: &[String]) -> Result<(), AppError> {
        let entries = LabelEntry::global(names);
        if entries.is_empty() {
            return Ok(());
        }
        let url = self.transport.modern_endpoint(&["pages", id, "labels"])?;
        self.transport
            .request(Method::POST, &url, &[], Some(&entries))
            .await
            .map(|_| ())
    }

    async fn remove_label(&self, id: &str, name: &str) -> Result<(), AppError> {
        let labels = self.get_labels(id).await?;
        let label = labels
            .into_iter()
            .find(|l| l.name == name)
            .ok_or_else(|| AppError::NotFound(format!("label \"{}\" on page {}", name, id)))?;
        let url = self
            .transport
            .modern_endpoint(&["pages", id, "labels", label.id.as_str()])?;
        self.transport.delete(&url, &[]).await
    }
}
