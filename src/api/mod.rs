// src/api/mod.rs
//! Confluence API interaction across the two REST dialects.
//!
//! Callers depend on [`ConfluenceApi`], never on HTTP details or on which
//! dialect answers. The dialect is chosen once, in [`connect`].

mod cloud;
pub mod pagination;
pub mod parser;
mod requests;
pub mod responses;
pub mod search;
mod server;
mod space_cache;
pub mod transport;

use crate::config::ClientConfig;
use crate::error::AppError;
use crate::model::{Ancestor, Label, NewPage, Page, PageUpdate, SearchResult, Space};
use crate::types::InstanceType;
use std::sync::Arc;

pub use cloud::CloudApi;
pub use responses::LegacyContent;
pub use server::ServerApi;
pub use space_cache::SpaceIdCache;
pub use transport::{Auth, Transport};

/// The ability to read and write content on a Confluence instance.
///
/// This is the fundamental algebra for API interaction. Both dialects
/// return canonical [`crate::model`] entities.
#[async_trait::async_trait]
pub trait ConfluenceApi: Send + Sync {
    fn instance_type(&self) -> InstanceType;

    /// The transport this client sends through.
    fn transport(&self) -> &Transport;

    async fn get_page(&self, id: &str, include_body: bool) -> Result<Page, AppError>;

    /// Pages of a space, optionally filtered by title.
    async fn list_pages(
        &self,
        space_key: &str,
        title: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Page>, AppError>;

    async fn get_children(&self, id: &str, limit: Option<usize>) -> Result<Vec<Page>, AppError>;

    /// Breadcrumb of a page, root first.
    async fn get_ancestors(&self, id: &str) -> Result<Vec<Ancestor>, AppError>;

    async fn create_page(&self, page: &NewPage) -> Result<Page, AppError>;

    /// Read-modify-write update.
    ///
    /// Fetches the current version first, keeps the current title when the
    /// update leaves it blank, and submits `current + 1` as the new version.
    async fn update_page(&self, id: &str, update: &PageUpdate) -> Result<Page, AppError> {
        let current = self.get_page(id, false).await.map_err(|e| {
            AppError::NotFound(format!("page {} (reading current version: {})", id, e))
        })?;

        let title = update
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&current.title)
            .to_string();
        let next_version = current.version_number() + 1;
        log::debug!("Updating page {} to version {}", id, next_version);

        self.submit_update(id, &title, update, next_version).await
    }

    /// Send an update carrying an explicit version number.
    async fn submit_update(
        &self,
        id: &str,
        title: &str,
        update: &PageUpdate,
        version: u32,
    ) -> Result<Page, AppError>;

    async fn delete_page(&self, id: &str) -> Result<(), AppError>;

    async fn list_spaces(&self, limit: Option<usize>) -> Result<Vec<Space>, AppError>;

    async fn get_space(&self, key: &str) -> Result<Space, AppError>;

    /// Space key → space id, memoized for the lifetime of the client.
    async fn resolve_space_id(&self, key: &str) -> Result<String, AppError>;

    async fn get_labels(&self, id: &str) -> Result<Vec<Label>, AppError>;

    /// Add global labels. Adding a label the page already has is a no-op.
    async fn add_labels(&self, id: &str, names: &[String]) -> Result<(), AppError>;

    async fn remove_label(&self, id: &str, name: &str) -> Result<(), AppError>;

    /// CQL search with excerpts. Always answered by the legacy path family.
    async fn search_cql(&self, cql: &str, limit: Option<usize>) -> Result<SearchResult, AppError> {
        search::search_cql(self.transport(), cql, limit).await
    }

    /// Content-only CQL search, returned in legacy shape.
    async fn search_content_cql(
        &self,
        cql: &str,
        limit: Option<usize>,
        expand: &[&str],
    ) -> Result<Vec<LegacyContent>, AppError> {
        search::search_content_cql(self.transport(), cql, limit, expand).await
    }
}

/// Builds the client for the configured instance.
///
/// Without an explicit instance type, hosts under `atlassian.net` are
/// treated as Cloud and everything else as Server/DC.
pub fn connect(config: &ClientConfig) -> Result<Arc<dyn ConfluenceApi>, AppError> {
    let transport = Transport::new(config)?;
    let instance_type = config
        .instance_type
        .unwrap_or_else(|| InstanceType::detect(transport.instance_url()));

    log::info!(
        "Connecting to {} as a {} instance",
        transport.base_url(),
        instance_type
    );

    Ok(match instance_type {
        InstanceType::Cloud => Arc::new(CloudApi::new(transport)),
        InstanceType::Server => Arc::new(ServerApi::new(transport)),
    })
}
