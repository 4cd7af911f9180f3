// src/query/tree.rs
//! Depth-bounded page tree for `tree(...)`.
//!
//! Pages are fetched one at a time: a node's children are walked in the
//! order the API lists them, each subtree finished before the next sibling
//! starts. Only the root fetch can fail the whole tree.

use super::schema::FieldSchema;
use crate::api::ConfluenceApi;
use crate::error::AppError;
use crate::model::Page;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::Value;

/// A projected page with its (possibly truncated) descendants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub page: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of levels below this node.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

pub struct TreeBuilder<'a> {
    api: &'a dyn ConfluenceApi,
    schema: &'a FieldSchema<Page>,
    fields: Option<&'a [String]>,
    max_depth: u32,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        api: &'a dyn ConfluenceApi,
        schema: &'a FieldSchema<Page>,
        fields: Option<&'a [String]>,
        max_depth: u32,
    ) -> Self {
        Self {
            api,
            schema,
            fields,
            max_depth,
        }
    }

    pub async fn build(&self, root_id: &str) -> Result<TreeNode, AppError> {
        self.node(root_id.to_string(), 0).await
    }

    fn include_body(&self) -> bool {
        self.fields
            .is_some_and(|fields| fields.iter().any(|f| f == "body"))
    }

    fn node(&self, id: String, depth: u32) -> BoxFuture<'_, Result<TreeNode, AppError>> {
        async move {
            let page = self.api.get_page(&id, self.include_body()).await?;
            let mut node = TreeNode {
                page: Value::Object(self.schema.project(Some(&page), self.fields)),
                children: Vec::new(),
            };

            if depth >= self.max_depth {
                return Ok(node);
            }

            let children = match self.api.get_children(&id, None).await {
                Ok(children) => children,
                Err(e) => {
                    log::warn!("Could not list children of page {}: {}", id, e);
                    return Ok(node);
                }
            };

            for child in children {
                match self.node(child.id.clone(), depth + 1).await {
                    Ok(subtree) => node.children.push(subtree),
                    Err(e) => log::warn!("Skipping child page {} of {}: {}", child.id, id, e),
                }
            }
            Ok(node)
        }
        .boxed()
    }
}
