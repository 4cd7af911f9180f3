// src/query/executor.rs
//! Statement dispatch.
//!
//! Each statement runs to completion before the next one starts; results
//! come back in statement order. The first failing statement ends the
//! batch, wrapped with its 1-based index and operation name.

use super::ast::{Operation, Query, Statement};
use super::parser::parse_query;
use super::schema::{page_schema, FieldSchema};
use super::tree::TreeBuilder;
use crate::api::ConfluenceApi;
use crate::constants::{
    DEFAULT_TREE_DEPTH, LABEL_LISTING_LIMIT, MAX_TREE_DEPTH, SEARCH_RESULT_LIMIT,
};
use crate::error::AppError;
use crate::model::{Page, SearchResult, Space};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Space fields beyond `id` and `key` that a field block may ask for.
const OPTIONAL_SPACE_FIELDS: [&str; 4] = ["name", "type", "status", "homepageId"];

/// Runs parsed queries against one Confluence client.
#[derive(Clone)]
pub struct Executor {
    api: Arc<dyn ConfluenceApi>,
    schema: Arc<FieldSchema<Page>>,
}

impl Executor {
    pub fn new(api: Arc<dyn ConfluenceApi>) -> Self {
        Self::with_schema(api, Arc::new(page_schema()))
    }

    pub fn with_schema(api: Arc<dyn ConfluenceApi>, schema: Arc<FieldSchema<Page>>) -> Self {
        Self { api, schema }
    }

    pub fn schema(&self) -> &FieldSchema<Page> {
        &self.schema
    }

    pub fn parse(&self, input: &str) -> Result<Query, AppError> {
        Ok(parse_query(input, self.schema())?)
    }

    /// Parses and executes `input`.
    ///
    /// A single statement yields its own result; a batch yields an array
    /// with one element per statement.
    pub async fn run(&self, input: &str) -> Result<Value, AppError> {
        let query = self.parse(input)?;
        let mut results = self.execute(&query).await?;
        if results.len() == 1 {
            Ok(results.remove(0))
        } else {
            Ok(Value::Array(results))
        }
    }

    pub async fn execute(&self, query: &Query) -> Result<Vec<Value>, AppError> {
        let mut results = Vec::with_capacity(query.statements.len());
        for (i, stmt) in query.statements.iter().enumerate() {
            log::debug!("Executing statement {}: {}", i + 1, stmt.operation);
            let value = self
                .execute_statement(stmt)
                .await
                .map_err(|e| e.in_statement(i + 1, stmt.operation.as_str()))?;
            results.push(value);
        }
        Ok(results)
    }

    async fn execute_statement(&self, stmt: &Statement) -> Result<Value, AppError> {
        match stmt.operation {
            Operation::Get => self.get(stmt).await,
            Operation::List => self.list(stmt).await,
            Operation::Search => self.search(stmt).await,
            Operation::Children => self.children(stmt).await,
            Operation::Ancestors => self.ancestors(stmt).await,
            Operation::Tree => self.tree(stmt).await,
            Operation::Spaces => self.spaces(stmt).await,
            Operation::History => Err(AppError::NotImplemented("history".to_string())),
        }
    }

    fn project(&self, page: &Page, stmt: &Statement) -> Value {
        Value::Object(self.schema.project(Some(page), stmt.fields.as_deref()))
    }

    fn project_all(&self, pages: &[Page], stmt: &Statement) -> Value {
        Value::Array(pages.iter().map(|p| self.project(p, stmt)).collect())
    }

    async fn get(&self, stmt: &Statement) -> Result<Value, AppError> {
        let include_body = stmt.wants_field("body");

        if let Some(id) = stmt.positional(0) {
            let page = self.api.get_page(id, include_body).await?;
            return Ok(self.project(&page, stmt));
        }

        let (Some(space), Some(title)) = (stmt.named("space"), stmt.named("title")) else {
            return Err(usage("get requires a page ID or space+title args"));
        };

        let pages = self.api.list_pages(space, Some(title), Some(1)).await?;
        let found = pages.into_iter().next().ok_or_else(|| {
            AppError::NotFound(format!("page \"{}\" in space {}", title, space))
        })?;

        // Listings never carry the body.
        let page = if include_body {
            self.api.get_page(&found.id, true).await?
        } else {
            found
        };
        Ok(self.project(&page, stmt))
    }

    async fn list(&self, stmt: &Statement) -> Result<Value, AppError> {
        let space = stmt
            .named("space")
            .ok_or_else(|| usage("list requires space=KEY"))?;

        // Label filtering is CQL-only and returns search excerpts, not pages.
        if let Some(label) = stmt.named("label") {
            let cql = format!(
                "type=page AND space={} AND label={}",
                cql_string(space),
                cql_string(label)
            );
            let result = self.api.search_cql(&cql, Some(LABEL_LISTING_LIMIT)).await?;
            return Ok(excerpt_list(&result));
        }

        let pages = self.api.list_pages(space, stmt.named("title"), None).await?;
        Ok(self.project_all(&pages, stmt))
    }

    async fn search(&self, stmt: &Statement) -> Result<Value, AppError> {
        let cql = stmt
            .positional(0)
            .ok_or_else(|| usage("search requires a CQL query string"))?;
        let result = self.api.search_cql(cql, Some(SEARCH_RESULT_LIMIT)).await?;
        Ok(excerpt_list(&result))
    }

    async fn children(&self, stmt: &Statement) -> Result<Value, AppError> {
        let id = stmt
            .positional(0)
            .ok_or_else(|| usage("children requires a page ID"))?;
        let children = self.api.get_children(id, None).await?;
        Ok(self.project_all(&children, stmt))
    }

    async fn ancestors(&self, stmt: &Statement) -> Result<Value, AppError> {
        let id = stmt
            .positional(0)
            .ok_or_else(|| usage("ancestors requires a page ID"))?;
        let ancestors = self.api.get_ancestors(id).await?;
        Ok(serde_json::to_value(ancestors)?)
    }

    async fn tree(&self, stmt: &Statement) -> Result<Value, AppError> {
        let id = stmt
            .positional(0)
            .ok_or_else(|| usage("tree requires a page ID"))?;
        let depth = match stmt.named("depth") {
            None => DEFAULT_TREE_DEPTH,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                usage(&format!(
                    "tree depth must be a non-negative integer, got \"{}\"",
                    raw
                ))
            })?,
        }
        .min(MAX_TREE_DEPTH);

        let builder = TreeBuilder::new(
            self.api.as_ref(),
            &self.schema,
            stmt.fields.as_deref(),
            depth,
        );
        let root = builder.build(id).await?;
        Ok(serde_json::to_value(root)?)
    }

    async fn spaces(&self, stmt: &Statement) -> Result<Value, AppError> {
        let spaces = self.api.list_spaces(None).await?;
        Ok(Value::Array(
            spaces.iter().map(|s| project_space(s, stmt)).collect(),
        ))
    }

    /// Operations, fields and presets as JSON.
    pub fn describe(&self) -> Value {
        describe_language(&self.schema)
    }
}

/// Operations known to the query language, plus the fields and presets of `schema`.
pub fn describe_language(schema: &FieldSchema<Page>) -> Value {
    let operations: Vec<Value> = Operation::ALL
        .iter()
        .map(|op| {
            let parameters: Vec<Value> = op
                .parameters()
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "type": p.kind,
                        "optional": p.optional,
                        "description": p.description,
                    })
                })
                .collect();
            json!({
                "name": op.as_str(),
                "description": op.description(),
                "parameters": parameters,
                "examples": op.examples(),
            })
        })
        .collect();

    let mut out = Map::new();
    out.insert("operations".to_string(), Value::Array(operations));
    if let Value::Object(described) = schema.describe() {
        out.extend(described);
    }
    Value::Object(out)
}

fn usage(message: &str) -> AppError {
    AppError::Usage(message.to_string())
}

/// Double-quoted CQL string literal.
fn cql_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Spaces carry their own projection: `id` and `key` always, `name` when
/// no field block is given, other fields only when listed explicitly.
fn project_space(space: &Space, stmt: &Statement) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), json!(space.id));
    out.insert("key".to_string(), json!(space.key));

    let requested: &[String] = match (&stmt.fields, &stmt.preset) {
        (None, _) => {
            out.insert("name".to_string(), json!(space.name));
            return Value::Object(out);
        }
        (Some(_), Some(_)) => &[],
        (Some(fields), None) => fields,
    };

    for field in OPTIONAL_SPACE_FIELDS {
        if !requested.iter().any(|f| f == field) {
            continue;
        }
        let value = match field {
            "name" => &space.name,
            "type" => &space.space_type,
            "status" => &space.status,
            _ => &space.homepage_id,
        };
        out.insert(field.to_string(), json!(value));
    }
    Value::Object(out)
}

/// The reduced shape search hits are reported in.
fn excerpt_list(result: &SearchResult) -> Value {
    let items = result
        .hits
        .iter()
        .map(|hit| {
            let mut item = Map::new();
            if let Some(content) = &hit.content {
                item.insert("id".to_string(), json!(content.id));
            }
            item.insert("title".to_string(), json!(hit.title));
            if let Some(content) = &hit.content {
                item.insert("type".to_string(), json!(content.content_type));
                if let Some(key) = &content.space_key {
                    item.insert("spaceKey".to_string(), json!(key));
                }
            }
            item.insert("excerpt".to_string(), json!(hit.excerpt));
            Value::Object(item)
        })
        .collect();
    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Transport;
    use crate::config::ClientConfig;
    use crate::model::{
        Ancestor, ContentSummary, Label, NewPage, PageUpdate, SearchHit, Version,
    };
    use crate::types::InstanceType;
    use pretty_assertions::assert_eq;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory Confluence for executor tests.
    struct MockConfluence {
        transport: Transport,
        pages: HashMap<String, Page>,
        children: HashMap<String, Vec<String>>,
        failing: HashSet<String>,
        spaces: Vec<Space>,
        search: SearchResult,
        page_fetches: AtomicUsize,
        last_cql: Mutex<Option<(String, Option<usize>)>>,
    }

    impl MockConfluence {
        fn new() -> Self {
            let config = ClientConfig::new("https://acme.atlassian.net/wiki", "me@acme.com", "t");
            Self {
                transport: Transport::new(&config).unwrap(),
                pages: HashMap::new(),
                children: HashMap::new(),
                failing: HashSet::new(),
                spaces: Vec::new(),
                search: SearchResult::default(),
                page_fetches: AtomicUsize::new(0),
                last_cql: Mutex::new(None),
            }
        }

        fn with_page(mut self, id: &str, title: &str) -> Self {
            let page = Page {
                id: id.to_string(),
                title: title.to_string(),
                status: "current".to_string(),
                space_id: "98304".to_string(),
                space_key: Some("DEV".to_string()),
                version: Some(Version {
                    number: 2,
                    ..Version::default()
                }),
                labels: Some(vec![Label {
                    name: "ops".into(),
                    ..Label::default()
                }]),
                web_url: format!("/pages/{}", id),
                ..Page::default()
            };
            self.pages.insert(id.to_string(), page);
            self
        }

        fn with_children(mut self, parent: &str, ids: &[&str]) -> Self {
            for id in ids {
                self = self.with_page(id, &format!("Page {}", id));
            }
            self.children
                .insert(parent.to_string(), ids.iter().map(|s| s.to_string()).collect());
            self
        }

        fn failing(mut self, id: &str) -> Self {
            self.failing.insert(id.to_string());
            self
        }

        fn fetches(&self) -> usize {
            self.page_fetches.load(Ordering::SeqCst)
        }
    }

    fn unsupported<T>() -> Result<T, AppError> {
        Err(AppError::NotImplemented("mock".to_string()))
    }

    #[async_trait::async_trait]
    impl ConfluenceApi for MockConfluence {
        fn instance_type(&self) -> InstanceType {
            InstanceType::Cloud
        }

        fn transport(&self) -> &Transport {
            &self.transport
        }

        async fn get_page(&self, id: &str, _include_body: bool) -> Result<Page, AppError> {
            self.page_fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(id) {
                return Err(AppError::Api(crate::error::ApiError::new(500, "boom")));
            }
            self.pages
                .get(id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("page {}", id)))
        }

        async fn list_pages(
            &self,
            _space_key: &str,
            title: Option<&str>,
            _limit: Option<usize>,
        ) -> Result<Vec<Page>, AppError> {
            let mut pages: Vec<Page> = self
                .pages
                .values()
                .filter(|p| title.map_or(true, |t| p.title == t))
                .cloned()
                .collect();
            pages.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(pages)
        }

        async fn get_children(&self, id: &str, _limit: Option<usize>) -> Result<Vec<Page>, AppError> {
            Ok(self
                .children
                .get(id)
                .map(|ids| {
                    ids.iter()
                        .map(|c| Page {
                            id: c.clone(),
                            title: format!("Page {}", c),
                            ..Page::default()
                        })
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn get_ancestors(&self, _id: &str) -> Result<Vec<Ancestor>, AppError> {
            Ok(vec![
                Ancestor {
                    id: "1".into(),
                    title: "Home".into(),
                },
                Ancestor {
                    id: "2".into(),
                    title: "Guides".into(),
                },
            ])
        }

        async fn create_page(&self, _page: &NewPage) -> Result<Page, AppError> {
            unsupported()
        }

        async fn submit_update(
            &self,
            _id: &str,
            _title: &str,
            _update: &PageUpdate,
            _version: u32,
        ) -> Result<Page, AppError> {
            unsupported()
        }

        async fn delete_page(&self, _id: &str) -> Result<(), AppError> {
            unsupported()
        }

        async fn list_spaces(&self, _limit: Option<usize>) -> Result<Vec<Space>, AppError> {
            Ok(self.spaces.clone())
        }

        async fn get_space(&self, _key: &str) -> Result<Space, AppError> {
            unsupported()
        }

        async fn resolve_space_id(&self, _key: &str) -> Result<String, AppError> {
            unsupported()
        }

        async fn get_labels(&self, _id: &str) -> Result<Vec<Label>, AppError> {
            unsupported()
        }

        async fn add_labels(&self, _id: &str, _names: &[String]) -> Result<(), AppError> {
            unsupported()
        }

        async fn remove_label(&self, _id: &str, _name: &str) -> Result<(), AppError> {
            unsupported()
        }

        async fn search_cql(&self, cql: &str, limit: Option<usize>) -> Result<SearchResult, AppError> {
            *self.last_cql.lock().unwrap() = Some((cql.to_string(), limit));
            Ok(self.search.clone())
        }
    }

    fn executor(mock: MockConfluence) -> (Executor, Arc<MockConfluence>) {
        let mock = Arc::new(mock);
        (Executor::new(mock.clone()), mock)
    }

    fn keys(value: &Value) -> Vec<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[tokio::test]
    async fn preset_key_counts_match_definitions() {
        let (exec, _) = executor(MockConfluence::new().with_page("12345", "Runbook"));
        for (preset, count) in [("minimal", 3), ("default", 6), ("overview", 8), ("full", 12)] {
            let out = exec.run(&format!("get(12345){{{}}}", preset)).await.unwrap();
            assert_eq!(out.as_object().unwrap().len(), count, "preset {}", preset);
        }
    }

    #[tokio::test]
    async fn missing_field_block_means_default_preset() {
        let (exec, _) = executor(MockConfluence::new().with_page("12345", "Runbook"));
        let bare = exec.run("get(12345)").await.unwrap();
        let explicit = exec.run("get(12345){default}").await.unwrap();
        assert_eq!(bare, explicit);
        assert_eq!(bare["spaceKey"], json!("DEV"));
        assert_eq!(bare["version"], json!(2));
    }

    #[tokio::test]
    async fn get_by_space_and_title() {
        let (exec, _) = executor(
            MockConfluence::new()
                .with_page("1", "Home")
                .with_page("2", "Runbook"),
        );
        let out = exec
            .run(r#"get(space=DEV, title="Runbook"){id title}"#)
            .await
            .unwrap();
        assert_eq!(out, json!({"id": "2", "title": "Runbook"}));

        let err = exec.run(r#"get(space=DEV, title="Nope")"#).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_arguments_are_usage_errors() {
        let (exec, _) = executor(MockConfluence::new());
        for query in ["get()", "get(space=DEV)", "list()", "search()", "children()", "tree()"] {
            let err = exec.run(query).await.unwrap_err();
            let AppError::Statement { source, .. } = err else {
                panic!("expected statement error for {}", query);
            };
            assert!(matches!(*source, AppError::Usage(_)), "{}", query);
        }
    }

    #[tokio::test]
    async fn list_with_label_uses_cql_excerpts() {
        let mut mock = MockConfluence::new().with_page("1", "Home");
        mock.search = SearchResult {
            hits: vec![
                SearchHit {
                    title: "API".into(),
                    excerpt: "the api".into(),
                    content: Some(ContentSummary {
                        id: "77".into(),
                        content_type: "page".into(),
                        space_key: Some("DEV".into()),
                        ..ContentSummary::default()
                    }),
                    ..SearchHit::default()
                },
                SearchHit {
                    title: "Loose".into(),
                    excerpt: "x".into(),
                    ..SearchHit::default()
                },
            ],
            ..SearchResult::default()
        };
        let (exec, mock) = executor(mock);

        let out = exec.run("list(space=DEV, label=api){full}").await.unwrap();
        assert_eq!(
            out,
            json!([
                {"id": "77", "title": "API", "type": "page", "spaceKey": "DEV", "excerpt": "the api"},
                {"title": "Loose", "excerpt": "x"}
            ])
        );
        assert_eq!(keys(&out[0]), ["id", "title", "type", "spaceKey", "excerpt"]);
        assert_eq!(
            mock.last_cql.lock().unwrap().clone(),
            Some((
                r#"type=page AND space="DEV" AND label="api""#.to_string(),
                Some(LABEL_LISTING_LIMIT)
            ))
        );
    }

    #[tokio::test]
    async fn list_without_label_projects_pages() {
        let (exec, _) = executor(MockConfluence::new().with_page("1", "Home"));
        let out = exec.run("list(space=DEV){minimal}").await.unwrap();
        assert_eq!(out, json!([{"id": "1", "title": "Home", "status": "current"}]));
    }

    #[tokio::test]
    async fn empty_search_is_an_empty_array() {
        let (exec, mock) = executor(MockConfluence::new());
        let out = exec.run(r#"search("type=page")"#).await.unwrap();
        assert_eq!(out, json!([]));
        assert_eq!(mock.last_cql.lock().unwrap().as_ref().unwrap().1, Some(25));
    }

    #[tokio::test]
    async fn ancestors_bypass_projection() {
        let (exec, _) = executor(MockConfluence::new());
        let out = exec.run("ancestors(5){minimal}").await.unwrap();
        assert_eq!(
            out,
            json!([{"id": "1", "title": "Home"}, {"id": "2", "title": "Guides"}])
        );
    }

    #[tokio::test]
    async fn spaces_projection_rules() {
        let mut mock = MockConfluence::new();
        mock.spaces = vec![Space {
            id: "1".into(),
            key: "DEV".into(),
            name: "Development".into(),
            space_type: "global".into(),
            status: "current".into(),
            homepage_id: "10".into(),
        }];
        let (exec, _) = executor(mock);

        let bare = exec.run("spaces()").await.unwrap();
        assert_eq!(bare, json!([{"id": "1", "key": "DEV", "name": "Development"}]));

        let preset = exec.run("spaces(){minimal}").await.unwrap();
        assert_eq!(preset, json!([{"id": "1", "key": "DEV"}]));

        let explicit = exec.run("spaces(){status homepageId type}").await.unwrap();
        assert_eq!(keys(&explicit[0]), ["id", "key", "type", "status", "homepageId"]);
    }

    #[tokio::test]
    async fn batch_results_keep_statement_order() {
        let mut mock = MockConfluence::new();
        mock.spaces = vec![Space {
            id: "1".into(),
            key: "DEV".into(),
            ..Space::default()
        }];
        mock.pages.insert(
            "12345".into(),
            Page {
                id: "12345".into(),
                title: "P".into(),
                ..Page::default()
            },
        );
        let (exec, _) = executor(mock);

        let out = exec.run("spaces(){minimal}; get(12345){minimal}").await.unwrap();
        assert_eq!(
            out,
            json!([
                [{"id": "1", "key": "DEV"}],
                {"id": "12345", "title": "P", "status": ""}
            ])
        );
    }

    #[tokio::test]
    async fn failing_statement_reports_index_and_operation() {
        let (exec, _) = executor(MockConfluence::new().with_page("1", "Home"));
        let err = exec.run("get(1); history(1)").await.unwrap_err();
        match err {
            AppError::Statement {
                index,
                operation,
                source,
            } => {
                assert_eq!(index, 2);
                assert_eq!(operation, "history");
                assert!(matches!(*source, AppError::NotImplemented(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn parse_errors_happen_before_any_call() {
        let (exec, mock) = executor(MockConfluence::new().with_page("1", "Home"));
        assert!(matches!(
            exec.run("get(1); get(1){nope}").await,
            Err(AppError::Parse(_))
        ));
        assert!(matches!(exec.run("fetch(1)").await, Err(AppError::Parse(_))));
        assert_eq!(mock.fetches(), 0);
    }

    #[tokio::test]
    async fn tree_respects_depth_and_skips_failing_children() {
        let mock = MockConfluence::new()
            .with_page("root", "Root")
            .with_children("root", &["a", "b", "bad"])
            .with_children("a", &["a1"])
            .with_children("a1", &["a2"])
            .failing("bad");
        let (exec, _) = executor(mock);

        let out = exec.run("tree(root, depth=1){id}").await.unwrap();
        assert_eq!(
            out,
            json!({
                "page": {"id": "root"},
                "children": [{"page": {"id": "a"}}, {"page": {"id": "b"}}]
            })
        );

        let deep = exec.run("tree(root){id}").await.unwrap();
        assert_eq!(
            deep["children"][0]["children"][0]["children"][0]["page"],
            json!({"id": "a2"})
        );
    }

    #[tokio::test]
    async fn tree_depth_is_capped() {
        let mut mock = MockConfluence::new().with_page("p0", "P0");
        for level in 0..15 {
            mock = mock.with_children(&format!("p{}", level), &[format!("p{}", level + 1).as_str()]);
        }
        let (exec, mock) = executor(mock);

        let value = exec.run("tree(p0, depth=50){id}").await.unwrap();
        let tree: TreeNodeShape = serde_json::from_value(value).unwrap();
        assert_eq!(tree.depth(), MAX_TREE_DEPTH as usize);
        assert_eq!(mock.fetches(), MAX_TREE_DEPTH as usize + 1);
    }

    #[tokio::test]
    async fn tree_root_failure_and_bad_depth_are_fatal() {
        let (exec, _) = executor(MockConfluence::new().with_page("1", "Home").failing("1"));
        assert!(exec.run("tree(1)").await.is_err());
        let err = exec.run("tree(2, depth=deep)").await.unwrap_err();
        assert!(err.to_string().contains("non-negative integer"));
    }

    #[test]
    fn describe_lists_operations_first() {
        let exec = Executor::new(Arc::new(MockConfluence::new()));
        let described = exec.describe();
        assert_eq!(keys(&described), ["operations", "fields", "presets", "defaultPreset"]);
        assert_eq!(described["operations"].as_array().unwrap().len(), 8);
        assert_eq!(described["operations"][5]["parameters"][1]["name"], json!("depth"));
    }

    #[test]
    fn cql_strings_escape_quotes() {
        assert_eq!(cql_string(r#"a"b"#), r#""a\"b""#);
    }

    #[derive(serde::Deserialize)]
    struct TreeNodeShape {
        #[serde(default)]
        children: Vec<TreeNodeShape>,
    }

    impl TreeNodeShape {
        fn depth(&self) -> usize {
            self.children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
        }
    }
}
