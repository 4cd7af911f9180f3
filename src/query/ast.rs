// src/query/ast.rs
//! Parsed form of a query string.

use std::fmt;
use std::str::FromStr;

/// The fixed set of operations the query language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    List,
    Search,
    Children,
    Ancestors,
    Tree,
    Spaces,
    History,
}

/// Describes one parameter of an operation for schema introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub kind: &'static str,
    pub optional: bool,
    pub description: &'static str,
}

const fn param(
    name: &'static str,
    kind: &'static str,
    optional: bool,
    description: &'static str,
) -> ParameterInfo {
    ParameterInfo {
        name,
        kind,
        optional,
        description,
    }
}

const PAGE_ID: ParameterInfo = param("id", "string", false, "Page ID (positional)");

const GET_PARAMS: &[ParameterInfo] = &[
    param("id", "string", true, "Page ID (positional)"),
    param("space", "string", true, "Space key (use with title)"),
    param("title", "string", true, "Page title (use with space)"),
];
const LIST_PARAMS: &[ParameterInfo] = &[
    param("space", "string", false, "Space key"),
    param("label", "string", true, "Filter by label (uses CQL)"),
    param("title", "string", true, "Filter by page title"),
];
const SEARCH_PARAMS: &[ParameterInfo] = &[param("cql", "string", false, "CQL query string (positional)")];
const PAGE_ID_PARAMS: &[ParameterInfo] = &[PAGE_ID];
const TREE_PARAMS: &[ParameterInfo] = &[
    PAGE_ID,
    param("depth", "int", true, "Max recursion depth (default 3, max 10)"),
];

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Get,
        Operation::List,
        Operation::Search,
        Operation::Children,
        Operation::Ancestors,
        Operation::Tree,
        Operation::Spaces,
        Operation::History,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::List => "list",
            Self::Search => "search",
            Self::Children => "children",
            Self::Ancestors => "ancestors",
            Self::Tree => "tree",
            Self::Spaces => "spaces",
            Self::History => "history",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Get => "Get page by ID or by space+title",
            Self::List => "List pages in a space, with optional label/title filter",
            Self::Search => "CQL search",
            Self::Children => "Direct children of a page",
            Self::Ancestors => "Breadcrumb chain (ancestor pages)",
            Self::Tree => "Recursive children tree with configurable depth",
            Self::Spaces => "List all accessible spaces",
            Self::History => "Version history (not yet implemented)",
        }
    }

    pub fn parameters(&self) -> &'static [ParameterInfo] {
        match self {
            Self::Get => GET_PARAMS,
            Self::List => LIST_PARAMS,
            Self::Search => SEARCH_PARAMS,
            Self::Children | Self::Ancestors | Self::History => PAGE_ID_PARAMS,
            Self::Tree => TREE_PARAMS,
            Self::Spaces => &[],
        }
    }

    pub fn examples(&self) -> &'static [&'static str] {
        match self {
            Self::Get => &["get(12345) { default }", "get(space=DEV, title=\"My Page\") { full }"],
            Self::List => &[
                "list(space=DEV) { default }",
                "list(space=DEV, label=api) { minimal }",
                "list(space=DEV, title=\"API\") { overview }",
            ],
            Self::Search => &[
                "search(\"type=page AND space=DEV\")",
                "search(\"type=page AND text~\\\"API\\\"\")",
            ],
            Self::Children => &["children(12345) { minimal }"],
            Self::Ancestors => &["ancestors(12345)"],
            Self::Tree => &["tree(12345) { minimal }", "tree(12345, depth=5) { default }"],
            Self::Spaces => &["spaces() { minimal }", "spaces()"],
            Self::History => &[],
        }
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument. Unkeyed arguments are positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub key: Option<String>,
    pub value: String,
}

impl Arg {
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }

    pub fn named(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

/// One operation invocation within a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub operation: Operation,
    pub args: Vec<Arg>,
    /// Field names, presets already expanded. `None` means no `{...}` block.
    pub fields: Option<Vec<String>>,
    /// Name of the preset the field block consisted of, if any.
    pub preset: Option<String>,
}

impl Statement {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            args: Vec::new(),
            fields: None,
            preset: None,
        }
    }

    /// The `index`-th unkeyed argument. Empty values count as absent.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.args
            .iter()
            .filter(|a| a.key.is_none())
            .nth(index)
            .map(|a| a.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// The first argument named `key`. Empty values count as absent.
    pub fn named(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|a| a.key.as_deref() == Some(key))
            .map(|a| a.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Whether the field block names `field` explicitly or through a preset.
    pub fn wants_field(&self, field: &str) -> bool {
        self.fields
            .as_ref()
            .is_some_and(|fields| fields.iter().any(|f| f == field))
    }
}

/// A parsed query: statements in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub statements: Vec<Statement>,
}
