//! Canonical Confluence entities.
//!
//! Both API dialects are normalized into these shapes by
//! [`crate::api::responses`]; nothing above the API layer ever sees a
//! dialect-specific type. All entities are ephemeral request/response
//! values; the remote instance owns durable state.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes an explicit JSON `null` as the type's default, like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A Confluence page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    /// `current`, `draft`, `trashed`, ...
    pub status: String,
    pub title: String,
    pub space_id: String,
    /// Only the legacy dialect reports the key alongside the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_key: Option<String>,
    pub parent_id: String,
    pub author_id: String,
    pub created_at: String,
    pub version: Option<Version>,
    pub body: Option<BodyContent>,
    pub labels: Option<Vec<Label>>,
    #[serde(rename = "webURL")]
    pub web_url: String,
}

impl Page {
    /// Current version number, or 0 for a page that reported none.
    pub fn version_number(&self) -> u32 {
        self.version.as_ref().map(|v| v.number).unwrap_or(0)
    }

    /// Label names in the order the API returned them.
    pub fn label_names(&self) -> Option<Vec<String>> {
        self.labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
    }
}

/// A page version. Numbers start at 1 and grow by one per update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_id: String,
}

/// Page body in one representation (`storage` unless stated otherwise).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub representation: String,
}

/// A Confluence space. `key` is the durable human identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// `global` or `personal`
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub space_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub homepage_id: String,
}

/// A page label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// `global`, `my` or `team`
    #[serde(default, deserialize_with = "null_as_default")]
    pub prefix: String,
}

/// One link of a page's breadcrumb, ordered root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestor {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// Result set of a CQL search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
    pub start: usize,
    pub limit: usize,
    pub size: usize,
    pub total_size: usize,
    pub cql_query: String,
}

/// A single search hit with its highlighted excerpt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub content: Option<ContentSummary>,
    /// Title of the space the hit lives in, when reported.
    pub container: Option<String>,
}

/// The content object a search hit points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    /// `page`, `blogpost`, `comment`, ...
    #[serde(rename = "type")]
    pub content_type: String,
    pub status: String,
    pub title: String,
    pub space_key: Option<String>,
}

/// Input for creating a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPage {
    pub space_key: String,
    pub title: String,
    /// Storage-format body; empty means no body is sent.
    pub body: String,
    pub parent_id: Option<String>,
}

/// Input for updating a page. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUpdate {
    /// Blank keeps the current title.
    pub title: Option<String>,
    /// Storage-format body; blank leaves the body untouched.
    pub body: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_number_defaults_to_zero() {
        let page = Page::default();
        assert_eq!(page.version_number(), 0);

        let page = Page {
            version: Some(Version {
                number: 7,
                ..Version::default()
            }),
            ..Page::default()
        };
        assert_eq!(page.version_number(), 7);
    }

    #[test]
    fn space_serializes_type_field() {
        let space = Space {
            id: "1".into(),
            key: "DEV".into(),
            space_type: "global".into(),
            ..Space::default()
        };
        let json = serde_json::to_value(&space).unwrap();
        assert_eq!(json["type"], "global");
        assert_eq!(json["homepageId"], "");
    }

    #[test]
    fn space_accepts_null_homepage() {
        let space: Space = serde_json::from_str(
            r#"{"id": "98304", "key": "DEV", "name": "Development", "type": "global",
                "status": "current", "homepageId": null}"#,
        )
        .unwrap();
        assert_eq!(space.homepage_id, "");
        assert_eq!(space.name, "Development");
    }
}
