// src/api/requests.rs
//! Request bodies for the write endpoints of both dialects.

use serde::Serialize;

/// Storage-format body as both dialects accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageBody {
    pub value: String,
    pub representation: &'static str,
}

impl StorageBody {
    /// `None` for a blank body, which is then left out of the request.
    pub fn from_text(text: Option<&str>) -> Option<Self> {
        text.filter(|t| !t.trim().is_empty()).map(|t| Self {
            value: t.to_string(),
            representation: "storage",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionBump {
    pub number: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    pub prefix: &'static str,
    pub name: String,
}

impl LabelEntry {
    /// Global labels for `names`, de-duplicated in first-seen order.
    pub fn global(names: &[String]) -> Vec<Self> {
        let mut entries: Vec<Self> = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !entries.iter().any(|e| e.name == name) {
                entries.push(Self {
                    prefix: "global",
                    name: name.to_string(),
                });
            }
        }
        entries
    }
}

// Modern dialect

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModernCreatePage {
    pub space_id: String,
    pub status: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<StorageBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModernUpdatePage {
    pub id: String,
    pub status: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<StorageBody>,
    pub version: VersionBump,
}

// Legacy dialect

#[derive(Debug, Clone, Serialize)]
pub struct SpaceRef {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegacyBodyPayload {
    pub storage: StorageBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegacyCreatePage {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub title: String,
    pub space: SpaceRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<ContentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<LegacyBodyPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegacyUpdatePage {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub title: String,
    pub version: VersionBump,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<LegacyBodyPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_bodies_are_dropped() {
        assert_eq!(StorageBody::from_text(None), None);
        assert_eq!(StorageBody::from_text(Some("  ")), None);
        assert_eq!(
            StorageBody::from_text(Some("<p>x</p>")).map(|b| b.value),
            Some("<p>x</p>".to_string())
        );
    }

    #[test]
    fn labels_are_deduplicated_in_order() {
        let names = vec!["b".to_string(), "a".to_string(), "b".to_string(), " ".to_string()];
        let entries = LabelEntry::global(&names);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn legacy_create_omits_empty_parts() {
        let request = LegacyCreatePage {
            content_type: "page",
            title: "New".into(),
            space: SpaceRef { key: "DEV".into() },
            ancestors: vec![],
            body: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "page", "title": "New", "space": {"key": "DEV"}})
        );
    }
}
