// src/query/schema.rs
//! Field registry and projection.
//!
//! A [`FieldSchema`] maps field names to extraction functions over an
//! entity and keeps named presets of fields. The parser validates field
//! blocks against it; the executor projects entities through it. One
//! schema is built up front and shared; nothing is registered globally.

use crate::model::Page;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Computes one field's value from an entity.
pub type Extractor<E> = fn(&E) -> Value;

pub struct FieldSchema<E> {
    fields: IndexMap<&'static str, Extractor<E>>,
    presets: IndexMap<&'static str, Vec<&'static str>>,
    default_preset: &'static str,
}

impl<E> FieldSchema<E> {
    pub fn new(default_preset: &'static str) -> Self {
        Self {
            fields: IndexMap::new(),
            presets: IndexMap::new(),
            default_preset,
        }
    }

    pub fn field(mut self, name: &'static str, extractor: Extractor<E>) -> Self {
        self.fields.insert(name, extractor);
        self
    }

    pub fn preset(mut self, name: &'static str, fields: &[&'static str]) -> Self {
        self.presets.insert(name, fields.to_vec());
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn preset_fields(&self, name: &str) -> Option<&[&'static str]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn default_preset(&self) -> &'static str {
        self.default_preset
    }

    /// Fields used when a statement has no field block.
    pub fn default_fields(&self) -> &[&'static str] {
        self.preset_fields(self.default_preset).unwrap_or(&[])
    }

    /// Builds an object with exactly the requested fields, in order.
    ///
    /// `None` fields means the default preset. A missing entity yields
    /// `null` for every field; unknown names are skipped, since the parser
    /// has already rejected them.
    pub fn project(&self, entity: Option<&E>, fields: Option<&[String]>) -> Map<String, Value> {
        let mut out = Map::new();
        let mut put = |name: &str| {
            if let Some(extract) = self.fields.get(name) {
                let value = entity.map(extract).unwrap_or(Value::Null);
                out.insert(name.to_string(), value);
            }
        };

        match fields {
            Some(names) => names.iter().for_each(|n| put(n.as_str())),
            None => self.default_fields().iter().for_each(|n| put(*n)),
        }
        out
    }

    /// Known fields and presets as JSON.
    pub fn describe(&self) -> Value {
        let presets: Map<String, Value> = self
            .presets
            .iter()
            .map(|(name, fields)| (name.to_string(), json!(fields)))
            .collect();

        json!({
            "fields": self.field_names().collect::<Vec<_>>(),
            "presets": presets,
            "defaultPreset": self.default_preset,
        })
    }
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

/// The schema every page-returning operation projects through.
pub fn page_schema() -> FieldSchema<Page> {
    FieldSchema::<Page>::new("default")
        .field("id", |p| text(&p.id))
        .field("title", |p| text(&p.title))
        .field("status", |p| text(&p.status))
        .field("spaceId", |p| text(&p.space_id))
        // Modern pages only carry the space id.
        .field("spaceKey", |p| text(p.space_key.as_deref().unwrap_or(&p.space_id)))
        .field("version", |p| json!(p.version.as_ref().map(|v| v.number)))
        .field("body", |p| json!(p.body.as_ref().map(|b| &b.value)))
        .field("labels", |p| json!(p.label_names()))
        .field("created", |p| text(&p.created_at))
        // Not part of a single page fetch.
        .field("updated", |_| Value::Null)
        .field("author", |p| text(&p.author_id))
        .field("url", |p| text(&p.web_url))
        .field("parentId", |p| text(&p.parent_id))
        .field("ancestors", |_| Value::Null)
        // Space fields, accepted so `spaces(){...}` blocks validate.
        .field("key", |_| Value::Null)
        .field("name", |_| Value::Null)
        .field("type", |_| Value::Null)
        .field("homepageId", |_| Value::Null)
        .preset("minimal", &["id", "title", "status"])
        .preset(
            "default",
            &["id", "title", "status", "spaceKey", "version", "url"],
        )
        .preset(
            "overview",
            &[
                "id", "title", "status", "spaceKey", "version", "ancestors", "labels", "url",
            ],
        )
        .preset(
            "full",
            &[
                "id", "title", "status", "spaceKey", "version", "ancestors", "labels", "body",
                "created", "updated", "author", "url",
            ],
        )
}
