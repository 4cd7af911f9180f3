// src/lib.rs
//! confluence-query library: a compact query language over the Confluence REST API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ApiError`, `ParseError`, `ValidationError`
//! - **Configuration**: `ClientConfig`, `ConfigManager`, `LocalConfig`, `RetryPolicy`
//! - **Credentials**: `CredentialStore`, `KeyringStore`, `EnvCredentialStore`, `FallbackStore`
//! - **Domain model**: `Page`, `Space`, `Label`, `Ancestor`, `Version`, `SearchResult`
//! - **API client**: `ConfluenceApi`, `CloudApi`, `ServerApi`, `connect`
//! - **Query engine**: `parse_query`, `FieldSchema`, `Executor`

pub mod api;
mod config;
mod constants;
mod credentials;
mod error;
mod error_recovery;
pub mod model;
pub mod query;
mod types;

// --- Error Handling ---
pub use crate::error::{ApiError, ApiErrorCode, AppError, Result};
pub use crate::query::ParseError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, CommandLineInput, ConfigManager, LocalConfig};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Credentials ---
pub use crate::credentials::{
    CredentialError, CredentialStore, Credentials, EnvCredentialStore, FallbackStore,
    KeyringStore, MemoryCredentialStore, SecretBackend, EMAIL_VAR, KEYRING_SERVICE, TOKEN_VAR,
};
#[cfg(feature = "keyring")]
pub use crate::credentials::OsKeyring;

// --- Domain Model ---
pub use crate::model::{
    Ancestor, BodyContent, ContentSummary, Label, NewPage, Page, PageUpdate, SearchHit,
    SearchResult, Space, Version,
};

// --- Domain Types ---
pub use crate::types::{ApiToken, AuthType, InstanceType, InstanceUrl};

// --- API Client ---
pub use crate::api::{connect, CloudApi, ConfluenceApi, ServerApi, Transport};

// --- Query Engine ---
pub use crate::query::{
    describe_language, page_schema, parse_query, Executor, FieldSchema, Operation, Query,
    Statement,
};
