//! Shared helpers for tests that talk to a mock Confluence.
#![allow(dead_code)]

use confluence_query::{connect, ClientConfig, ConfluenceApi, InstanceType, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const EMAIL: &str = "me@acme.com";
pub const TOKEN: &str = "secret";
/// `base64("me@acme.com:secret")`
pub const BASIC_AUTH: &str = "Basic bWVAYWNtZS5jb206c2VjcmV0";

pub const CLOUD_PAGE: &str = include_str!("../fixtures/confluence/cloud_page.json");
pub const SERVER_CONTENT: &str = include_str!("../fixtures/confluence/server_content.json");
pub const SEARCH_RESPONSE: &str = include_str!("../fixtures/confluence/search_response.json");

/// Retry policy with the production shape but millisecond pauses.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

/// Cloud instances live under `/wiki`.
pub fn cloud_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}/wiki", server.uri()), EMAIL, TOKEN)
        .with_instance_type(InstanceType::Cloud)
        .with_retry(fast_retry())
}

pub fn server_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), EMAIL, TOKEN)
        .with_instance_type(InstanceType::Server)
        .with_retry(fast_retry())
}

pub fn cloud_client(server: &MockServer) -> Arc<dyn ConfluenceApi> {
    connect(&cloud_config(server)).expect("cloud client")
}

pub fn server_client(server: &MockServer) -> Arc<dyn ConfluenceApi> {
    connect(&server_config(server)).expect("server client")
}

pub fn json(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).expect("fixture is valid JSON")
}
