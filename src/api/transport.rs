// src/api/transport.rs
//! Authenticated HTTP transport shared by both API dialects.
//!
//! This module is a thin wrapper around reqwest. It knows the two path
//! families of a Confluence instance, attaches authentication, retries
//! transient failures and classifies the rest. It does not decode
//! successful bodies; that is the caller's job.

use super::parser::{parse_api_error, parse_body};
use crate::config::ClientConfig;
use crate::constants::{LEGACY_API_PATH, MODERN_API_PATH};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::types::{ApiToken, AuthType, InstanceUrl};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Authentication scheme, fixed when the transport is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Basic base64(email:token)`, used by Cloud API tokens.
    Basic { email: String, token: ApiToken },
    /// `Authorization: Bearer token`, used by Server/DC personal access tokens.
    Bearer(ApiToken),
}

impl Auth {
    /// Pick the scheme from configuration, validating the fields it needs.
    ///
    /// Without an explicit auth type, Basic is used when an email is known
    /// and Bearer otherwise.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        if config.token.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "API token is required".to_string(),
            ));
        }
        let token = ApiToken::new(config.token.as_str())?;
        let email = config.email.trim();

        let auth_type = config.auth_type.unwrap_or(if email.is_empty() {
            AuthType::Bearer
        } else {
            AuthType::Basic
        });

        match auth_type {
            AuthType::Basic if email.is_empty() => Err(AppError::MissingConfiguration(
                "email is required for basic authentication".to_string(),
            )),
            AuthType::Basic => Ok(Self::Basic {
                email: email.to_string(),
                token,
            }),
            AuthType::Bearer => Ok(Self::Bearer(token)),
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::Basic { .. } => AuthType::Basic,
            Self::Bearer(_) => AuthType::Bearer,
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { email, token } => {
                let credentials = format!("{}:{}", email, token.as_str());
                format!("Basic {}", BASE64.encode(credentials))
            }
            Self::Bearer(token) => format!("Bearer {}", token.as_str()),
        }
    }
}

/// HTTP transport bound to one Confluence instance.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    base_url: InstanceUrl,
    auth_header: header::HeaderValue,
    retry: RetryPolicy,
}

impl Transport {
    /// Builds a transport, failing on missing base URL, token, or Basic email.
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        if config.base_url.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "instance URL is required".to_string(),
            ));
        }
        let base_url = InstanceUrl::parse(&config.base_url)?;
        let auth = Auth::from_config(config)?;

        let auth_header = header::HeaderValue::from_str(&auth.header_value()).map_err(|e| {
            AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
        })?;

        if config.tls_skip_verify {
            log::warn!("TLS certificate verification is disabled for {}", base_url);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.tls_skip_verify)
            .build()?;

        log::debug!(
            "Transport ready for {} ({} auth)",
            base_url,
            auth.auth_type()
        );

        Ok(Self {
            client,
            base_url,
            auth_header,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn instance_url(&self) -> &InstanceUrl {
        &self.base_url
    }

    /// Absolute URL in the modern (cursor-paginated) path family.
    pub fn modern_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            MODERN_API_PATH,
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL in the legacy (offset-paginated) path family.
    pub fn legacy_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            LEGACY_API_PATH,
            path.trim_start_matches('/')
        )
    }

    /// Modern-family URL with each segment percent-encoded as one path segment.
    ///
    /// Use this whenever a segment comes from user input (page ids, space
    /// keys, label ids): a `/` inside a segment is encoded, never followed.
    pub fn modern_endpoint(&self, segments: &[&str]) -> Result<String, AppError> {
        self.endpoint(MODERN_API_PATH, segments)
    }

    /// Legacy-family counterpart of [`Transport::modern_endpoint`].
    pub fn legacy_endpoint(&self, segments: &[&str]) -> Result<String, AppError> {
        self.endpoint(LEGACY_API_PATH, segments)
    }

    fn endpoint(&self, family: &str, segments: &[&str]) -> Result<String, AppError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.trim().is_empty() || **s == "." || **s == "..")
        {
            return Err(AppError::Usage(format!("invalid identifier \"{}\"", bad)));
        }
        let base = format!("{}{}", self.base_url, family);
        let mut url = Url::parse(&base).map_err(|e| {
            AppError::MissingConfiguration(format!("invalid endpoint {}: {}", base, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| AppError::MissingConfiguration(format!("invalid endpoint {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Performs a request, retrying 429 and 5xx responses with backoff.
    ///
    /// The body is serialized once and re-sent unchanged on every attempt.
    /// Returns the raw body of the first 2xx response.
    pub async fn request<B>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Vec<u8>, AppError>
    where
        B: Serialize + ?Sized,
    {
        let payload = body.map(serde_json::to_vec).transpose()?;
        let payload = payload.as_deref();
        let method = &method;

        retry_with_backoff(&self.retry, move || {
            self.send_once(method.clone(), url, query, payload)
        })
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, AppError> {
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, self.auth_header.clone())
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(bytes) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(bytes.to_vec());
        }

        let response = request.send().await.map_err(|e| self.classify(url, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.network_error(url, e))?;

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            log::debug!("{} answered {}", url, status);
            Err(parse_api_error(status.as_u16(), &bytes).into())
        }
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> AppError {
        if err.is_connect() || err.is_timeout() {
            self.network_error(url, err)
        } else {
            AppError::Transport(err)
        }
    }

    /// Unreachable host, timeout, or a body cut off mid-read.
    fn network_error(&self, url: &str, err: reqwest::Error) -> AppError {
        AppError::Network {
            message: format!("request to {} failed: {}", url, err),
            base_url: self.base_url.to_string(),
        }
    }

    /// GET a JSON document.
    pub async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.request(Method::GET, url, query, None::<&()>).await?;
        parse_body(&bytes, url)
    }

    /// Send a JSON body and decode the JSON answer.
    pub async fn send_json<T, B>(&self, method: Method, url: &str, body: &B) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.request(method, url, &[], Some(body)).await?;
        parse_body(&bytes, url)
    }

    /// Issue a DELETE and discard whatever body comes back.
    pub async fn delete(&self, url: &str, query: &[(&str, String)]) -> Result<(), AppError> {
        self.request(Method::DELETE, url, query, None::<&()>)
            .await
            .map(|_| ())
    }
}
