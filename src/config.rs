// src/config.rs
use crate::constants::REQUEST_TIMEOUT;
use crate::credentials::{CredentialError, CredentialStore};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::types::{AuthType, InstanceType, InstanceUrl};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "confluence-query";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Parsed command-line input.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Query to run, e.g. 'get(12345){overview}' or 'spaces(); children(12345)'
    #[arg(required_unless_present_any = ["schema", "login", "logout"])]
    pub query: Option<String>,

    /// Confluence instance URL (Cloud URLs include /wiki)
    #[arg(long)]
    pub url: Option<String>,

    /// Force the API dialect instead of detecting it from the URL
    #[arg(long, value_enum)]
    pub instance_type: Option<InstanceType>,

    /// Authentication scheme (defaults to basic when an email is configured)
    #[arg(long, value_enum)]
    pub auth_type: Option<AuthType>,

    /// Skip TLS certificate verification
    #[arg(long, default_value_t = false)]
    pub insecure: bool,

    /// Path to the config file (defaults to ~/.config/confluence-query/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Print the operations, fields and presets the query language knows, then exit
    #[arg(long, default_value_t = false)]
    pub schema: bool,

    /// Save CONFLUENCE_EMAIL and CONFLUENCE_API_TOKEN to the OS keyring for the instance, then exit
    #[arg(long, default_value_t = false, conflicts_with = "logout")]
    pub login: bool,

    /// Remove the instance's credentials from the OS keyring, then exit
    #[arg(long, default_value_t = false)]
    pub logout: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Persisted local settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_space: Option<String>,
    pub tls_skip_verify: bool,
}

/// Reads and writes [`LocalConfig`] as YAML.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user config file.
    pub fn new() -> Result<Self, AppError> {
        let dir = dirs::config_dir().ok_or_else(|| {
            AppError::MissingConfiguration("could not determine the user config directory".into())
        })?;
        Ok(Self::with_path(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings; a missing file yields defaults.
    pub fn get_config(&self) -> Result<LocalConfig, AppError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}", self.path.display());
                return Ok(LocalConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(LocalConfig::default());
        }
        serde_yaml::from_str(&text).map_err(|source| AppError::ConfigFile {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save_config(&self, config: &LocalConfig) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_yaml::to_string(config).map_err(|source| AppError::ConfigFile {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut LocalConfig)) -> Result<(), AppError> {
        let mut config = self.get_config()?;
        change(&mut config);
        self.save_config(&config)
    }

    pub fn set_instance_url(&self, url: &str) -> Result<(), AppError> {
        let url = InstanceUrl::parse(url)?;
        self.update(|c| c.instance_url = Some(url.to_string()))
    }

    pub fn set_instance_type(&self, instance_type: InstanceType) -> Result<(), AppError> {
        self.update(|c| c.instance_type = Some(instance_type))
    }

    pub fn set_auth_type(&self, auth_type: AuthType) -> Result<(), AppError> {
        self.update(|c| c.auth_type = Some(auth_type))
    }

    pub fn set_active_space(&self, space_key: &str) -> Result<(), AppError> {
        let key = space_key.trim();
        self.update(|c| c.active_space = (!key.is_empty()).then(|| key.to_string()))
    }

    pub fn set_tls_skip_verify(&self, skip: bool) -> Result<(), AppError> {
        self.update(|c| c.tls_skip_verify = skip)
    }
}

/// Everything needed to build a client for one instance.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Empty for bearer-token setups.
    pub email: String,
    pub token: String,
    /// `None` detects the dialect from the URL.
    pub instance_type: Option<InstanceType>,
    /// `None` picks Basic when an email is present, else Bearer.
    pub auth_type: Option<AuthType>,
    pub tls_skip_verify: bool,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("instance_type", &self.instance_type)
            .field("auth_type", &self.auth_type)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            token: token.into(),
            instance_type: None,
            auth_type: None,
            tls_skip_verify: false,
            timeout: REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_instance_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = Some(instance_type);
        self
    }

    pub fn with_auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = Some(auth_type);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls_skip_verify(mut self, skip: bool) -> Self {
        self.tls_skip_verify = skip;
        self
    }

    /// Instance URL from the command line, else the config file.
    pub fn instance_url(cli: &CommandLineInput, local: &LocalConfig) -> Result<InstanceUrl, AppError> {
        let raw_url = cli
            .url
            .as_deref()
            .or(local.instance_url.as_deref())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "no instance URL; pass --url or set instance_url in the config file".into(),
                )
            })?;
        Ok(InstanceUrl::parse(raw_url)?)
    }

    /// Merges command line, config file and stored credentials.
    ///
    /// Flags win over the file. Settings neither source gives are detected:
    /// the dialect from the URL host, the auth scheme from whether an email
    /// is known.
    pub fn resolve(
        cli: &CommandLineInput,
        local: &LocalConfig,
        store: &dyn CredentialStore,
    ) -> Result<Self, AppError> {
        let url = Self::instance_url(cli, local)?;

        let credentials = store.load(url.as_str()).map_err(|e| match e {
            CredentialError::NotFound(key) => AppError::MissingConfiguration(format!(
                "no credentials for {}; run with --login or set {} (and {} for basic auth)",
                key,
                crate::credentials::TOKEN_VAR,
                crate::credentials::EMAIL_VAR
            )),
            other => AppError::Credentials(other),
        })?;

        let instance_type = cli
            .instance_type
            .or(local.instance_type)
            .unwrap_or_else(|| InstanceType::detect(&url));

        Ok(Self {
            base_url: url.to_string(),
            email: credentials.email,
            token: credentials.api_token,
            instance_type: Some(instance_type),
            auth_type: cli.auth_type.or(local.auth_type),
            tls_skip_verify: cli.insecure || local.tls_skip_verify,
            timeout: REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        })
    }
}
