// src/credentials.rs
//! Credential storage keyed by instance URL.
//!
//! The query engine only needs to look credentials up; where they live is
//! up to the store. [`KeyringStore`] keeps them in the OS secret store
//! (macOS Keychain, Windows Credential Manager, Linux keyutils) when the
//! `keyring` feature is on. [`EnvCredentialStore`] reads the process
//! environment and [`FallbackStore`] chains two stores for lookups.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EMAIL_VAR: &str = "CONFLUENCE_EMAIL";
pub const TOKEN_VAR: &str = "CONFLUENCE_API_TOKEN";

/// Service name every keyring entry is filed under.
pub const KEYRING_SERVICE: &str = "confluence-query";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no credentials stored for {0}")]
    NotFound(String),

    #[error("credential store is read-only: {0}")]
    ReadOnly(&'static str),

    #[error("credential store failure: {0}")]
    Backend(String),
}

/// Credentials for one Confluence instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub instance_url: String,
    /// Empty for bearer-token setups.
    pub email: String,
    pub api_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("instance_url", &self.instance_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Opaque key-value store of [`Credentials`], keyed by instance URL.
pub trait CredentialStore: Send + Sync {
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError>;
    fn load(&self, instance_url: &str) -> Result<Credentials, CredentialError>;
    fn delete(&self, instance_url: &str) -> Result<(), CredentialError>;
}

fn store_key(instance_url: &str) -> String {
    instance_url.trim().trim_end_matches('/').to_string()
}

/// Reads `CONFLUENCE_EMAIL` and `CONFLUENCE_API_TOKEN`; the same
/// credentials answer for every instance.
pub struct EnvCredentialStore {
    lookup: fn(&str) -> Option<String>,
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl EnvCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store reading variables through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }
}

impl CredentialStore for EnvCredentialStore {
    fn save(&self, _credentials: &Credentials) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly("environment"))
    }

    fn load(&self, instance_url: &str) -> Result<Credentials, CredentialError> {
        let token = (self.lookup)(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CredentialError::NotFound(store_key(instance_url)))?;

        Ok(Credentials {
            instance_url: store_key(instance_url),
            email: (self.lookup)(EMAIL_VAR)
                .map(|e| e.trim().to_string())
                .unwrap_or_default(),
            api_token: token,
        })
    }

    fn delete(&self, _instance_url: &str) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly("environment"))
    }
}

/// One secret per `(service, account)` pair.
///
/// [`KeyringStore`] talks to the OS through this seam so its encoding and
/// keying can be exercised without a real keyring.
pub trait SecretBackend: Send + Sync {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError>;
    /// `Ok(None)` when no entry exists.
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError>;
    /// `Ok(false)` when there was nothing to delete.
    fn delete(&self, service: &str, account: &str) -> Result<bool, CredentialError>;
}

/// The platform keyring through the `keyring` crate.
#[cfg(feature = "keyring")]
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeyring;

#[cfg(feature = "keyring")]
impl OsKeyring {
    fn entry(service: &str, account: &str) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(service, account).map_err(|e| CredentialError::Backend(e.to_string()))
    }
}

#[cfg(feature = "keyring")]
impl SecretBackend for OsKeyring {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError> {
        Self::entry(service, account)?
            .set_password(secret)
            .map_err(|e| CredentialError::Backend(e.to_string()))
    }

    fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError> {
        match Self::entry(service, account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Backend(e.to_string())),
        }
    }

    fn delete(&self, service: &str, account: &str) -> Result<bool, CredentialError> {
        match Self::entry(service, account)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(CredentialError::Backend(e.to_string())),
        }
    }
}

/// What a keyring entry holds; the instance URL is the entry's account.
#[derive(Serialize, Deserialize)]
struct StoredSecret {
    #[serde(default)]
    email: String,
    api_token: String,
}

/// Credentials in a [`SecretBackend`], one entry per normalized instance URL
/// under the [`KEYRING_SERVICE`] service.
pub struct KeyringStore {
    service: String,
    backend: Box<dyn SecretBackend>,
}

impl KeyringStore {
    /// Store backed by the platform keyring.
    #[cfg(feature = "keyring")]
    pub fn new() -> Self {
        Self::with_backend(OsKeyring)
    }

    pub fn with_backend(backend: impl SecretBackend + 'static) -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            backend: Box::new(backend),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

#[cfg(feature = "keyring")]
impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        if credentials.api_token.trim().is_empty() {
            return Err(CredentialError::Backend("API token is empty".to_string()));
        }
        let secret = serde_json::to_string(&StoredSecret {
            email: credentials.email.trim().to_string(),
            api_token: credentials.api_token.trim().to_string(),
        })
        .map_err(|e| CredentialError::Backend(e.to_string()))?;
        let key = store_key(&credentials.instance_url);
        self.backend.set(&self.service, &key, &secret)?;
        log::debug!("Stored credentials for {} in the keyring", key);
        Ok(())
    }

    fn load(&self, instance_url: &str) -> Result<Credentials, CredentialError> {
        let key = store_key(instance_url);
        let secret = self
            .backend
            .get(&self.service, &key)?
            .ok_or_else(|| CredentialError::NotFound(key.clone()))?;
        let stored: StoredSecret = serde_json::from_str(&secret).map_err(|e| {
            CredentialError::Backend(format!("unreadable keyring entry for {}: {}", key, e))
        })?;
        Ok(Credentials {
            instance_url: key,
            email: stored.email,
            api_token: stored.api_token,
        })
    }

    fn delete(&self, instance_url: &str) -> Result<(), CredentialError> {
        let key = store_key(instance_url);
        if self.backend.delete(&self.service, &key)? {
            Ok(())
        } else {
            Err(CredentialError::NotFound(key))
        }
    }
}

/// Looks credentials up in `primary`, then in `fallback`.
///
/// Writes only ever go to `primary`. A backend failure of `primary` on
/// lookup is logged and treated like a miss.
pub struct FallbackStore {
    primary: Box<dyn CredentialStore>,
    fallback: Box<dyn CredentialStore>,
}

impl FallbackStore {
    pub fn new(
        primary: impl CredentialStore + 'static,
        fallback: impl CredentialStore + 'static,
    ) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }
}

impl CredentialStore for FallbackStore {
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        self.primary.save(credentials)
    }

    fn load(&self, instance_url: &str) -> Result<Credentials, CredentialError> {
        match self.primary.load(instance_url) {
            Ok(credentials) => return Ok(credentials),
            Err(CredentialError::NotFound(_)) => {}
            Err(e) => log::debug!("Primary credential store failed, falling back: {}", e),
        }
        self.fallback.load(instance_url)
    }

    fn delete(&self, instance_url: &str) -> Result<(), CredentialError> {
        self.primary.delete(instance_url)
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let key = store_key(&credentials.instance_url);
        let mut stored = credentials.clone();
        stored.instance_url = key.clone();
        self.entries.insert(key, stored);
        Ok(())
    }

    fn load(&self, instance_url: &str) -> Result<Credentials, CredentialError> {
        let key = store_key(instance_url);
        self.entries
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or(CredentialError::NotFound(key))
    }

    fn delete(&self, instance_url: &str) -> Result<(), CredentialError> {
        let key = store_key(instance_url);
        self.entries
            .remove(&key)
            .map(|_| ())
            .ok_or(CredentialError::NotFound(key))
    }
}
