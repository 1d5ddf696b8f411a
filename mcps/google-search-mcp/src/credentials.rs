//! Credential resolution
//!
//! Credentials are resolved fresh on every tool call, in this order:
//! 1. Service-account file named by `GOOGLE_APPLICATION_CREDENTIALS` (if the file exists)
//! 2. API key from `GOOGLE_API_KEY` (if non-empty)
//! 3. Application default credentials discovered by `gcp_auth`
//!
//! The environment and the Google auth library are reached through the
//! [`EnvSource`] and [`CredentialLoader`] traits so the resolver can be
//! exercised without touching process state.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CREDENTIALS_PATH_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const SEARCH_ENGINE_ID_VAR: &str = "GOOGLE_CSE_ID";

// ============================================================================
// Environment
// ============================================================================

/// Read-only view of environment variables
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`EnvSource::var`], but treats an empty value as unset
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// ============================================================================
// Credential handles
// ============================================================================

/// Service-account key file that `gcp_auth` accepted
#[derive(Debug, Clone)]
pub struct ServiceAccountCredential {
    path: PathBuf,
}

impl ServiceAccountCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Platform credentials (gcloud ADC, metadata server, ...) found by `gcp_auth`
#[derive(Debug, Clone, Copy)]
pub struct DefaultCredential;

/// A resolved credential
#[derive(Clone)]
pub enum Credential {
    ServiceAccount(ServiceAccountCredential),
    ApiKey(String),
    Default(DefaultCredential),
}

impl Credential {
    /// Short name of the resolution path that produced this credential
    pub fn method(&self) -> &'static str {
        match self {
            Credential::ServiceAccount(_) => "service_account",
            Credential::ApiKey(_) => "api_key",
            Credential::Default(_) => "default",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ServiceAccount(sa) => f
                .debug_tuple("ServiceAccount")
                .field(&sa.path.display())
                .finish(),
            Credential::ApiKey(_) => f.debug_tuple("ApiKey").field(&"***").finish(),
            Credential::Default(_) => f.write_str("Default"),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Loads token-based credentials
#[async_trait]
pub trait CredentialLoader: Send + Sync {
    /// Load a service-account credential from a key file
    async fn load_service_account(&self, path: &Path) -> Result<ServiceAccountCredential>;

    /// Discover platform default credentials; an error means none were found
    async fn discover_default(&self) -> Result<DefaultCredential>;
}

/// [`CredentialLoader`] backed by the `gcp_auth` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GcpAuthLoader;

#[async_trait]
impl CredentialLoader for GcpAuthLoader {
    async fn load_service_account(&self, path: &Path) -> Result<ServiceAccountCredential> {
        gcp_auth::CustomServiceAccount::from_file(path).map_err(|e| anyhow!("{e}"))?;
        Ok(ServiceAccountCredential::new(path))
    }

    async fn discover_default(&self) -> Result<DefaultCredential> {
        gcp_auth::provider().await.map_err(|e| anyhow!("{e}"))?;
        Ok(DefaultCredential)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves credentials from the environment on every call
///
/// Holds no mutable state, so one resolver can serve concurrent calls.
#[derive(Clone)]
pub struct CredentialResolver {
    env: Arc<dyn EnvSource>,
    loader: Arc<dyn CredentialLoader>,
}

impl CredentialResolver {
    pub fn new(env: Arc<dyn EnvSource>, loader: Arc<dyn CredentialLoader>) -> Self {
        Self { env, loader }
    }

    /// Resolver over the process environment and `gcp_auth`
    pub fn from_process() -> Self {
        Self::new(Arc::new(ProcessEnv), Arc::new(GcpAuthLoader))
    }

    pub fn env(&self) -> &Arc<dyn EnvSource> {
        &self.env
    }

    /// Resolve a credential, or `None` when no source is configured
    pub async fn resolve(&self) -> Option<Credential> {
        if let Some(path) = self.env.non_empty(CREDENTIALS_PATH_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                match self.loader.load_service_account(&path).await {
                    Ok(credential) => {
                        tracing::debug!("Using service account from {}", path.display());
                        return Some(Credential::ServiceAccount(credential));
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load service account from {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }

        if let Some(key) = self.env.non_empty(API_KEY_VAR) {
            tracing::debug!("Using API key from {}", API_KEY_VAR);
            return Some(Credential::ApiKey(key));
        }

        match self.loader.discover_default().await {
            Ok(credential) => {
                tracing::debug!("Using application default credentials");
                Some(Credential::Default(credential))
            }
            Err(e) => {
                tracing::error!(
                    "No Google credentials found. Please set {} or {} ({})",
                    CREDENTIALS_PATH_VAR,
                    API_KEY_VAR,
                    e
                );
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn key_file() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[tokio::test]
    async fn test_service_account_wins_over_api_key() {
        let file = key_file();
        let path = file.path().to_str().unwrap();
        let resolver = resolver(
            &[(CREDENTIALS_PATH_VAR, path), (API_KEY_VAR, "key-123")],
            FakeLoader {
                service_account_ok: true,
                default_ok: true,
            },
        );

        match resolver.resolve().await {
            Some(Credential::ServiceAccount(sa)) => assert_eq!(sa.path(), file.path()),
            other => panic!("expected service account, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_file_falls_through_to_api_key() {
        let resolver = resolver(
            &[
                (CREDENTIALS_PATH_VAR, "/nonexistent/sa.json"),
                (API_KEY_VAR, "key-123"),
            ],
            FakeLoader {
                service_account_ok: true,
                default_ok: true,
            },
        );

        assert!(matches!(
            resolver.resolve().await,
            Some(Credential::ApiKey(k)) if k == "key-123"
        ));
    }

    #[tokio::test]
    async fn test_bad_key_file_falls_through_to_api_key() {
        let file = key_file();
        let resolver = resolver(
            &[
                (CREDENTIALS_PATH_VAR, file.path().to_str().unwrap()),
                (API_KEY_VAR, "key-123"),
            ],
            FakeLoader::none(),
        );

        assert!(matches!(resolver.resolve().await, Some(Credential::ApiKey(_))));
    }

    #[tokio::test]
    async fn test_api_key_wins_over_default() {
        let resolver = resolver(
            &[(API_KEY_VAR, "key-123")],
            FakeLoader {
                service_account_ok: false,
                default_ok: true,
            },
        );

        assert!(matches!(resolver.resolve().await, Some(Credential::ApiKey(_))));
    }

    #[tokio::test]
    async fn test_empty_api_key_is_ignored() {
        let resolver = resolver(
            &[(API_KEY_VAR, "")],
            FakeLoader {
                service_account_ok: false,
                default_ok: true,
            },
        );

        assert!(matches!(resolver.resolve().await, Some(Credential::Default(_))));
    }

    #[tokio::test]
    async fn test_nothing_configured_resolves_to_none() {
        let resolver = resolver(&[], FakeLoader::none());
        assert!(resolver.resolve().await.is_none());
    }

    #[tokio::test]
    async fn test_default_discovery_when_nothing_else_set() {
        let resolver = resolver(
            &[],
            FakeLoader {
                service_account_ok: true,
                default_ok: true,
            },
        );

        let credential = resolver.resolve().await.unwrap();
        assert!(matches!(credential, Credential::Default(_)));
        assert_eq!(credential.method(), "default");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let credential = Credential::ApiKey("super-secret".into());
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret"));
        assert_eq!(credential.method(), "api_key");
    }
}
