//! Health check
//!
//! Runs the same credential resolution as a search (including its logging and
//! I/O) and reports what it found. The API key is never echoed.

use crate::credentials::{
    CredentialResolver, API_KEY_VAR, CREDENTIALS_PATH_VAR, SEARCH_ENGINE_ID_VAR,
};
use crate::types::{EnvironmentSnapshot, HealthState, HealthStatus};

/// Placeholder reported in place of a configured API key
pub const REDACTED: &str = "***";

pub async fn check(resolver: &CredentialResolver) -> HealthStatus {
    let credential = resolver.resolve().await;
    let env = resolver.env();

    let search_engine_id = env.var(SEARCH_ENGINE_ID_VAR);

    HealthStatus {
        status: if credential.is_some() {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        },
        credentials_available: credential.is_some(),
        search_engine_id_set: search_engine_id.as_deref().is_some_and(|id| !id.is_empty()),
        auth_method: credential.as_ref().map(|c| c.method().to_string()),
        environment_variables: EnvironmentSnapshot {
            application_credentials: env.var(CREDENTIALS_PATH_VAR),
            api_key: env.non_empty(API_KEY_VAR).map(|_| REDACTED.to_string()),
            search_engine_id,
        },
    }
}
