//! Bearer token verification.
//!
//! The hosted auth service owns users and sessions; all this side needs is
//! "token in, user id out".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::constants::network::AUTH_TIMEOUT_SECS;
use crate::types::{DrillError, Result};

#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// Resolve a bearer token to the caller's user id
    async fn verify(&self, token: &str) -> Result<String>;
}

pub type SharedVerifier = Arc<dyn AuthVerifier>;

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DrillError::Auth("Missing authorization header".to_string()))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| DrillError::Auth("Malformed authorization header".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(DrillError::Auth(
            "Malformed authorization header".to_string(),
        ));
    }
    Ok(token.trim())
}

/// Verifies tokens against a Supabase-compatible `GET /auth/v1/user`
pub struct SupabaseAuthVerifier {
    url: Option<String>,
    anon_key: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for SupabaseAuthVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseAuthVerifier")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

impl SupabaseAuthVerifier {
    /// Missing url or key is reported per request, not here
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS))
            .build()
            .map_err(|e| DrillError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: config
                .url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            anon_key: config.anon_key.clone().map(SecretString::from),
            client,
        })
    }

    fn endpoint(&self) -> Result<(&str, &SecretString)> {
        match (self.url.as_deref(), self.anon_key.as_ref()) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(DrillError::Config(
                "Auth service not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY".to_string(),
            )),
        }
    }
}

#[async_trait]
impl AuthVerifier for SupabaseAuthVerifier {
    async fn verify(&self, token: &str) -> Result<String> {
        let (url, anon_key) = self.endpoint()?;

        let response = self
            .client
            .get(format!("{}/auth/v1/user", url))
            .header("apikey", anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!("Auth service unreachable: {}", e);
                DrillError::Auth("Unable to verify token".to_string())
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Token rejected");
            return Err(DrillError::Auth("Invalid or expired token".to_string()));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|_| DrillError::Auth("Invalid auth service response".to_string()))?;

        if user.id.trim().is_empty() {
            return Err(DrillError::Auth("Invalid or expired token".to_string()));
        }
        Ok(user.id)
    }
}
