//! HTTP-backed identity resolution.
//!
//! Resolves the public IP through an ipify-compatible endpoint and the
//! geolocation profile through an ipwho.is-compatible endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::types::{GeoProfile, IpResponse};
use super::IdentityResolver;
use crate::error_handling::{NetworkFailure, NotifyError};
use crate::http::get_json;
use crate::NotifierConfig;

/// Identity resolver that talks to the public IP and geolocation services.
#[derive(Debug, Clone)]
pub struct HttpIdentityResolver {
    client: Arc<reqwest::Client>,
    ip_endpoint: String,
    geo_endpoint: String,
}

impl HttpIdentityResolver {
    /// Creates a resolver for the given endpoints.
    pub fn new(
        client: Arc<reqwest::Client>,
        ip_endpoint: impl Into<String>,
        geo_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ip_endpoint: ip_endpoint.into(),
            geo_endpoint: geo_endpoint.into(),
        }
    }

    /// Creates a resolver using the endpoints of `config`.
    pub fn from_config(client: Arc<reqwest::Client>, config: &NotifierConfig) -> Self {
        Self::new(client, &config.ip_endpoint, &config.geo_endpoint)
    }

    fn geo_url(&self, ip: &str) -> String {
        format!("{}/{}", self.geo_endpoint.trim_end_matches('/'), ip)
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve_ip(&self) -> Result<String, NotifyError> {
        let response: IpResponse = get_json(&self.client, &self.ip_endpoint)
            .await
            .map_err(NotifyError::IpLookup)?;

        let ip = response.ip.trim();
        if ip.is_empty() {
            return Err(NotifyError::IpLookup(NetworkFailure::decode(
                "IP service returned an empty address",
            )));
        }
        debug!("Resolved public IP {}", ip);
        Ok(ip.to_string())
    }

    async fn resolve_geo(&self, ip: &str) -> Result<GeoProfile, NotifyError> {
        let profile: GeoProfile = get_json(&self.client, &self.geo_url(ip))
            .await
            .map_err(NotifyError::GeoLookup)?;

        if profile.is_rejected() {
            return Err(NotifyError::GeoRejected {
                ip: ip.to_string(),
                message: profile
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        debug!(
            "Resolved geolocation for {}: {}",
            ip,
            profile.country.as_deref().unwrap_or("unknown country")
        );
        Ok(profile)
    }
}
