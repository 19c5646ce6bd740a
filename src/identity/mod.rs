//! Visitor identity resolution.
//!
//! Resolves the public IP of the running host and derives a geolocation and
//! network profile from it. The two lookups are strictly sequential since the
//! second needs the address produced by the first.

mod lookup;
mod types;

use async_trait::async_trait;

use crate::error_handling::NotifyError;

pub use lookup::HttpIdentityResolver;
pub use types::{Connection, Flag, GeoProfile, Timezone};

/// Resolves the public IP and its geolocation profile.
///
/// Either lookup failing fails the whole resolution; no partial profile is
/// produced.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves the public IP address.
    async fn resolve_ip(&self) -> Result<String, NotifyError>;

    /// Resolves the geolocation/network profile of `ip`.
    async fn resolve_geo(&self, ip: &str) -> Result<GeoProfile, NotifyError>;

    /// Runs both lookups in order.
    async fn resolve(&self) -> Result<GeoProfile, NotifyError> {
        let ip = self.resolve_ip().await?;
        self.resolve_geo(&ip).await
    }
}
