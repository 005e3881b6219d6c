//! Stratus Cloudflare Provider
//!
//! Manages Cloudflare Hyperdrive configs and Pages projects through the
//! Cloudflare v4 API.
//!
//! ## Module Structure
//!
//! - `client` - API client traits, models and the HTTP implementation
//! - `config` - Provider configuration (token, base URL, timeout)
//! - `resources` - Resource type definitions and handlers
//! - `provider` - CloudflareProvider implementation
//! - `schemas` - Resource schemas

pub mod client;
pub mod config;
pub mod provider;
pub mod resources;
pub mod schemas;

// Re-export main types
pub use client::{ApiError, CloudflareApi, CloudflareClient};
pub use config::{ConfigError, ProviderConfig};
pub use provider::CloudflareProvider;

use stratus_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use stratus_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for CloudflareProvider {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn validate(&self, resource: &Resource) -> ProviderResult<()> {
        self.validate_resource(resource)
    }

    fn read(
        &self,
        id: &ResourceId,
        scope: &str,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let scope = scope.to_string();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, &scope, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(&self, from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&from, &to).await })
    }

    fn delete(&self, current: &State) -> BoxFuture<'_, ProviderResult<State>> {
        let current = current.clone();
        Box::pin(async move { self.delete_resource(&current).await })
    }

    fn import(&self, id: &ResourceId, import_id: &str) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let import_id = import_id.to_string();
        Box::pin(async move { self.import_resource(&id, &import_id).await })
    }
}
