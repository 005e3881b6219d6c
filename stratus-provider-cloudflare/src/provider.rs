//! Cloudflare Provider implementation
//!
//! This module contains the provider that routes each operation to the
//! reconciler for its resource type.

use std::sync::Arc;

use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::reconciler::Reconciler;
use stratus_core::resource::{Resource, ResourceId, State};

use crate::client::{CloudflareApi, CloudflareClient};
use crate::config::ProviderConfig;
use crate::resources::{
    HYPERDRIVE_CONFIG, HyperdriveConfigHandler, PAGES_PROJECT, PagesProjectHandler,
};

/// Cloudflare Provider
pub struct CloudflareProvider {
    hyperdrive: Reconciler<HyperdriveConfigHandler<dyn CloudflareApi>>,
    pages: Reconciler<PagesProjectHandler<dyn CloudflareApi>>,
}

impl CloudflareProvider {
    /// Create a provider talking to the Cloudflare API over HTTP
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        log::debug!("Creating Cloudflare provider with {:?}", config);
        let client = CloudflareClient::new(config)
            .map_err(|e| e.into_provider_error("failed to create Cloudflare client"))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create a provider on top of any API client implementation
    pub fn with_client(client: Arc<dyn CloudflareApi>) -> Self {
        Self {
            hyperdrive: Reconciler::new(HyperdriveConfigHandler::new(client.clone())),
            pages: Reconciler::new(PagesProjectHandler::new(client)),
        }
    }

    pub fn validate_resource(&self, resource: &Resource) -> ProviderResult<()> {
        match resource.id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.validate(resource),
            PAGES_PROJECT => self.pages.validate(resource),
            other => Err(unsupported(other, &resource.id)),
        }
    }

    pub async fn read_resource(
        &self,
        id: &ResourceId,
        scope: &str,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        match id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.read(id, scope, identifier).await,
            PAGES_PROJECT => self.pages.read(id, scope, identifier).await,
            other => Err(unsupported(other, id)),
        }
    }

    pub async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        match resource.id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.create(resource).await,
            PAGES_PROJECT => self.pages.create(resource).await,
            other => Err(unsupported(other, &resource.id)),
        }
    }

    pub async fn update_resource(&self, from: &State, to: &Resource) -> ProviderResult<State> {
        match to.id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.update(from, to).await,
            PAGES_PROJECT => self.pages.update(from, to).await,
            other => Err(unsupported(other, &to.id)),
        }
    }

    pub async fn delete_resource(&self, current: &State) -> ProviderResult<State> {
        match current.id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.delete(current).await,
            PAGES_PROJECT => self.pages.delete(current).await,
            other => Err(unsupported(other, &current.id)),
        }
    }

    pub async fn import_resource(&self, id: &ResourceId, import_id: &str) -> ProviderResult<State> {
        match id.resource_type.as_str() {
            HYPERDRIVE_CONFIG => self.hyperdrive.import(id, import_id).await,
            PAGES_PROJECT => self.pages.import(id, import_id).await,
            other => Err(unsupported(other, id)),
        }
    }
}

fn unsupported(resource_type: &str, id: &ResourceId) -> ProviderError {
    ProviderError::unsupported_resource(resource_type).for_resource(id.clone())
}
