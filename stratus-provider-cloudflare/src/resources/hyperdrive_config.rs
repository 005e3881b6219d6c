//! Hyperdrive config handler

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stratus_core::provider::ProviderResult;
use stratus_core::reconciler::ResourceHandler;
use stratus_core::resource::{Attributes, Resource};
use stratus_core::schema::ResourceSchema;

use super::{HYPERDRIVE_CONFIG, attributes_from_model, spec_from_resource};
use crate::client::hyperdrive::{
    CreateHyperdriveConfigParams, HyperdriveCaching, HyperdriveConfig, HyperdriveOrigin,
    UpdateHyperdriveConfigParams,
};
use crate::client::HyperdriveApi;
use crate::schemas;

/// Desired attributes of a Hyperdrive config
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
struct HyperdriveConfigSpec {
    name: Option<String>,
    password: Option<String>,
    origin: Option<HyperdriveOrigin>,
    caching: Option<HyperdriveCaching>,
}

impl HyperdriveConfigSpec {
    /// Origin as sent on the wire, where the password lives
    fn origin(&self) -> Option<HyperdriveOrigin> {
        let mut origin = self.origin.clone();
        if let Some(password) = &self.password {
            origin.get_or_insert_with(Default::default).password = Some(password.clone());
        }
        origin
    }

    fn create_params(&self) -> CreateHyperdriveConfigParams {
        CreateHyperdriveConfigParams {
            name: self.name.clone(),
            origin: self.origin(),
            caching: self.caching.clone(),
        }
    }

    fn update_params(&self, hyperdrive_id: &str) -> UpdateHyperdriveConfigParams {
        UpdateHyperdriveConfigParams {
            hyperdrive_id: hyperdrive_id.to_string(),
            name: self.name.clone(),
            origin: self.origin(),
            caching: self.caching.clone(),
        }
    }
}

/// Observable attributes of a config: `name`, `origin` and `caching`
fn config_attributes(config: &HyperdriveConfig) -> ProviderResult<Attributes> {
    let mut attributes = attributes_from_model(config)?;
    attributes.remove("id");
    Ok(attributes)
}

/// Manages Hyperdrive configs, identified by their config id
pub struct HyperdriveConfigHandler<C: ?Sized> {
    client: Arc<C>,
}

impl<C: HyperdriveApi + ?Sized> HyperdriveConfigHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HyperdriveApi + ?Sized + 'static> ResourceHandler for HyperdriveConfigHandler<C> {
    fn resource_type(&self) -> &'static str {
        HYPERDRIVE_CONFIG
    }

    fn schema(&self) -> ResourceSchema {
        schemas::hyperdrive::config_schema()
    }

    async fn create(&self, account_id: &str, desired: &Resource) -> ProviderResult<String> {
        let spec: HyperdriveConfigSpec = spec_from_resource(desired)?;
        let params = spec.create_params();
        log::debug!("Hyperdrive Config create data: {:?}", params);

        let config = self
            .client
            .create_hyperdrive_config(account_id, &params)
            .await
            .map_err(|e| e.into_provider_error("error creating hyperdrive config"))?;
        Ok(config.id)
    }

    async fn read(&self, account_id: &str, hyperdrive_id: &str) -> ProviderResult<Attributes> {
        let config = self
            .client
            .get_hyperdrive_config(account_id, hyperdrive_id)
            .await
            .map_err(|e| {
                e.into_provider_error(format!("error finding Hyperdrive Config {}", hyperdrive_id))
            })?;
        config_attributes(&config)
    }

    async fn update(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
        desired: &Resource,
    ) -> ProviderResult<String> {
        let spec: HyperdriveConfigSpec = spec_from_resource(desired)?;
        let params = spec.update_params(hyperdrive_id);
        log::debug!("Hyperdrive Config update data: {:?}", params);

        let config = self
            .client
            .update_hyperdrive_config(account_id, &params)
            .await
            .map_err(|e| e.into_provider_error("error updating hyperdrive config"))?;
        Ok(config.id)
    }

    async fn delete(&self, account_id: &str, hyperdrive_id: &str) -> ProviderResult<()> {
        log::debug!("Deleting Hyperdrive Config: id {}", hyperdrive_id);
        self.client
            .delete_hyperdrive_config(account_id, hyperdrive_id)
            .await
            .map_err(|e| e.into_provider_error("error deleting hyperdrive config"))
    }
}
