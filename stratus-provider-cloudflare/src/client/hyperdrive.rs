//! Hyperdrive config models and API
//!
//! Every field is optional so requests carry only what the caller set;
//! `None` fields are left out of the JSON body entirely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiResult;

/// Connection details of the origin database
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperdriveOrigin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Accepted on write, never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for HyperdriveOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperdriveOrigin")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HyperdriveOrigin {
    /// Copy every field set in `other` over this origin
    pub fn merge(&mut self, other: &HyperdriveOrigin) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field.clone(); })*
            };
        }
        take!(database, host, port, scheme, user, password);
    }
}

/// Query caching settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperdriveCaching {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_while_revalidate: Option<i64>,
}

impl HyperdriveCaching {
    /// Copy every field set in `other` over these settings
    pub fn merge(&mut self, other: &HyperdriveCaching) {
        if other.disabled.is_some() {
            self.disabled = other.disabled;
        }
        if other.max_age.is_some() {
            self.max_age = other.max_age;
        }
        if other.stale_while_revalidate.is_some() {
            self.stale_while_revalidate = other.stale_while_revalidate;
        }
    }
}

/// A Hyperdrive config as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperdriveConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub origin: HyperdriveOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching: Option<HyperdriveCaching>,
}

/// Body of a create request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateHyperdriveConfigParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<HyperdriveOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching: Option<HyperdriveCaching>,
}

/// Body of a patch request for an existing config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateHyperdriveConfigParams {
    /// Path parameter, not part of the body
    #[serde(skip)]
    pub hyperdrive_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<HyperdriveOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching: Option<HyperdriveCaching>,
}

/// Hyperdrive endpoints, scoped by account
#[async_trait]
pub trait HyperdriveApi: Send + Sync {
    async fn create_hyperdrive_config(
        &self,
        account_id: &str,
        params: &CreateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig>;

    async fn get_hyperdrive_config(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
    ) -> ApiResult<HyperdriveConfig>;

    async fn update_hyperdrive_config(
        &self,
        account_id: &str,
        params: &UpdateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig>;

    async fn delete_hyperdrive_config(&self, account_id: &str, hyperdrive_id: &str)
    -> ApiResult<()>;

    async fn list_hyperdrive_configs(&self, account_id: &str) -> ApiResult<Vec<HyperdriveConfig>>;
}
