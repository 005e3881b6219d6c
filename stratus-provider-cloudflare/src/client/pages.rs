//! Pages project models and API

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesBuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_analytics_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_analytics_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesSourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_comments_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments_enabled: Option<bool>,
}

/// Git repository the project deploys from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesSource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PagesSourceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesEnvVar {
    #[serde(default)]
    pub value: String,
    /// `plain_text` or `secret_text`; secrets come back with an empty value
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
}

/// Settings for one deployment environment (preview or production)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesDeploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<BTreeMap<String, PagesEnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_flags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesDeploymentConfigs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PagesDeploymentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<PagesDeploymentConfig>,
}

/// A Pages project as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesProject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_config: Option<PagesBuildConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PagesSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_configs: Option<PagesDeploymentConfigs>,
}

/// Body of a create or patch request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesProjectParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_config: Option<PagesBuildConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PagesSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_configs: Option<PagesDeploymentConfigs>,
}

/// Pages endpoints, scoped by account. Projects are addressed by name.
#[async_trait]
pub trait PagesApi: Send + Sync {
    async fn create_pages_project(
        &self,
        account_id: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject>;

    async fn get_pages_project(&self, account_id: &str, project_name: &str)
    -> ApiResult<PagesProject>;

    async fn update_pages_project(
        &self,
        account_id: &str,
        project_name: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject>;

    async fn delete_pages_project(&self, account_id: &str, project_name: &str) -> ApiResult<()>;

    async fn list_pages_projects(&self, account_id: &str) -> ApiResult<Vec<PagesProject>>;
}
