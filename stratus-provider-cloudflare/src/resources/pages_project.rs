//! Pages project handler
//!
//! Projects are addressed by name, so the name doubles as the identity and
//! cannot be changed by an update.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stratus_core::provider::{ProviderError, ProviderResult};
use stratus_core::reconciler::ResourceHandler;
use stratus_core::resource::{Attributes, Resource, Value};
use stratus_core::schema::ResourceSchema;

use super::{PAGES_PROJECT, attributes_from_model, spec_from_resource};
use crate::client::PagesApi;
use crate::client::pages::{
    PagesBuildConfig, PagesDeploymentConfig, PagesDeploymentConfigs, PagesEnvVar, PagesProject,
    PagesProjectParams, PagesSource,
};
use crate::schemas;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeploymentConfigSpec {
    environment_variables: Option<BTreeMap<String, String>>,
    compatibility_date: Option<String>,
    compatibility_flags: Option<Vec<String>>,
}

impl DeploymentConfigSpec {
    fn to_params(&self) -> PagesDeploymentConfig {
        PagesDeploymentConfig {
            env_vars: self.environment_variables.as_ref().map(|vars| {
                vars.iter()
                    .map(|(name, value)| {
                        (
                            name.clone(),
                            PagesEnvVar {
                                value: value.clone(),
                                var_type: None,
                            },
                        )
                    })
                    .collect()
            }),
            compatibility_date: self.compatibility_date.clone(),
            compatibility_flags: self.compatibility_flags.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeploymentConfigsSpec {
    preview: Option<DeploymentConfigSpec>,
    production: Option<DeploymentConfigSpec>,
}

/// Desired attributes of a Pages project
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesProjectSpec {
    name: Option<String>,
    production_branch: Option<String>,
    build_config: Option<PagesBuildConfig>,
    source: Option<PagesSource>,
    deployment_configs: Option<DeploymentConfigsSpec>,
}

impl PagesProjectSpec {
    fn to_params(&self) -> PagesProjectParams {
        PagesProjectParams {
            name: self.name.clone(),
            production_branch: self.production_branch.clone(),
            build_config: self.build_config.clone(),
            source: self.source.clone(),
            deployment_configs: self.deployment_configs.as_ref().map(|configs| {
                PagesDeploymentConfigs {
                    preview: configs.preview.as_ref().map(DeploymentConfigSpec::to_params),
                    production: configs
                        .production
                        .as_ref()
                        .map(DeploymentConfigSpec::to_params),
                }
            }),
        }
    }
}

fn deployment_config_value(config: &PagesDeploymentConfig) -> Value {
    let mut map = BTreeMap::new();
    if let Some(vars) = &config.env_vars {
        map.insert(
            "environment_variables".to_string(),
            Value::Map(
                vars.iter()
                    .map(|(name, var)| (name.clone(), Value::String(var.value.clone())))
                    .collect(),
            ),
        );
    }
    if let Some(date) = &config.compatibility_date {
        map.insert("compatibility_date".to_string(), Value::from(date.as_str()));
    }
    if let Some(flags) = &config.compatibility_flags {
        map.insert(
            "compatibility_flags".to_string(),
            Value::List(flags.iter().map(|f| Value::from(f.as_str())).collect()),
        );
    }
    Value::Map(map)
}

/// Observable attributes of a project, including the computed ones
fn project_attributes(project: &PagesProject) -> ProviderResult<Attributes> {
    let mut attributes = attributes_from_model(project)?;
    attributes.remove("id");
    attributes.insert("project_id".to_string(), Value::from(project.id.as_str()));

    attributes.remove("deployment_configs");
    if let Some(configs) = &project.deployment_configs {
        let mut map = BTreeMap::new();
        if let Some(preview) = &configs.preview {
            map.insert("preview".to_string(), deployment_config_value(preview));
        }
        if let Some(production) = &configs.production {
            map.insert("production".to_string(), deployment_config_value(production));
        }
        attributes.insert("deployment_configs".to_string(), Value::Map(map));
    }
    Ok(attributes)
}

/// Manages Pages projects, identified by project name
pub struct PagesProjectHandler<C: ?Sized> {
    client: Arc<C>,
}

impl<C: PagesApi + ?Sized> PagesProjectHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: PagesApi + ?Sized + 'static> ResourceHandler for PagesProjectHandler<C> {
    fn resource_type(&self) -> &'static str {
        PAGES_PROJECT
    }

    fn schema(&self) -> ResourceSchema {
        schemas::pages::project_schema()
    }

    async fn create(&self, account_id: &str, desired: &Resource) -> ProviderResult<String> {
        let spec: PagesProjectSpec = spec_from_resource(desired)?;
        let params = spec.to_params();
        log::debug!("Pages Project create data: {:?}", params);

        let project = self
            .client
            .create_pages_project(account_id, &params)
            .await
            .map_err(|e| e.into_provider_error("error creating pages project"))?;
        Ok(project.name)
    }

    async fn read(&self, account_id: &str, project_name: &str) -> ProviderResult<Attributes> {
        let project = self
            .client
            .get_pages_project(account_id, project_name)
            .await
            .map_err(|e| {
                e.into_provider_error(format!("error finding Pages Project {}", project_name))
            })?;
        project_attributes(&project)
    }

    async fn update(
        &self,
        account_id: &str,
        project_name: &str,
        desired: &Resource,
    ) -> ProviderResult<String> {
        let spec: PagesProjectSpec = spec_from_resource(desired)?;
        if let Some(name) = spec.name.as_deref().filter(|n| *n != project_name) {
            return Err(ProviderError::validation(format!(
                "cannot rename pages project {} to {}; the name is its identity",
                project_name, name
            )));
        }

        let params = PagesProjectParams {
            name: None,
            ..spec.to_params()
        };
        log::debug!("Pages Project update data: {:?}", params);

        let project = self
            .client
            .update_pages_project(account_id, project_name, &params)
            .await
            .map_err(|e| e.into_provider_error("error updating pages project"))?;
        Ok(project.name)
    }

    async fn delete(&self, account_id: &str, project_name: &str) -> ProviderResult<()> {
        log::debug!("Deleting Pages Project: {}", project_name);
        self.client
            .delete_pages_project(account_id, project_name)
            .await
            .map_err(|e| e.into_provider_error("error deleting pages project"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::MemoryClient;
    use stratus_core::provider::ProviderErrorKind;
    use stratus_core::reconciler::Reconciler;
    use stratus_core::resource::ResourceId;

    fn reconciler() -> (Arc<MemoryClient>, Reconciler<PagesProjectHandler<MemoryClient>>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let client = Arc::new(MemoryClient::new());
        let reconciler = Reconciler::new(PagesProjectHandler::new(client.clone()));
        (client, reconciler)
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn flags(names: &[&str]) -> Value {
        Value::List(names.iter().map(|n| Value::from(*n)).collect())
    }

    fn site() -> Resource {
        Resource::new(PAGES_PROJECT, "site")
            .with_attribute("account_id", "acct123")
            .with_attribute("name", "site")
            .with_attribute("production_branch", "main")
            .with_attribute(
                "build_config",
                map(&[
                    ("build_command", Value::from("npm run build")),
                    ("web_analytics_tag", Value::from("tag-1")),
                    ("web_analytics_token", Value::from("token-1")),
                ]),
            )
            .with_attribute(
                "deployment_configs",
                map(&[
                    (
                        "preview",
                        map(&[("compatibility_flags", flags(&["preview_flag"]))]),
                    ),
                    (
                        "production",
                        map(&[
                            (
                                "environment_variables",
                                map(&[("API_URL", Value::from("https://api.example"))]),
                            ),
                            ("compatibility_date", Value::from("2024-03-21")),
                            ("compatibility_flags", flags(&["nodejs_compat"])),
                        ]),
                    ),
                ]),
            )
    }

    #[test]
    fn projection_reads_each_field_from_its_own_path() {
        let spec: PagesProjectSpec = spec_from_resource(&site()).unwrap();
        let params = spec.to_params();

        let build = params.build_config.unwrap();
        assert_eq!(build.web_analytics_tag.as_deref(), Some("tag-1"));
        assert_eq!(build.web_analytics_token.as_deref(), Some("token-1"));

        let configs = params.deployment_configs.unwrap();
        assert_eq!(
            configs.production.unwrap().compatibility_flags,
            Some(vec!["nodejs_compat".to_string()])
        );
        assert_eq!(
            configs.preview.unwrap().compatibility_flags,
            Some(vec!["preview_flag".to_string()])
        );
    }

    #[test]
    fn environment_variables_are_wrapped() {
        let spec: PagesProjectSpec = spec_from_resource(&site()).unwrap();
        let body = serde_json::to_value(spec.to_params()).unwrap();
        assert_eq!(
            body["deployment_configs"]["production"]["env_vars"],
            serde_json::json!({"API_URL": {"value": "https://api.example"}})
        );
    }

    #[tokio::test]
    async fn create_uses_name_as_identity() {
        let (_, reconciler) = reconciler();
        let state = reconciler.create(&site()).await.unwrap();

        assert_eq!(state.identifier.as_deref(), Some("site"));
        assert_eq!(state.get_string("subdomain"), Some("site.pages.dev"));
        assert!(state.get_string("project_id").is_some());
        assert!(state.get_string("created_on").is_some());
        assert_eq!(
            state.attributes["domains"],
            Value::List(vec![Value::from("site.pages.dev")])
        );
        let desired = site();
        assert_eq!(
            state.attributes.get("deployment_configs"),
            desired.attributes.get("deployment_configs")
        );
        assert_eq!(
            state.attributes.get("build_config"),
            desired.attributes.get("build_config")
        );
    }

    #[tokio::test]
    async fn update_keeps_absent_fields_and_never_sends_name() {
        let (client, reconciler) = reconciler();
        let created = reconciler.create(&site()).await.unwrap();

        let desired = Resource::new(PAGES_PROJECT, "site")
            .with_attribute("account_id", "acct123")
            .with_attribute("name", "site")
            .with_attribute("production_branch", "release");
        let updated = reconciler.update(&created, &desired).await.unwrap();

        let sent = client.last_pages_update.lock().unwrap().clone().unwrap();
        assert!(sent.name.is_none());
        assert!(sent.build_config.is_none());

        assert_eq!(updated.get_string("production_branch"), Some("release"));
        assert_eq!(
            updated.attributes.get("build_config"),
            created.attributes.get("build_config")
        );
        assert_eq!(
            updated.attributes.get("deployment_configs"),
            created.attributes.get("deployment_configs")
        );
    }

    #[tokio::test]
    async fn rename_is_rejected() {
        let (_, reconciler) = reconciler();
        let created = reconciler.create(&site()).await.unwrap();

        let renamed = site().with_attribute("name", "site-2");
        let err = reconciler.update(&created, &renamed).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Validation);
    }

    #[tokio::test]
    async fn read_reflects_out_of_band_changes() {
        let (client, reconciler) = reconciler();
        let created = reconciler.create(&site()).await.unwrap();

        client.edit_pages_project("acct123", "site", |project| {
            project.production_branch = Some("hotfix".to_string());
        });
        let read = reconciler
            .read(&created.id, "acct123", Some("site"))
            .await
            .unwrap();
        assert_eq!(read.get_string("production_branch"), Some("hotfix"));
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let (_, reconciler) = reconciler();
        let created = reconciler.create(&site()).await.unwrap();

        reconciler.delete(&created).await.unwrap();
        reconciler.delete(&created).await.unwrap();

        let id = ResourceId::new(PAGES_PROJECT, "site");
        let state = reconciler.read(&id, "acct123", Some("site")).await.unwrap();
        assert!(!state.exists);

        let err = reconciler.import(&id, "acct123/site").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
