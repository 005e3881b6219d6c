//! In-memory Cloudflare API used by handler and provider tests
//!
//! Behaves like the remote service where the handlers can observe it: defaults
//! are applied on create, patches merge only the fields they carry, passwords
//! are accepted but never returned, and missing objects are NotFound.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::hyperdrive::{
    CreateHyperdriveConfigParams, HyperdriveApi, HyperdriveCaching, HyperdriveConfig,
    HyperdriveOrigin, UpdateHyperdriveConfigParams,
};
use super::pages::{PagesApi, PagesDeploymentConfigs, PagesProject, PagesProjectParams};
use super::{ApiError, ApiResult};

type Key = (String, String);

#[derive(Default)]
pub(crate) struct MemoryClient {
    hyperdrive: Mutex<HashMap<Key, HyperdriveConfig>>,
    pages: Mutex<HashMap<Key, PagesProject>>,
    next_id: AtomicUsize,
    pub(crate) deletes: AtomicUsize,
    /// Answer hyperdrive patches with an object that has no id
    pub(crate) empty_update_response: AtomicBool,
    pub(crate) last_hyperdrive_update: Mutex<Option<UpdateHyperdriveConfigParams>>,
    pub(crate) last_pages_update: Mutex<Option<PagesProjectParams>>,
}

impl MemoryClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Password stored for a config, which the API itself never reveals
    pub(crate) fn stored_password(&self, account_id: &str, id: &str) -> Option<String> {
        self.hyperdrive
            .lock()
            .unwrap()
            .get(&key(account_id, id))
            .and_then(|c| c.origin.password.clone())
    }

    /// Mutate a stored Pages project as if someone changed it out-of-band
    pub(crate) fn edit_pages_project(
        &self,
        account_id: &str,
        name: &str,
        edit: impl FnOnce(&mut PagesProject),
    ) {
        if let Some(project) = self.pages.lock().unwrap().get_mut(&key(account_id, name)) {
            edit(project);
        }
    }

    fn next_id(&self) -> String {
        format!("{:032x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn key(account_id: &str, id: &str) -> Key {
    (account_id.to_string(), id.to_string())
}

fn bad_request(message: &str) -> ApiError {
    ApiError::Http {
        status: 400,
        message: message.to_string(),
    }
}

fn without_password(config: &HyperdriveConfig) -> HyperdriveConfig {
    let mut config = config.clone();
    config.origin.password = None;
    config
}

fn caching_defaults() -> HyperdriveCaching {
    HyperdriveCaching {
        disabled: Some(false),
        max_age: Some(60),
        stale_while_revalidate: Some(15),
    }
}

#[async_trait]
impl HyperdriveApi for MemoryClient {
    async fn create_hyperdrive_config(
        &self,
        account_id: &str,
        params: &CreateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig> {
        let name = params
            .name
            .clone()
            .ok_or_else(|| bad_request("name is required"))?;
        let mut origin = HyperdriveOrigin {
            port: Some(5432),
            scheme: Some("postgres".to_string()),
            ..Default::default()
        };
        origin.merge(params.origin.as_ref().ok_or_else(|| bad_request("origin is required"))?);

        let mut caching = caching_defaults();
        if let Some(requested) = &params.caching {
            caching.merge(requested);
        }

        let config = HyperdriveConfig {
            id: self.next_id(),
            name,
            origin,
            caching: Some(caching),
        };
        self.hyperdrive
            .lock()
            .unwrap()
            .insert(key(account_id, &config.id), config.clone());
        Ok(without_password(&config))
    }

    async fn get_hyperdrive_config(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
    ) -> ApiResult<HyperdriveConfig> {
        self.hyperdrive
            .lock()
            .unwrap()
            .get(&key(account_id, hyperdrive_id))
            .map(without_password)
            .ok_or_else(|| ApiError::NotFound(format!("hyperdrive config {}", hyperdrive_id)))
    }

    async fn update_hyperdrive_config(
        &self,
        account_id: &str,
        params: &UpdateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig> {
        *self.last_hyperdrive_update.lock().unwrap() = Some(params.clone());

        let mut configs = self.hyperdrive.lock().unwrap();
        let config = configs
            .get_mut(&key(account_id, &params.hyperdrive_id))
            .ok_or_else(|| {
                ApiError::NotFound(format!("hyperdrive config {}", params.hyperdrive_id))
            })?;
        if let Some(name) = &params.name {
            config.name = name.clone();
        }
        if let Some(origin) = &params.origin {
            config.origin.merge(origin);
        }
        if let Some(caching) = &params.caching {
            config
                .caching
                .get_or_insert_with(caching_defaults)
                .merge(caching);
        }

        let mut response = without_password(config);
        if self.empty_update_response.load(Ordering::SeqCst) {
            response.id = String::new();
        }
        Ok(response)
    }

    async fn delete_hyperdrive_config(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
    ) -> ApiResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.hyperdrive
            .lock()
            .unwrap()
            .remove(&key(account_id, hyperdrive_id))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("hyperdrive config {}", hyperdrive_id)))
    }

    async fn list_hyperdrive_configs(&self, account_id: &str) -> ApiResult<Vec<HyperdriveConfig>> {
        let mut configs: Vec<HyperdriveConfig> = self
            .hyperdrive
            .lock()
            .unwrap()
            .iter()
            .filter(|((account, _), _)| account == account_id)
            .map(|(_, config)| without_password(config))
            .collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(configs)
    }
}

fn merge_deployment_configs(current: &mut PagesDeploymentConfigs, patch: &PagesDeploymentConfigs) {
    for (target, source) in [
        (&mut current.preview, &patch.preview),
        (&mut current.production, &patch.production),
    ] {
        let Some(source) = source else { continue };
        let target = target.get_or_insert_with(Default::default);
        if let Some(vars) = &source.env_vars {
            target
                .env_vars
                .get_or_insert_with(Default::default)
                .extend(vars.clone());
        }
        if source.compatibility_date.is_some() {
            target.compatibility_date = source.compatibility_date.clone();
        }
        if source.compatibility_flags.is_some() {
            target.compatibility_flags = source.compatibility_flags.clone();
        }
    }
}

#[async_trait]
impl PagesApi for MemoryClient {
    async fn create_pages_project(
        &self,
        account_id: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject> {
        let name = params
            .name
            .clone()
            .ok_or_else(|| bad_request("name is required"))?;
        let mut projects = self.pages.lock().unwrap();
        if projects.contains_key(&key(account_id, &name)) {
            return Err(ApiError::Http {
                status: 409,
                message: format!("A project with this name already exists: {}", name),
            });
        }

        let subdomain = format!("{}.pages.dev", name);
        let project = PagesProject {
            id: self.next_id(),
            name: name.clone(),
            domains: vec![subdomain.clone()],
            subdomain: Some(subdomain),
            created_on: Some("2024-01-01T00:00:00Z".to_string()),
            production_branch: params.production_branch.clone(),
            build_config: params.build_config.clone(),
            source: params.source.clone(),
            deployment_configs: params.deployment_configs.clone(),
        };
        projects.insert(key(account_id, &name), project.clone());
        Ok(project)
    }

    async fn get_pages_project(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> ApiResult<PagesProject> {
        self.pages
            .lock()
            .unwrap()
            .get(&key(account_id, project_name))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("pages project {}", project_name)))
    }

    async fn update_pages_project(
        &self,
        account_id: &str,
        project_name: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject> {
        *self.last_pages_update.lock().unwrap() = Some(params.clone());

        let mut projects = self.pages.lock().unwrap();
        let project = projects
            .get_mut(&key(account_id, project_name))
            .ok_or_else(|| ApiError::NotFound(format!("pages project {}", project_name)))?;
        if params.production_branch.is_some() {
            project.production_branch = params.production_branch.clone();
        }
        if params.build_config.is_some() {
            project.build_config = params.build_config.clone();
        }
        if params.source.is_some() {
            project.source = params.source.clone();
        }
        if let Some(configs) = &params.deployment_configs {
            merge_deployment_configs(
                project.deployment_configs.get_or_insert_with(Default::default),
                configs,
            );
        }
        Ok(project.clone())
    }

    async fn delete_pages_project(&self, account_id: &str, project_name: &str) -> ApiResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .remove(&key(account_id, project_name))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("pages project {}", project_name)))
    }

    async fn list_pages_projects(&self, account_id: &str) -> ApiResult<Vec<PagesProject>> {
        let mut projects: Vec<PagesProject> = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|((account, _), _)| account == account_id)
            .map(|(_, project)| project.clone())
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }
}
