//! HTTP client for the Cloudflare v4 REST API

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::hyperdrive::{
    CreateHyperdriveConfigParams, HyperdriveApi, HyperdriveConfig, UpdateHyperdriveConfigParams,
};
use super::pages::{PagesApi, PagesProject, PagesProjectParams};
use super::{ApiError, ApiResult};
use crate::config::ProviderConfig;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Error code Pages uses for a missing project (sent with HTTP 404 or 400)
const PAGES_PROJECT_NOT_FOUND: i64 = 8000007;

const PAGES_PER_PAGE: u32 = 10;

/// Truncate long response bodies before logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };
    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Response envelope shared by every v4 endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: Option<u32>,
}

fn join_messages(errors: &[ApiMessage]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cloudflare API client authenticating with a bearer token
#[derive(Clone)]
pub struct CloudflareClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl CloudflareClient {
    pub fn new(config: &ProviderConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("stratus-provider-cloudflare/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and check the response envelope
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.api_token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        let envelope: Option<Envelope<T>> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        let errors = envelope.as_ref().map(|e| e.errors.as_slice()).unwrap_or(&[]);

        if status == StatusCode::NOT_FOUND
            || errors.iter().any(|e| e.code == PAGES_PROJECT_NOT_FOUND)
        {
            return Err(ApiError::NotFound(url));
        }

        if !status.is_success() {
            log::error!("API error: {} - {}", status, sanitize_for_log(&text));
            let message = if errors.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                join_messages(errors)
            };
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // 204 and other bodiless successes carry no envelope
        if text.trim().is_empty() {
            return Ok(Envelope {
                success: true,
                errors: Vec::new(),
                result: None,
                result_info: None,
            });
        }

        let envelope = envelope.ok_or_else(|| {
            ApiError::Decode(format!(
                "Failed to parse response from {}: {}",
                url,
                sanitize_for_log(&text)
            ))
        })?;
        if !envelope.success {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: join_messages(&envelope.errors),
            });
        }
        Ok(envelope)
    }

    async fn fetch<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, B>(method, path, &[], body)
            .await?
            .result
            .ok_or_else(|| ApiError::Decode(format!("response from {} has no result", path)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch::<T, ()>(Method::GET, path, None).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request::<serde_json::Value, ()>(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    fn hyperdrive_path(account_id: &str) -> String {
        format!("accounts/{}/hyperdrive/configs", account_id)
    }

    fn pages_path(account_id: &str) -> String {
        format!("accounts/{}/pages/projects", account_id)
    }
}

#[async_trait]
impl HyperdriveApi for CloudflareClient {
    async fn create_hyperdrive_config(
        &self,
        account_id: &str,
        params: &CreateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig> {
        self.fetch(Method::POST, &Self::hyperdrive_path(account_id), Some(params))
            .await
    }

    async fn get_hyperdrive_config(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
    ) -> ApiResult<HyperdriveConfig> {
        self.get(&format!(
            "{}/{}",
            Self::hyperdrive_path(account_id),
            hyperdrive_id
        ))
        .await
    }

    async fn update_hyperdrive_config(
        &self,
        account_id: &str,
        params: &UpdateHyperdriveConfigParams,
    ) -> ApiResult<HyperdriveConfig> {
        let path = format!(
            "{}/{}",
            Self::hyperdrive_path(account_id),
            params.hyperdrive_id
        );
        self.fetch(Method::PATCH, &path, Some(params)).await
    }

    async fn delete_hyperdrive_config(
        &self,
        account_id: &str,
        hyperdrive_id: &str,
    ) -> ApiResult<()> {
        self.delete(&format!(
            "{}/{}",
            Self::hyperdrive_path(account_id),
            hyperdrive_id
        ))
        .await
    }

    async fn list_hyperdrive_configs(&self, account_id: &str) -> ApiResult<Vec<HyperdriveConfig>> {
        self.get(&Self::hyperdrive_path(account_id)).await
    }
}

#[async_trait]
impl PagesApi for CloudflareClient {
    async fn create_pages_project(
        &self,
        account_id: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject> {
        self.fetch(Method::POST, &Self::pages_path(account_id), Some(params))
            .await
    }

    async fn get_pages_project(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> ApiResult<PagesProject> {
        self.get(&format!("{}/{}", Self::pages_path(account_id), project_name))
            .await
    }

    async fn update_pages_project(
        &self,
        account_id: &str,
        project_name: &str,
        params: &PagesProjectParams,
    ) -> ApiResult<PagesProject> {
        let path = format!("{}/{}", Self::pages_path(account_id), project_name);
        self.fetch(Method::PATCH, &path, Some(params)).await
    }

    async fn delete_pages_project(&self, account_id: &str, project_name: &str) -> ApiResult<()> {
        self.delete(&format!("{}/{}", Self::pages_path(account_id), project_name))
            .await
    }

    async fn list_pages_projects(&self, account_id: &str) -> ApiResult<Vec<PagesProject>> {
        let path = Self::pages_path(account_id);
        let mut projects = Vec::new();
        let mut page = 1;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", PAGES_PER_PAGE.to_string()),
            ];
            let envelope = self
                .request::<Vec<PagesProject>, ()>(Method::GET, &path, &query, None)
                .await?;
            let batch = envelope.result.unwrap_or_default();
            let fetched = batch.len();
            projects.extend(batch);

            let more = match envelope.result_info {
                Some(ResultInfo {
                    page: current,
                    total_pages: Some(total),
                }) => current < total,
                _ => fetched == PAGES_PER_PAGE as usize,
            };
            if !more || fetched == 0 {
                break;
            }
            page += 1;
        }

        Ok(projects)
    }
}
