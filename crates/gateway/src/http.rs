//! 基于 reqwest 的网关实现

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use sticker_core::config::ApiConfig;
use sticker_core::errors::preview_payload;
use sticker_core::models::{
    AiConfigUpdateRequest, AiCredentialsRequest, AiPipelineConfigRequest, Character,
    CharacterCreateRequest, Draft, DraftUpdateRequest, ExportResult, Job, Project,
    ProjectCreateRequest, ProjectUpdateRequest, Provider, Sticker, ThemeSuggestResponse,
    VerifiedProvidersResponse,
};
use sticker_core::{GatewayError, GatewayErrorKind};

use crate::{GatewayResult, StickerGateway};

pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|error| {
            GatewayError::new(
                GatewayErrorKind::Transport,
                "client",
                format!("HTTP 客户端初始化失败: {error}"),
            )
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &ApiConfig) -> GatewayResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发送请求并返回成功响应的原始文本
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> GatewayResult<String> {
        let endpoint = format!("{method} {path}");
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("[Gateway] {}", endpoint);

        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|error| {
            if error.is_timeout() {
                GatewayError::timeout(endpoint.as_str(), self.timeout.as_secs())
            } else {
                GatewayError::new(GatewayErrorKind::Transport, endpoint.as_str(), error.to_string())
            }
        })?;

        let status = response.status();
        let payload = response.text().await.map_err(|error| {
            if error.is_timeout() {
                GatewayError::timeout(endpoint.as_str(), self.timeout.as_secs())
            } else {
                GatewayError::new(
                    GatewayErrorKind::Transport,
                    endpoint.as_str(),
                    format!("响应读取失败: {error}"),
                )
            }
        })?;

        if !status.is_success() {
            tracing::warn!("[Gateway] {} 返回 {}", endpoint, status.as_u16());
            return Err(GatewayError::from_status(status.as_u16(), endpoint, &payload));
        }
        Ok(payload)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> GatewayResult<T> {
        let endpoint = format!("{method} {path}");
        let payload = self.send(method, path, body).await?;
        serde_json::from_str(&payload).map_err(|error| {
            GatewayError::new(
                GatewayErrorKind::Decode,
                endpoint,
                format!("响应解析失败: {error}; body={}", preview_payload(&payload)),
            )
        })
    }

    async fn request_void(&self, method: Method, path: &str, body: Option<Value>) -> GatewayResult<()> {
        self.send(method, path, body).await.map(|_| ())
    }
}

fn encode_body<B: Serialize>(endpoint: &str, body: &B) -> GatewayResult<Value> {
    serde_json::to_value(body).map_err(|error| {
        GatewayError::new(
            GatewayErrorKind::InvalidRequest,
            endpoint,
            format!("请求体序列化失败: {error}"),
        )
    })
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl StickerGateway for HttpGateway {
    async fn create_project(&self, request: &ProjectCreateRequest) -> GatewayResult<Project> {
        let body = encode_body("POST /projects", request)?;
        self.request_json(Method::POST, "/projects", Some(body)).await
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        self.request_json(Method::GET, "/projects", None).await
    }

    async fn get_project(&self, project_id: &str) -> GatewayResult<Project> {
        let path = format!("/projects/{}", segment(project_id));
        self.request_json(Method::GET, &path, None).await
    }

    async fn update_project(
        &self,
        project_id: &str,
        request: &ProjectUpdateRequest,
    ) -> GatewayResult<Project> {
        let path = format!("/projects/{}", segment(project_id));
        let body = encode_body(&path, request)?;
        self.request_json(Method::PATCH, &path, Some(body)).await
    }

    async fn update_ai_config(
        &self,
        project_id: &str,
        request: &AiConfigUpdateRequest,
    ) -> GatewayResult<Project> {
        let path = format!("/projects/{}/ai-config", segment(project_id));
        let body = encode_body(&path, request)?;
        self.request_json(Method::PATCH, &path, Some(body)).await
    }

    async fn update_ai_pipeline(
        &self,
        project_id: &str,
        request: &AiPipelineConfigRequest,
    ) -> GatewayResult<Project> {
        let path = format!("/projects/{}/ai-pipeline", segment(project_id));
        let body = encode_body(&path, request)?;
        self.request_json(Method::PATCH, &path, Some(body)).await
    }

    async fn list_providers(&self) -> GatewayResult<Vec<Provider>> {
        self.request_json(Method::GET, "/providers", None).await
    }

    async fn set_ai_credentials(
        &self,
        project_id: &str,
        request: &AiCredentialsRequest,
    ) -> GatewayResult<()> {
        let path = format!("/projects/{}/ai-credentials", segment(project_id));
        let body = encode_body(&path, request)?;
        self.request_void(Method::POST, &path, Some(body)).await
    }

    async fn verify_ai_credentials(&self, project_id: &str) -> GatewayResult<()> {
        let path = format!("/projects/{}/ai-verify", segment(project_id));
        self.request_void(Method::POST, &path, None).await
    }

    async fn list_verified_providers(
        &self,
        project_id: &str,
    ) -> GatewayResult<VerifiedProvidersResponse> {
        let path = format!("/projects/{}/verified-providers", segment(project_id));
        self.request_json(Method::GET, &path, None).await
    }

    async fn create_character(
        &self,
        project_id: &str,
        request: &CharacterCreateRequest,
    ) -> GatewayResult<Character> {
        let path = format!("/projects/{}/character", segment(project_id));
        let body = encode_body(&path, request)?;
        self.request_json(Method::POST, &path, Some(body)).await
    }

    async fn suggest_theme(
        &self,
        project_id: &str,
        seed: Option<&str>,
    ) -> GatewayResult<ThemeSuggestResponse> {
        let path = format!("/projects/{}/theme:suggest", segment(project_id));
        let body = match seed {
            Some(seed) => json!({ "seed": seed }),
            None => json!({}),
        };
        self.request_json(Method::POST, &path, Some(body)).await
    }

    async fn generate_drafts(&self, project_id: &str) -> GatewayResult<Job> {
        let path = format!("/projects/{}/drafts:generate", segment(project_id));
        self.request_json(Method::POST, &path, None).await
    }

    async fn list_drafts(&self, project_id: &str) -> GatewayResult<Vec<Draft>> {
        let path = format!("/projects/{}/drafts", segment(project_id));
        self.request_json(Method::GET, &path, None).await
    }

    async fn update_draft(
        &self,
        draft_id: &str,
        request: &DraftUpdateRequest,
    ) -> GatewayResult<Draft> {
        let path = format!("/drafts/{}", segment(draft_id));
        let body = encode_body(&path, request)?;
        self.request_json(Method::PATCH, &path, Some(body)).await
    }

    async fn generate_stickers(&self, project_id: &str) -> GatewayResult<Job> {
        let path = format!("/projects/{}/stickers:generate", segment(project_id));
        self.request_json(Method::POST, &path, None).await
    }

    async fn list_stickers(&self, project_id: &str) -> GatewayResult<Vec<Sticker>> {
        let path = format!("/projects/{}/stickers", segment(project_id));
        self.request_json(Method::GET, &path, None).await
    }

    async fn regenerate_sticker(&self, sticker_id: &str) -> GatewayResult<Job> {
        let path = format!("/stickers/{}:regenerate", segment(sticker_id));
        self.request_json(Method::POST, &path, None).await
    }

    async fn remove_background(&self, project_id: &str) -> GatewayResult<Job> {
        let path = format!("/projects/{}/stickers:remove-bg", segment(project_id));
        self.request_json(Method::POST, &path, None).await
    }

    async fn export_project(&self, project_id: &str) -> GatewayResult<ExportResult> {
        let path = format!("/projects/{}/export", segment(project_id));
        self.request_json(Method::POST, &path, None).await
    }

    async fn get_job(&self, job_id: &str) -> GatewayResult<Job> {
        let path = format!("/jobs/{}", segment(job_id));
        self.request_json(Method::GET, &path, None).await
    }
}
