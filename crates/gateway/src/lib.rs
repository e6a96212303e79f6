//! 贴图服务远程 API 网关
//!
//! `StickerGateway` 描述向导依赖的全部远程接口，服务层只依赖该 trait；
//! `HttpGateway` 是基于 reqwest 的实现。

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use sticker_core::models::{
    AiConfigUpdateRequest, AiCredentialsRequest, AiPipelineConfigRequest, Character,
    CharacterCreateRequest, Draft, DraftUpdateRequest, ExportResult, Job, Project,
    ProjectCreateRequest, ProjectUpdateRequest, Provider, Sticker, ThemeSuggestResponse,
    VerifiedProvidersResponse,
};
use sticker_core::GatewayError;
use std::sync::Arc;

pub type GatewayResult<T> = Result<T, GatewayError>;

pub type SharedGateway = Arc<dyn StickerGateway>;

/// 远程 API
///
/// 所有请求都是无状态的请求/响应，失败统一返回 `GatewayError`。
#[async_trait]
pub trait StickerGateway: Send + Sync {
    async fn create_project(&self, request: &ProjectCreateRequest) -> GatewayResult<Project>;

    async fn list_projects(&self) -> GatewayResult<Vec<Project>>;

    async fn get_project(&self, project_id: &str) -> GatewayResult<Project>;

    /// 更新主题
    async fn update_project(
        &self,
        project_id: &str,
        request: &ProjectUpdateRequest,
    ) -> GatewayResult<Project>;

    async fn update_ai_config(
        &self,
        project_id: &str,
        request: &AiConfigUpdateRequest,
    ) -> GatewayResult<Project>;

    async fn update_ai_pipeline(
        &self,
        project_id: &str,
        request: &AiPipelineConfigRequest,
    ) -> GatewayResult<Project>;

    async fn list_providers(&self) -> GatewayResult<Vec<Provider>>;

    /// 保存凭证，响应体被忽略
    async fn set_ai_credentials(
        &self,
        project_id: &str,
        request: &AiCredentialsRequest,
    ) -> GatewayResult<()>;

    /// 触发凭证校验，响应体被忽略
    async fn verify_ai_credentials(&self, project_id: &str) -> GatewayResult<()>;

    async fn list_verified_providers(
        &self,
        project_id: &str,
    ) -> GatewayResult<VerifiedProvidersResponse>;

    async fn create_character(
        &self,
        project_id: &str,
        request: &CharacterCreateRequest,
    ) -> GatewayResult<Character>;

    async fn suggest_theme(
        &self,
        project_id: &str,
        seed: Option<&str>,
    ) -> GatewayResult<ThemeSuggestResponse>;

    async fn generate_drafts(&self, project_id: &str) -> GatewayResult<Job>;

    async fn list_drafts(&self, project_id: &str) -> GatewayResult<Vec<Draft>>;

    async fn update_draft(
        &self,
        draft_id: &str,
        request: &DraftUpdateRequest,
    ) -> GatewayResult<Draft>;

    async fn generate_stickers(&self, project_id: &str) -> GatewayResult<Job>;

    async fn list_stickers(&self, project_id: &str) -> GatewayResult<Vec<Sticker>>;

    async fn regenerate_sticker(&self, sticker_id: &str) -> GatewayResult<Job>;

    async fn remove_background(&self, project_id: &str) -> GatewayResult<Job>;

    async fn export_project(&self, project_id: &str) -> GatewayResult<ExportResult>;

    async fn get_job(&self, job_id: &str) -> GatewayResult<Job>;
}
