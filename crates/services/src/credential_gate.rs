//! 凭证校验关卡
//!
//! 依次提交凭证、默认配置、三角色管线，触发校验并拉取已验证 Provider。
//! 每一步都是覆盖写，失败后从头重跑是安全的，因此不做回滚。

use std::collections::HashMap;

use serde::Serialize;
use sticker_core::models::{
    Credential, PipelineConfig, Project, Provider, Role, RoleSelection, RoleSelections,
};
use sticker_core::{StudioError, ValidationError};
use sticker_gateway::SharedGateway;
use tracing::{info, warn};

use crate::provider_sync;

/// 校验状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationState {
    pub verified: bool,
    pub providers: Vec<Provider>,
}

/// 会话内的 AI 设置：凭证、四个选择槽位以及校验状态
///
/// API Key 只能通过 `set_api_key` 修改，修改时校验状态一并清空。
#[derive(Debug, Clone, Default)]
pub struct AiSettings {
    credential: Credential,
    pub selections: RoleSelections,
    verification: VerificationState,
}

impl AiSettings {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn verification(&self) -> &VerificationState {
        &self.verification
    }

    pub fn is_verified(&self) -> bool {
        self.verification.verified
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        self.credential.api_key = api_key.to_string();
        self.reset_verification();
    }

    pub fn set_api_base(&mut self, api_base: Option<&str>) {
        self.credential.api_base = api_base
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .map(str::to_string);
    }

    pub fn set_credential_provider(&mut self, provider: &str) {
        self.credential.provider = provider.to_string();
    }

    pub fn reset_verification(&mut self) {
        self.verification = VerificationState::default();
    }

    pub fn mark_verified(&mut self, providers: Vec<Provider>) {
        self.verification = VerificationState {
            verified: true,
            providers,
        };
    }

    /// 当前可选的 Provider 列表
    pub fn applicable_providers<'a>(&'a self, catalog: &'a [Provider]) -> &'a [Provider] {
        if self.verification.verified {
            &self.verification.providers
        } else {
            catalog
        }
    }

    pub fn select_provider(&mut self, role: Role, provider_id: &str, catalog: &[Provider]) {
        let applicable = if self.verification.verified {
            self.verification.providers.as_slice()
        } else {
            catalog
        };
        provider_sync::on_provider_change(&mut self.selections, role, provider_id, applicable);
    }
}

/// 本地前置校验，顺序：API Key、文本、图像、去背
pub fn validate(credential: &Credential, pipeline: &PipelineConfig) -> Result<(), ValidationError> {
    if !credential.has_api_key() {
        return Err(ValidationError::MissingApiKey);
    }
    if !pipeline.text.has_effective_model() {
        return Err(ValidationError::MissingTextModel);
    }
    if !pipeline.image.has_effective_model() {
        return Err(ValidationError::MissingImageModel);
    }
    if !pipeline.background.has_effective_model() {
        return Err(ValidationError::MissingBackgroundModel);
    }
    Ok(())
}

/// 校验成功的结果
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    /// 管线更新后的项目
    pub project: Project,
    pub providers: Vec<Provider>,
}

pub struct CredentialGate {
    gateway: SharedGateway,
    /// Provider -> 推荐去背模型
    background_models: HashMap<String, String>,
}

impl CredentialGate {
    pub fn new(gateway: SharedGateway, background_models: HashMap<String, String>) -> Self {
        Self {
            gateway,
            background_models,
        }
    }

    pub async fn verify(
        &self,
        project_id: &str,
        credential: &Credential,
        selections: &RoleSelections,
    ) -> Result<VerificationResult, StudioError> {
        validate(credential, &selections.pipeline)?;

        let default_config = selections.default_config();
        let mut credentials = credential.to_request();
        if credentials.ai_provider.trim().is_empty() {
            credentials.ai_provider = default_config.ai_provider.clone();
        }

        info!(
            "[CredentialGate] 开始校验 project={} provider={}",
            project_id, credentials.ai_provider
        );
        let result = async {
            self.gateway
                .set_ai_credentials(project_id, &credentials)
                .await?;
            self.gateway
                .update_ai_config(project_id, &default_config)
                .await?;
            let project = self
                .gateway
                .update_ai_pipeline(project_id, &selections.pipeline.to_request())
                .await?;
            self.gateway.verify_ai_credentials(project_id).await?;
            let verified = self.gateway.list_verified_providers(project_id).await?;
            Ok::<_, StudioError>(VerificationResult {
                project,
                providers: verified.providers,
            })
        }
        .await;

        match &result {
            Ok(outcome) => info!(
                "[CredentialGate] 校验完成，可用 Provider {} 个",
                outcome.providers.len()
            ),
            Err(err) => warn!("[CredentialGate] 校验失败: {}", err),
        }
        result
    }

    pub fn recommended_background_model(&self, provider_id: &str) -> Option<&str> {
        self.background_models.get(provider_id).map(String::as_str)
    }

    /// 用第一个已验证 Provider 填充四个槽位；列表为空时不做修改
    pub fn apply_defaults(&self, selections: &mut RoleSelections, verified: &[Provider]) -> bool {
        let Some(first) = verified.first() else {
            return false;
        };
        let model = first.first_model().unwrap_or_default();
        let background_model = self
            .recommended_background_model(&first.id)
            .unwrap_or(model);

        selections.set(Role::Default, RoleSelection::new(&first.id, model));
        selections.set(Role::Text, RoleSelection::new(&first.id, model));
        selections.set(Role::Image, RoleSelection::new(&first.id, model));
        selections.set(
            Role::Background,
            RoleSelection::new(&first.id, background_model),
        );
        true
    }
}
