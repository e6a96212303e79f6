//! AI 管线配置
//!
//! 文本 / 图像 / 去背三个角色各自独立选择 Provider 与模型，
//! 另有一个项目级默认选择（`Role::Default`）。

use super::project::AiConfigUpdateRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 选择槽位
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Text,
    Image,
    Background,
    Default,
}

impl Role {
    pub const ALL: [Role; 4] = [Self::Default, Self::Text, Self::Image, Self::Background];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Background => "background",
            Self::Default => "default",
        };
        f.write_str(s)
    }
}

/// 单个角色的 Provider / 模型选择
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoleSelection {
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_model_id: Option<String>,
}

impl RoleSelection {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            custom_model_id: None,
        }
    }

    /// 实际提交的模型：自定义模型非空时优先
    pub fn effective_model(&self) -> &str {
        match self.custom_model_id.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom,
            _ => self.model.trim(),
        }
    }

    pub fn has_effective_model(&self) -> bool {
        !self.effective_model().is_empty()
    }
}

/// 三角色管线配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    pub text: RoleSelection,
    pub image: RoleSelection,
    pub background: RoleSelection,
}

impl PipelineConfig {
    /// 所有角色使用相同的 Provider / 模型
    pub fn uniform(provider: &str, model: &str) -> Self {
        Self {
            text: RoleSelection::new(provider, model),
            image: RoleSelection::new(provider, model),
            background: RoleSelection::new(provider, model),
        }
    }

    pub fn to_request(&self) -> AiPipelineConfigRequest {
        AiPipelineConfigRequest {
            text_provider: self.text.provider.clone(),
            text_model: self.text.effective_model().to_string(),
            image_provider: self.image.provider.clone(),
            image_model: self.image.effective_model().to_string(),
            bg_provider: self.background.provider.clone(),
            bg_model: self.background.effective_model().to_string(),
        }
    }
}

/// 四个选择槽位：默认 + 三角色
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RoleSelections {
    pub default: RoleSelection,
    pub pipeline: PipelineConfig,
}

impl RoleSelections {
    pub fn get(&self, role: Role) -> &RoleSelection {
        match role {
            Role::Default => &self.default,
            Role::Text => &self.pipeline.text,
            Role::Image => &self.pipeline.image,
            Role::Background => &self.pipeline.background,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut RoleSelection {
        match role {
            Role::Default => &mut self.default,
            Role::Text => &mut self.pipeline.text,
            Role::Image => &mut self.pipeline.image,
            Role::Background => &mut self.pipeline.background,
        }
    }

    pub fn set(&mut self, role: Role, selection: RoleSelection) {
        *self.get_mut(role) = selection;
    }

    /// 项目默认配置；默认槽位未选模型时退回文本角色
    pub fn default_config(&self) -> AiConfigUpdateRequest {
        let source = if self.default.has_effective_model() {
            &self.default
        } else {
            &self.pipeline.text
        };
        AiConfigUpdateRequest {
            ai_provider: source.provider.clone(),
            ai_model: source.effective_model().to_string(),
        }
    }
}

/// `PATCH /projects/{id}/ai-pipeline` 请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiPipelineConfigRequest {
    pub text_provider: String,
    pub text_model: String,
    pub image_provider: String,
    pub image_model: String,
    pub bg_provider: String,
    pub bg_model: String,
}

/// 用户凭证，仅保存在会话内存中
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub provider: String,
    pub api_key: String,
    pub api_base: Option<String>,
}

impl Credential {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn to_request(&self) -> AiCredentialsRequest {
        AiCredentialsRequest {
            ai_provider: self.provider.clone(),
            api_key: self.api_key.trim().to_string(),
            api_base: self
                .api_base
                .as_deref()
                .map(str::trim)
                .filter(|base| !base.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// `POST /projects/{id}/ai-credentials` 请求体
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiCredentialsRequest {
    pub ai_provider: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl fmt::Debug for AiCredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiCredentialsRequest")
            .field("ai_provider", &self.ai_provider)
            .field("api_key", &"***")
            .field("api_base", &self.api_base)
            .finish()
    }
}
