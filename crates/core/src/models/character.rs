//! 角色模型

use serde::{Deserialize, Serialize};

/// 角色来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterSource {
    /// AI 根据提示词生成
    Ai,
    /// 用户上传参考图
    Upload,
    /// 从历史项目复用
    History,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterStatus {
    #[default]
    Ready,
    Failed,
}

/// 角色
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub source_type: CharacterSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_url: Option<String>,
    #[serde(default)]
    pub status: CharacterStatus,
}

/// 创建角色请求
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreateRequest {
    pub source_type: CharacterSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_image_url: Option<String>,
}

impl CharacterCreateRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            source_type: CharacterSource::Ai,
            prompt: Some(prompt.into()),
            reference_image_url: None,
        }
    }

    pub fn from_reference(source_type: CharacterSource, url: impl Into<String>) -> Self {
        Self {
            source_type,
            prompt: None,
            reference_image_url: Some(url.into()),
        }
    }
}
