//! 项目模型
//!
//! 向导第一步创建的项目，以及与之相关的请求体。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 项目状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Draft,
    GeneratingDrafts,
    DraftReady,
    GeneratingImages,
    ImagesReady,
    Exporting,
    Done,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::GeneratingDrafts => "GENERATING_DRAFTS",
            Self::DraftReady => "DRAFT_READY",
            Self::GeneratingImages => "GENERATING_IMAGES",
            Self::ImagesReady => "IMAGES_READY",
            Self::Exporting => "EXPORTING",
            Self::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// 贴图数量
///
/// 仅允许 8 / 16 / 24 / 40 张，序列化为纯数字。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum StickerCount {
    Eight,
    Sixteen,
    TwentyFour,
    Forty,
}

impl StickerCount {
    pub const ALL: [StickerCount; 4] = [Self::Eight, Self::Sixteen, Self::TwentyFour, Self::Forty];

    pub fn get(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
            Self::Forty => 40,
        }
    }
}

impl Default for StickerCount {
    fn default() -> Self {
        Self::Eight
    }
}

impl TryFrom<u32> for StickerCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            24 => Ok(Self::TwentyFour),
            40 => Ok(Self::Forty),
            other => Err(format!("不支持的贴图数量: {other}（仅支持 8/16/24/40）")),
        }
    }
}

impl From<StickerCount> for u32 {
    fn from(count: StickerCount) -> Self {
        count.get()
    }
}

/// 项目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub sticker_count: StickerCount,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

/// 创建项目请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sticker_count: StickerCount,
}

/// 更新项目（主题）请求
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// 默认 AI 配置请求
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigUpdateRequest {
    pub ai_provider: String,
    pub ai_model: String,
}

/// 主题建议
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeSuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}
