//! 贴图模型

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum StickerStatus {
    #[default]
    Pending,
    Generating,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub draft_id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_url: Option<String>,
    #[serde(default)]
    pub status: StickerStatus,
}

impl Sticker {
    /// 预览用 URL：有去背结果时优先使用透明图
    pub fn display_url(&self) -> &str {
        match self.transparent_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => &self.image_url,
        }
    }
}
