use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DraftStatus {
    #[default]
    Draft,
    Approved,
    Rejected,
}

/// 文案草稿（一张贴图对应一条）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub status: DraftStatus,
}

/// 更新草稿请求，未设置的字段不提交
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DraftStatus>,
}
