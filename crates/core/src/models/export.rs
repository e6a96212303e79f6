use serde::{Deserialize, Serialize};

/// 导出结果
///
/// 带警告的导出仍视为成功，下载链接可用。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub download_url: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ExportResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
