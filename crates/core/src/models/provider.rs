use serde::{Deserialize, Serialize};

/// AI Provider 及其可选模型
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub models: Vec<String>,
}

impl Provider {
    pub fn first_model(&self) -> Option<&str> {
        self.models.first().map(String::as_str)
    }
}

/// `GET /projects/{id}/verified-providers` 的响应体
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifiedProvidersResponse {
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// 在列表中按 id 查找 Provider
pub fn find_provider<'a>(providers: &'a [Provider], provider_id: &str) -> Option<&'a Provider> {
    providers.iter().find(|provider| provider.id == provider_id)
}
