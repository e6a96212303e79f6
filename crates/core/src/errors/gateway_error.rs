//! 网关统一错误模型
//!
//! 远程 API 调用失败（非 2xx、超时、解析失败）统一映射为 `GatewayError`，
//! 便于上层按类别展示通用失败提示。

use serde::Serialize;
use thiserror::Error;

/// 网关错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayErrorKind {
    InvalidRequest,
    AuthenticationFailed,
    NotFound,
    RateLimited,
    Timeout,
    Unavailable,
    Upstream,
    Transport,
    Decode,
}

impl GatewayErrorKind {
    /// 根据 HTTP 状态码推断错误类别
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 | 409 | 422 => Self::InvalidRequest,
            401 | 403 => Self::AuthenticationFailed,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            408 | 504 => Self::Timeout,
            502 | 503 => Self::Unavailable,
            _ => Self::Upstream,
        }
    }

    /// 默认错误文案
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "请求参数无效",
            Self::AuthenticationFailed => "认证失败",
            Self::NotFound => "资源不存在",
            Self::RateLimited => "请求过于频繁，请稍后重试",
            Self::Timeout => "请求超时",
            Self::Unavailable => "服务暂不可用",
            Self::Upstream => "服务返回错误",
            Self::Transport => "无法连接服务",
            Self::Decode => "响应解析失败",
        }
    }

    /// 是否值得重试
    pub fn retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Unavailable | Self::Upstream | Self::Transport
        )
    }
}

/// 网关错误详情
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{endpoint}: {message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// 形如 `POST /projects`
    pub endpoint: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };
        Self {
            kind,
            message,
            status: None,
            endpoint: endpoint.into(),
        }
    }

    /// 非 2xx 响应
    pub fn from_status(status_code: u16, endpoint: impl Into<String>, body: &str) -> Self {
        let kind = GatewayErrorKind::from_status(status_code);
        let mut error = Self::new(
            kind,
            endpoint,
            format!("API {status_code} {}", preview_payload(body)).trim_end().to_string(),
        );
        error.status = Some(status_code);
        error
    }

    pub fn timeout(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self::new(
            GatewayErrorKind::Timeout,
            endpoint,
            format!("请求超时（{timeout_secs} 秒）"),
        )
    }

    pub fn retryable(&self) -> bool {
        self.kind.retryable()
    }
}

impl Serialize for GatewayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<GatewayError> for String {
    fn from(err: GatewayError) -> Self {
        err.to_string()
    }
}

/// 截断过长的响应体，避免日志和提示被撑爆
pub fn preview_payload(payload: &str) -> String {
    const LIMIT: usize = 280;
    let trimmed = payload.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(LIMIT).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(GatewayErrorKind::from_status(401), GatewayErrorKind::AuthenticationFailed);
        assert_eq!(GatewayErrorKind::from_status(404), GatewayErrorKind::NotFound);
        assert_eq!(GatewayErrorKind::from_status(429), GatewayErrorKind::RateLimited);
        assert_eq!(GatewayErrorKind::from_status(503), GatewayErrorKind::Unavailable);
        assert_eq!(GatewayErrorKind::from_status(500), GatewayErrorKind::Upstream);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(GatewayErrorKind::RateLimited.retryable());
        assert!(GatewayErrorKind::Timeout.retryable());
        assert!(!GatewayErrorKind::AuthenticationFailed.retryable());
        assert!(!GatewayErrorKind::Decode.retryable());
    }

    #[test]
    fn test_from_status_keeps_endpoint_and_code() {
        let err = GatewayError::from_status(500, "POST /projects", "boom");
        assert_eq!(err.status, Some(500));
        assert_eq!(err.to_string(), "POST /projects: API 500 boom");
    }

    #[test]
    fn test_blank_message_uses_default() {
        let err = GatewayError::new(GatewayErrorKind::Transport, "GET /jobs/1", " ");
        assert_eq!(err.message, "无法连接服务");
    }

    #[test]
    fn test_preview_payload_truncates_on_char_boundary() {
        let long = "贴".repeat(300);
        let preview = preview_payload(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 283);
    }

    #[test]
    fn test_gateway_error_serialize() {
        let err = GatewayError::timeout("GET /jobs/job_1", 10);
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"GET /jobs/job_1: 请求超时（10 秒）\"");
    }
}
