//! 向导流程错误类型
//!
//! 错误分为四类（见 `ErrorCategory`）：
//! - 本地校验错误：发起任何网络请求之前发现，无副作用
//! - 传输错误：非 2xx / 超时，展示通用失败提示
//! - 任务失败：任务终止于 FAILED，原样展示服务端原因，可重试
//! - 任务超时：轮询次数耗尽仍未终止，可重试
//!
//! 所有错误都不会终止进程，向导停留在当前步骤。

use super::gateway_error::GatewayError;
use crate::models::JobStatus;
use serde::Serialize;
use thiserror::Error;

/// 任务失败但服务端未给出原因时的提示
pub const JOB_FAILED_FALLBACK: &str = "任务执行失败，请稍后重试";

/// 传输错误的通用提示
pub const OPERATION_FAILED_MESSAGE: &str = "操作失败，请检查网络后重试";

/// 本地校验错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("请输入 API Key")]
    MissingApiKey,

    #[error("请选择文本生成模型")]
    MissingTextModel,

    #[error("请选择图像生成模型")]
    MissingImageModel,

    #[error("请选择去背模型")]
    MissingBackgroundModel,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Transport,
    JobFailure,
    JobTimedOut,
    Workflow,
}

/// 向导操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudioError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("网关错误: {0}")]
    Gateway(#[from] GatewayError),

    #[error("任务 {job_id} 失败: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("任务 {job_id} 轮询已达上限，最后状态 {last_status}")]
    JobTimedOut {
        job_id: String,
        last_status: JobStatus,
    },

    #[error("任务 {0} 正在轮询中")]
    PollInFlight(String),

    #[error("无法从 {from} 跳转到 {to}")]
    InvalidTransition { from: String, to: String },

    #[error("没有可重试的操作")]
    NothingToRetry,
}

impl StudioError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Gateway(_) => ErrorCategory::Transport,
            Self::JobFailed { .. } => ErrorCategory::JobFailure,
            Self::JobTimedOut { .. } => ErrorCategory::JobTimedOut,
            Self::PollInFlight(_) | Self::InvalidTransition { .. } | Self::NothingToRetry => {
                ErrorCategory::Workflow
            }
        }
    }

    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Gateway(_) => OPERATION_FAILED_MESSAGE.to_string(),
            Self::JobFailed { message, .. } => message.clone(),
            Self::JobTimedOut { .. } => "任务仍在处理中，已停止等待，可稍后重试".to_string(),
            Self::PollInFlight(_) => "任务正在处理中，请稍候".to_string(),
            Self::InvalidTransition { .. } | Self::NothingToRetry => self.to_string(),
        }
    }
}

impl From<StudioError> for String {
    fn from(err: StudioError) -> Self {
        err.to_string()
    }
}

impl Serialize for StudioError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GatewayErrorKind;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::MissingApiKey.to_string(), "请输入 API Key");
        assert_eq!(
            StudioError::from(ValidationError::MissingImageModel).user_message(),
            "请选择图像生成模型"
        );
    }

    #[test]
    fn test_categories() {
        let gateway = GatewayError::new(GatewayErrorKind::Timeout, "GET /jobs/1", "");
        assert_eq!(
            StudioError::from(gateway).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            StudioError::from(ValidationError::MissingApiKey).category(),
            ErrorCategory::Validation
        );
        let failed = StudioError::JobFailed {
            job_id: "job_1".to_string(),
            message: "rate limited".to_string(),
        };
        assert_eq!(failed.category(), ErrorCategory::JobFailure);
        assert_eq!(StudioError::NothingToRetry.category(), ErrorCategory::Workflow);
    }

    #[test]
    fn test_job_failed_message_is_verbatim() {
        let err = StudioError::JobFailed {
            job_id: "job_888".to_string(),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.user_message(), "rate limited");
        assert_eq!(err.to_string(), "任务 job_888 失败: rate limited");
    }

    #[test]
    fn test_transport_error_uses_generic_message() {
        let err = StudioError::from(GatewayError::from_status(502, "POST /projects", ""));
        assert_eq!(err.user_message(), OPERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_studio_error_serialize() {
        let err = StudioError::JobTimedOut {
            job_id: "job_1".to_string(),
            last_status: JobStatus::Running,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"任务 job_1 轮询已达上限，最后状态 RUNNING\"");
    }
}
