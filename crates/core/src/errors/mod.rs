//! 错误类型模块
//!
//! ## 模块结构
//! - `gateway_error`: 远程 API 调用错误（GatewayError, GatewayErrorKind）
//! - `studio_error`: 向导流程错误（StudioError, ValidationError, ErrorCategory）

pub mod gateway_error;
pub mod studio_error;

pub use crate::config::ConfigError;
pub use gateway_error::{preview_payload, GatewayError, GatewayErrorKind};
pub use studio_error::{
    ErrorCategory, StudioError, ValidationError, JOB_FAILED_FALLBACK, OPERATION_FAILED_MESSAGE,
};
