//! 核心类型和工具模块
//!
//! 包含 models, config, errors, logger 等基础功能，
//! 供 gateway / services / 主 crate 共享。

pub mod config;
pub mod errors;
pub mod logger;
pub mod models;

pub use config::{load_config, save_config, StudioConfig};
pub use errors::{
    ConfigError, ErrorCategory, GatewayError, GatewayErrorKind, StudioError, ValidationError,
};
pub use logger::{
    create_log_store_from_config, init_logging, sanitize_log_message, LogEntry, LogStore,
    LogStoreLayer, SharedLogStore,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
