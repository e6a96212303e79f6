//! 状态初始化模块

use std::sync::Arc;

use sticker_core::logger::create_log_store_from_config;
use sticker_core::{ConfigError, GatewayError, LogEntry, SharedLogStore, StudioConfig};
use sticker_gateway::{HttpGateway, SharedGateway};
use sticker_services::WizardController;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("网关初始化失败: {0}")]
    Gateway(#[from] GatewayError),
}

pub struct AppState {
    pub config: StudioConfig,
    pub logs: SharedLogStore,
    pub controller: Arc<WizardController>,
}

impl AppState {
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.logs.read().get_logs()
    }
}

/// 使用配置中的 API 地址初始化核心应用状态
pub fn init_core_state(config: StudioConfig, logs: SharedLogStore) -> Result<AppState, AppError> {
    let gateway: SharedGateway = Arc::new(HttpGateway::from_config(&config.api)?);
    Ok(init_with_gateway(config, logs, gateway))
}

pub fn init_with_gateway(
    config: StudioConfig,
    logs: SharedLogStore,
    gateway: SharedGateway,
) -> AppState {
    let controller = Arc::new(WizardController::new(gateway, &config));
    AppState {
        config,
        logs,
        controller,
    }
}

/// 未安装全局 subscriber 时使用的日志存储
pub fn default_log_store(config: &StudioConfig) -> SharedLogStore {
    create_log_store_from_config(&config.logging)
}
