//! 启动流程
//!
//! 加载配置、初始化日志、载入 Provider 目录并创建默认项目。

use sticker_core::config::load_config;
use sticker_core::logger::init_logging;
use sticker_core::models::StickerCount;
use tracing::{info, warn};

use super::state::{default_log_store, init_core_state, AppError, AppState};

pub const DEFAULT_PROJECT_TITLE: &str = "LINE Sticker Project";

pub const FAILED_STATUS: &str = "Failed to connect API";

/// 执行启动步骤并返回状态文字
///
/// 目录载入失败不影响项目创建；项目创建失败时返回 `FAILED_STATUS`。
pub async fn bootstrap(state: &AppState) -> String {
    if let Err(err) = state.controller.load_catalog().await {
        warn!("[Bootstrap] Provider 目录载入失败: {}", err);
    }

    let created = state
        .controller
        .create_project(Some(DEFAULT_PROJECT_TITLE.to_string()), StickerCount::Eight)
        .await;
    if let Err(err) = created {
        warn!("[Bootstrap] 创建项目失败: {}", err);
        return FAILED_STATUS.to_string();
    }

    match state.controller.snapshot().await.project {
        Some(project) => format!("Project {} ({})", project.id, project.status),
        None => FAILED_STATUS.to_string(),
    }
}

pub async fn run() -> Result<(), AppError> {
    let config = load_config()?;
    let logs = default_log_store(&config);
    init_logging(&config.logging, logs.clone());
    info!(
        "[Bootstrap] sticker-studio {} api={}",
        sticker_core::version(),
        config.api.base_url
    );

    let state = init_core_state(config, logs)?;
    let status = bootstrap(&state).await;
    info!("[Bootstrap] {}", status);
    println!("{status}");
    Ok(())
}
