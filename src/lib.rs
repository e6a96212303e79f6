//! Sticker Studio - LINE 贴图制作向导客户端
//!
//! ## Workspace 结构
//!
//! - sticker-core crate（models, config, errors, logger）
//! - sticker-gateway crate（远程 API trait 与 reqwest 实现）
//! - sticker-services crate（任务轮询、凭证校验、重试、向导控制器）
//! - 主 crate 负责装配与启动

pub mod app;

pub use app::{bootstrap, init_core_state, run, AppError, AppState};

// 从子 crate 重新导出常用类型
pub use sticker_core::{LogEntry, LogStore, SharedLogStore, StudioConfig, StudioError};
pub use sticker_gateway::{HttpGateway, SharedGateway, StickerGateway};
pub use sticker_services::{Notice, NoticeLevel, WizardController, WizardStep};
