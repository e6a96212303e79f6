//! 应用装配模块
//!
//! - `state`: 应用状态初始化
//! - `bootstrap`: 启动流程

mod bootstrap;
mod state;

pub use bootstrap::{bootstrap, run, DEFAULT_PROJECT_TITLE, FAILED_STATUS};
pub use state::{init_core_state, init_with_gateway, AppError, AppState};
