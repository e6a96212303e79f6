//! 重试协调
//!
//! 记录最近一次会产生任务的操作。任务失败或轮询超时后可重试；
//! 导出没有任务，网关失败即可重试。成功或新的尝试会隐藏重试入口。
//! 多个操作并发时，重试入口总是指向实际失败的那个操作。

use serde::Serialize;
use sticker_core::StudioError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RetryAction {
    GenerateDrafts,
    GenerateStickers,
    RegenerateSticker { sticker_id: String },
    RemoveBackground,
    Export,
}

impl RetryAction {
    fn enabled_by(&self, error: &StudioError) -> bool {
        match error {
            StudioError::JobFailed { .. } | StudioError::JobTimedOut { .. } => true,
            StudioError::Gateway(_) => matches!(self, Self::Export),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetryCoordinator {
    last_action: Option<RetryAction>,
    available: bool,
}

impl RetryCoordinator {
    /// 记录新的尝试，同时隐藏之前的重试入口
    pub fn record(&mut self, action: RetryAction) {
        self.last_action = Some(action);
        self.available = false;
    }

    pub fn on_success(&mut self) {
        self.available = false;
    }

    /// `action` 是失败的操作本身，不一定是最近一次记录的操作
    pub fn on_failure(&mut self, action: &RetryAction, error: &StudioError) {
        self.available = action.enabled_by(error);
        self.last_action = Some(action.clone());
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn last_action(&self) -> Option<&RetryAction> {
        self.last_action.as_ref()
    }

    /// 可重试时返回要重放的操作
    pub fn pending(&self) -> Option<&RetryAction> {
        if self.available {
            self.last_action.as_ref()
        } else {
            None
        }
    }
}
