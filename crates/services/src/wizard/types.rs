//! 向导类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use sticker_core::models::{Character, Draft, ExportResult, Project, Provider, Sticker};
use uuid::Uuid;

use crate::credential_gate::AiSettings;
use crate::retry::RetryCoordinator;

/// 向导步骤（按顺序）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    CreateProject,
    Character,
    Theme,
    Drafts,
    Generate,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        Self::CreateProject,
        Self::Character,
        Self::Theme,
        Self::Drafts,
        Self::Generate,
        Self::Preview,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateProject => "CREATE_PROJECT",
            Self::Character => "CHARACTER",
            Self::Theme => "THEME",
            Self::Drafts => "DRAFTS",
            Self::Generate => "GENERATE",
            Self::Preview => "PREVIEW",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// 操作结果提示
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// 是否显示重试入口
    pub retryable: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn error(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            retryable,
        }
    }
}

/// 单次向导会话的全部状态
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub step: WizardStep,
    pub project: Option<Project>,
    pub character: Option<Character>,
    /// Provider 目录（校验前的可选列表）
    pub catalog: Vec<Provider>,
    pub ai: AiSettings,
    pub theme_suggestions: Vec<String>,
    pub drafts: Vec<Draft>,
    pub stickers: Vec<Sticker>,
    pub export: Option<ExportResult>,
    pub notice: Option<Notice>,
    pub retry: RetryCoordinator,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            step: WizardStep::CreateProject,
            project: None,
            character: None,
            catalog: Vec::new(),
            ai: AiSettings::default(),
            theme_suggestions: Vec::new(),
            drafts: Vec::new(),
            stickers: Vec::new(),
            export: None,
            notice: None,
            retry: RetryCoordinator::default(),
        }
    }
}

impl SessionState {
    pub fn project_id(&self) -> Option<&str> {
        self.project.as_ref().map(|project| project.id.as_str())
    }

    /// 只推进到紧邻的下一步，其他目标保持不变
    pub fn advance_to(&mut self, target: WizardStep) -> bool {
        if target.index() == self.step.index() + 1 {
            self.step = target;
            true
        } else {
            false
        }
    }

    /// 清空与项目相关的数据，保留 Provider 目录和 AI 设置
    pub fn clear_project_data(&mut self) {
        self.character = None;
        self.theme_suggestions.clear();
        self.drafts.clear();
        self.stickers.clear();
        self.export = None;
        self.retry = RetryCoordinator::default();
        self.ai.reset_verification();
    }

    pub fn preview_urls(&self) -> Vec<String> {
        self.stickers
            .iter()
            .map(|sticker| sticker.display_url().to_string())
            .collect()
    }
}
