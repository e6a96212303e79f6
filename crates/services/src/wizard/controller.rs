//! 向导控制器
//!
//! 按 CREATE_PROJECT → CHARACTER → THEME → DRAFTS → GENERATE → PREVIEW 的顺序
//! 编排远程调用。每个操作都会写入 `Notice`，失败时停留在当前步骤。
//! 操作只能在其所需步骤或之后执行，成功后最多推进一步。
//! 会话状态的锁不会跨越网络调用持有，轮询期间仍可执行其他操作。

use std::collections::HashMap;
use std::sync::Arc;

use sticker_core::models::{
    CharacterCreateRequest, DraftUpdateRequest, Job, Project, ProjectCreateRequest,
    ProjectUpdateRequest, Provider, Role, StickerCount,
};
use sticker_core::{StudioConfig, StudioError};
use sticker_gateway::SharedGateway;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use super::types::{Notice, SessionState, WizardStep};
use crate::credential_gate::{self, CredentialGate};
use crate::job_poller::{JobPoller, JobProgress, PollOptions};
use crate::provider_sync;
use crate::retry::RetryAction;

/// 操作开始时捕获的会话信息
struct ActionContext {
    session_id: String,
    project_id: String,
    /// 失败时可重放的操作
    retry: Option<RetryAction>,
}

pub struct WizardController {
    gateway: SharedGateway,
    poller: Arc<JobPoller>,
    gate: CredentialGate,
    state: Arc<RwLock<SessionState>>,
}

impl WizardController {
    pub fn new(gateway: SharedGateway, config: &StudioConfig) -> Self {
        Self::with_options(
            gateway,
            PollOptions::from(&config.polling),
            config.background_models.clone(),
        )
    }

    pub fn with_options(
        gateway: SharedGateway,
        poll_options: PollOptions,
        background_models: HashMap<String, String>,
    ) -> Self {
        Self {
            poller: Arc::new(JobPoller::new(gateway.clone(), poll_options)),
            gate: CredentialGate::new(gateway.clone(), background_models),
            gateway,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn step(&self) -> WizardStep {
        self.state.read().await.step
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    /// 所有任务共用的进度通道，按 `job_id` 区分
    pub fn subscribe_progress(&self) -> watch::Receiver<JobProgress> {
        self.poller.subscribe()
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    pub async fn preview_urls(&self) -> Vec<String> {
        self.state.read().await.preview_urls()
    }

    /// 开始新的会话，Provider 目录保留
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let catalog = std::mem::take(&mut state.catalog);
        *state = SessionState {
            catalog,
            ..SessionState::default()
        };
        info!("[Wizard] 新会话 {}", state.session_id);
    }

    pub async fn load_catalog(&self) -> Result<(), StudioError> {
        let session_id = self.state.read().await.session_id.clone();
        let result = self
            .gateway
            .list_providers()
            .await
            .map_err(StudioError::from);
        self.settle(&session_id, None, result, |state, providers| {
            info!("[Wizard] 载入 Provider 目录 {} 个", providers.len());
            state.catalog = providers;
            None
        })
        .await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StudioError> {
        Ok(self.gateway.list_projects().await?)
    }

    pub async fn create_project(
        &self,
        title: Option<String>,
        sticker_count: StickerCount,
    ) -> Result<(), StudioError> {
        let session_id = {
            let mut state = self.state.write().await;
            state.notice = None;
            state.session_id.clone()
        };
        let request = ProjectCreateRequest {
            title,
            sticker_count,
        };
        let result = self
            .gateway
            .create_project(&request)
            .await
            .map_err(StudioError::from);
        self.settle(&session_id, None, result, |state, project| {
            info!("[Wizard] 创建项目 {} ({})", project.id, project.status);
            state.clear_project_data();
            state.project = Some(project);
            // 新项目从角色步骤重新开始
            state.step = WizardStep::Character;
            Some(Notice::success("项目已创建"))
        })
        .await
    }

    /// 重新拉取当前项目
    pub async fn refresh_project(&self) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin("refresh_project", WizardStep::CreateProject, None)
            .await?
        else {
            return Ok(());
        };
        let result = self
            .gateway
            .get_project(&ctx.project_id)
            .await
            .map_err(StudioError::from);
        self.settle(&ctx.session_id, None, result, |state, project| {
            state.project = Some(project);
            None
        })
        .await
    }

    pub async fn create_character(&self, request: CharacterCreateRequest) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin("create_character", WizardStep::Character, None)
            .await?
        else {
            return Ok(());
        };
        let result = self
            .gateway
            .create_character(&ctx.project_id, &request)
            .await
            .map_err(StudioError::from);
        self.settle(&ctx.session_id, None, result, |state, character| {
            info!("[Wizard] 角色已创建 {}", character.id);
            if let Some(project) = state.project.as_mut() {
                project.character_id = Some(character.id.clone());
            }
            state.character = Some(character);
            state.advance_to(WizardStep::Theme);
            Some(Notice::success("角色已创建"))
        })
        .await
    }

    pub async fn suggest_themes(&self, seed: Option<&str>) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin("suggest_themes", WizardStep::Theme, None)
            .await?
        else {
            return Ok(());
        };
        let seed = seed.map(str::trim).filter(|seed| !seed.is_empty());
        let result = self
            .gateway
            .suggest_theme(&ctx.project_id, seed)
            .await
            .map_err(StudioError::from);
        self.settle(&ctx.session_id, None, result, |state, response| {
            state.theme_suggestions = response.suggestions;
            None
        })
        .await
    }

    pub async fn set_api_key(&self, api_key: &str) {
        self.state.write().await.ai.set_api_key(api_key);
    }

    pub async fn set_api_base(&self, api_base: Option<&str>) {
        self.state.write().await.ai.set_api_base(api_base);
    }

    pub async fn set_credential_provider(&self, provider: &str) {
        self.state.write().await.ai.set_credential_provider(provider);
    }

    pub async fn select_provider(&self, role: Role, provider_id: &str) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.ai.select_provider(role, provider_id, &state.catalog);
    }

    pub async fn select_model(&self, role: Role, model: &str) {
        let mut state = self.state.write().await;
        provider_sync::select_model(&mut state.ai.selections, role, model);
    }

    pub async fn set_custom_model(&self, role: Role, custom_model_id: &str) {
        let mut state = self.state.write().await;
        provider_sync::set_custom_model(&mut state.ai.selections, role, custom_model_id);
    }

    /// 当前可选的 Provider（校验前为目录，校验后为已验证列表）
    pub async fn applicable_providers(&self) -> Vec<Provider> {
        let state = self.state.read().await;
        state.ai.applicable_providers(&state.catalog).to_vec()
    }

    /// 保存主题并完成凭证校验
    ///
    /// 本地校验失败时不发起任何请求。校验成功后用第一个已验证 Provider
    /// 填充默认选择并进入 DRAFTS。
    pub async fn submit_theme(&self, theme: &str) -> Result<(), StudioError> {
        let (ctx, credential, selections) = {
            let mut state = self.state.write().await;
            let Some(project_id) = state.project_id().map(str::to_string) else {
                debug!("[Wizard] submit_theme 跳过：尚未创建项目");
                return Ok(());
            };
            require_step(&state, "submit_theme", WizardStep::Theme)?;
            state.ai.reset_verification();
            state.notice = None;
            let ctx = ActionContext {
                session_id: state.session_id.clone(),
                project_id,
                retry: None,
            };
            (ctx, state.ai.credential().clone(), state.ai.selections.clone())
        };

        if let Err(err) = credential_gate::validate(&credential, &selections.pipeline) {
            let err = StudioError::from(err);
            self.report_failure(&ctx.session_id, &err, None).await;
            return Err(err);
        }

        let theme = theme.trim().to_string();
        let result = async {
            let project = self
                .gateway
                .update_project(
                    &ctx.project_id,
                    &ProjectUpdateRequest {
                        theme: Some(theme.clone()),
                    },
                )
                .await?;
            let verification = self
                .gate
                .verify(&ctx.project_id, &credential, &selections)
                .await?;
            Ok::<_, StudioError>((project, verification))
        }
        .await;

        self.settle(&ctx.session_id, None, result, |state, (themed, verification)| {
            let mut project = verification.project;
            if project.theme.is_none() {
                project.theme = themed.theme;
            }
            state.project = Some(project);

            if state.ai.credential().api_key != credential.api_key {
                debug!("[Wizard] 校验期间 API Key 已修改，丢弃校验结果");
                return Some(Notice::warning("API Key 已修改，请重新提交"));
            }
            self.gate
                .apply_defaults(&mut state.ai.selections, &verification.providers);
            state.ai.mark_verified(verification.providers);
            state.advance_to(WizardStep::Drafts);
            Some(Notice::success("AI 设置已验证"))
        })
        .await
    }

    /// 生成（或重新生成全部）文案草稿
    pub async fn generate_drafts(&self) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin(
                "generate_drafts",
                WizardStep::Drafts,
                Some(RetryAction::GenerateDrafts),
            )
            .await?
        else {
            return Ok(());
        };
        let result = async {
            let job = self.gateway.generate_drafts(&ctx.project_id).await?;
            self.await_job(&job).await?;
            Ok::<_, StudioError>(self.gateway.list_drafts(&ctx.project_id).await?)
        }
        .await;
        self.settle(&ctx.session_id, ctx.retry.as_ref(), result, |state, drafts| {
            info!("[Wizard] 草稿生成完成 {} 条", drafts.len());
            state.drafts = drafts;
            state.advance_to(WizardStep::Generate);
            Some(Notice::success("文案草稿已生成"))
        })
        .await
    }

    /// 更新单条草稿，后写入者覆盖
    pub async fn update_draft(
        &self,
        draft_id: &str,
        request: DraftUpdateRequest,
    ) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin("update_draft", WizardStep::Generate, None)
            .await?
        else {
            return Ok(());
        };
        let result = self
            .gateway
            .update_draft(draft_id, &request)
            .await
            .map_err(StudioError::from);
        self.settle(&ctx.session_id, None, result, |state, draft| {
            match state.drafts.iter_mut().find(|existing| existing.id == draft.id) {
                Some(existing) => *existing = draft,
                None => state.drafts.push(draft),
            }
            Some(Notice::success("草稿已保存"))
        })
        .await
    }

    pub async fn generate_stickers(&self) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin(
                "generate_stickers",
                WizardStep::Generate,
                Some(RetryAction::GenerateStickers),
            )
            .await?
        else {
            return Ok(());
        };
        let result = async {
            let job = self.gateway.generate_stickers(&ctx.project_id).await?;
            self.await_job(&job).await?;
            Ok::<_, StudioError>(self.gateway.list_stickers(&ctx.project_id).await?)
        }
        .await;
        self.settle(&ctx.session_id, ctx.retry.as_ref(), result, |state, stickers| {
            info!("[Wizard] 贴图生成完成 {} 张", stickers.len());
            state.stickers = stickers;
            state.advance_to(WizardStep::Preview);
            Some(Notice::success("贴图已生成"))
        })
        .await
    }

    pub async fn regenerate_sticker(&self, sticker_id: &str) -> Result<(), StudioError> {
        let action = RetryAction::RegenerateSticker {
            sticker_id: sticker_id.to_string(),
        };
        let Some(ctx) = self
            .begin("regenerate_sticker", WizardStep::Preview, Some(action))
            .await?
        else {
            return Ok(());
        };
        let result = async {
            let job = self.gateway.regenerate_sticker(sticker_id).await?;
            self.await_job(&job).await?;
            Ok::<_, StudioError>(self.gateway.list_stickers(&ctx.project_id).await?)
        }
        .await;
        self.settle(&ctx.session_id, ctx.retry.as_ref(), result, |state, stickers| {
            state.stickers = stickers;
            Some(Notice::success("贴图已重新生成"))
        })
        .await
    }

    pub async fn remove_background(&self) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin(
                "remove_background",
                WizardStep::Preview,
                Some(RetryAction::RemoveBackground),
            )
            .await?
        else {
            return Ok(());
        };
        let result = async {
            let job = self.gateway.remove_background(&ctx.project_id).await?;
            self.await_job(&job).await?;
            Ok::<_, StudioError>(self.gateway.list_stickers(&ctx.project_id).await?)
        }
        .await;
        self.settle(&ctx.session_id, ctx.retry.as_ref(), result, |state, stickers| {
            state.stickers = stickers;
            Some(Notice::success("去背完成"))
        })
        .await
    }

    /// 导出，带警告时仍保留下载链接
    pub async fn export(&self) -> Result<(), StudioError> {
        let Some(ctx) = self
            .begin("export", WizardStep::Preview, Some(RetryAction::Export))
            .await?
        else {
            return Ok(());
        };
        let result = self
            .gateway
            .export_project(&ctx.project_id)
            .await
            .map_err(StudioError::from);
        self.settle(&ctx.session_id, ctx.retry.as_ref(), result, |state, export| {
            let notice = if export.has_warnings() {
                warn!("[Wizard] 导出完成，警告 {} 条", export.warnings.len());
                Notice::warning(format!(
                    "导出完成，但有 {} 条提示：{}",
                    export.warnings.len(),
                    export.warnings.join("；")
                ))
            } else {
                Notice::success("导出完成")
            };
            state.export = Some(export);
            Some(notice)
        })
        .await
    }

    /// 重放最近一次失败的任务操作
    pub async fn retry(&self) -> Result<(), StudioError> {
        let pending = self.state.read().await.retry.pending().cloned();
        let Some(action) = pending else {
            return Err(StudioError::NothingToRetry);
        };
        info!("[Wizard] 重试 {:?}", action);
        match action {
            RetryAction::GenerateDrafts => self.generate_drafts().await,
            RetryAction::GenerateStickers => self.generate_stickers().await,
            RetryAction::RegenerateSticker { sticker_id } => {
                self.regenerate_sticker(&sticker_id).await
            }
            RetryAction::RemoveBackground => self.remove_background().await,
            RetryAction::Export => self.export().await,
        }
    }

    /// 回到之前的步骤
    pub async fn go_back(&self, target: WizardStep) -> Result<(), StudioError> {
        let mut state = self.state.write().await;
        if target >= state.step {
            warn!("[Wizard] 非法跳转 {} -> {}", state.step, target);
            return Err(StudioError::InvalidTransition {
                from: state.step.to_string(),
                to: target.to_string(),
            });
        }
        info!("[Wizard] 返回 {} -> {}", state.step, target);
        state.step = target;
        state.notice = None;
        Ok(())
    }

    /// 需要项目的操作统一入口
    ///
    /// 尚未创建项目时返回 `Ok(None)`；当前步骤早于 `required` 时拒绝，状态不变。
    async fn begin(
        &self,
        action: &str,
        required: WizardStep,
        retry: Option<RetryAction>,
    ) -> Result<Option<ActionContext>, StudioError> {
        let mut state = self.state.write().await;
        let Some(project_id) = state.project_id().map(str::to_string) else {
            debug!("[Wizard] {} 跳过：尚未创建项目", action);
            return Ok(None);
        };
        require_step(&state, action, required)?;
        if let Some(retry) = &retry {
            state.retry.record(retry.clone());
        }
        state.notice = None;
        debug!("[Wizard] {} project={}", action, project_id);
        Ok(Some(ActionContext {
            session_id: state.session_id.clone(),
            project_id,
            retry,
        }))
    }

    async fn await_job(&self, job: &Job) -> Result<Job, StudioError> {
        debug!("[Wizard] 等待任务 {} ({:?})", job.id, job.kind);
        self.poller.poll(&job.id).await?.into_result()
    }

    /// 写回操作结果；会话已被重置时丢弃
    ///
    /// `retry` 是本次操作自身的重试记录，失败时据此决定重试入口。
    async fn settle<T, F>(
        &self,
        session_id: &str,
        retry: Option<&RetryAction>,
        result: Result<T, StudioError>,
        apply: F,
    ) -> Result<(), StudioError>
    where
        F: FnOnce(&mut SessionState, T) -> Option<Notice>,
    {
        match result {
            Ok(value) => {
                let mut state = self.state.write().await;
                if state.session_id != session_id {
                    debug!("[Wizard] 会话已重置，丢弃结果");
                    return Ok(());
                }
                if retry.is_some() {
                    state.retry.on_success();
                }
                let notice = apply(&mut *state, value);
                state.notice = notice;
                Ok(())
            }
            Err(err) => {
                self.report_failure(session_id, &err, retry).await;
                Err(err)
            }
        }
    }

    async fn report_failure(
        &self,
        session_id: &str,
        err: &StudioError,
        retry: Option<&RetryAction>,
    ) {
        warn!("[Wizard] 操作失败 ({:?}): {}", err.category(), err);
        let mut state = self.state.write().await;
        if state.session_id != session_id {
            return;
        }
        let retryable = match retry {
            Some(action) => {
                state.retry.on_failure(action, err);
                state.retry.is_available()
            }
            None => false,
        };
        state.notice = Some(Notice::error(err.user_message(), retryable));
    }
}

fn require_step(
    state: &SessionState,
    action: &str,
    required: WizardStep,
) -> Result<(), StudioError> {
    if state.step >= required {
        return Ok(());
    }
    warn!("[Wizard] {} 需要步骤 {}，当前 {}", action, required, state.step);
    Err(StudioError::InvalidTransition {
        from: state.step.to_string(),
        to: required.to_string(),
    })
}
