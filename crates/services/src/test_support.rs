//! 测试用内存网关，记录调用顺序并按脚本返回任务状态

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use sticker_core::models::{
    AiConfigUpdateRequest, AiCredentialsRequest, AiPipelineConfigRequest, Character,
    CharacterCreateRequest, CharacterSource, CharacterStatus, Draft, DraftStatus,
    DraftUpdateRequest, ExportResult, Job, JobKind, JobStatus, Project, ProjectCreateRequest,
    ProjectStatus, ProjectUpdateRequest, Provider, Sticker, StickerStatus, ThemeSuggestResponse,
    VerifiedProvidersResponse,
};
use sticker_core::{GatewayError, GatewayErrorKind};
use sticker_gateway::{GatewayResult, StickerGateway};

#[derive(Default)]
pub struct MockState {
    pub calls: Vec<String>,
    pub failing: HashSet<String>,
    pub providers: Vec<Provider>,
    pub verified: Vec<Provider>,
    pub job_scripts: HashMap<String, VecDeque<Job>>,
    pub enqueue_jobs: HashMap<String, Job>,
    pub drafts: Vec<Draft>,
    pub stickers: Vec<Sticker>,
    pub export: Option<ExportResult>,
    pub suggestions: Vec<String>,
    pub last_credentials: Option<AiCredentialsRequest>,
    pub last_ai_config: Option<AiConfigUpdateRequest>,
    pub last_pipeline: Option<AiPipelineConfigRequest>,
    pub last_theme: Option<String>,
    pub last_regenerated: Option<String>,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| *call == name).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// 让指定方法返回 500
    pub fn fail(&self, name: &str) {
        self.state.lock().failing.insert(name.to_string());
    }

    pub fn recover(&self, name: &str) {
        self.state.lock().failing.remove(name);
    }

    /// 按顺序返回的任务状态，最后一个状态会一直重复
    pub fn script_job(&self, job_id: &str, script: &[(JobStatus, Option<u8>, Option<&str>)]) {
        let jobs = script
            .iter()
            .map(|(status, progress, message)| {
                let mut job = job_with(job_id, JobKind::GenerateDraft, *status);
                job.progress = *progress;
                job.error_message = message.map(str::to_string);
                job
            })
            .collect();
        self.state.lock().job_scripts.insert(job_id.to_string(), jobs);
    }

    /// 入队方法（如 `generate_stickers`）返回的任务
    pub fn enqueue(&self, method: &str, job_id: &str, kind: JobKind) {
        self.state
            .lock()
            .enqueue_jobs
            .insert(method.to_string(), job_with(job_id, kind, JobStatus::Queued));
    }

    fn record(&self, name: &str) -> GatewayResult<()> {
        let mut state = self.state.lock();
        state.calls.push(name.to_string());
        if state.failing.contains(name) {
            return Err(GatewayError::from_status(500, name, "mock failure"));
        }
        Ok(())
    }

    fn enqueued(&self, name: &str) -> GatewayResult<Job> {
        self.record(name)?;
        self.state.lock().enqueue_jobs.get(name).cloned().ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::NotFound, name, "no job scripted")
        })
    }
}

pub fn project(id: &str) -> Project {
    Project {
        id: id.to_string(),
        title: Some("LINE Sticker Project".to_string()),
        theme: None,
        sticker_count: Default::default(),
        status: ProjectStatus::Draft,
        character_id: None,
        ai_provider: None,
        ai_model: None,
    }
}

pub fn provider(id: &str, models: &[&str]) -> Provider {
    Provider {
        id: id.to_string(),
        name: id.to_string(),
        models: models.iter().map(|model| model.to_string()).collect(),
    }
}

pub fn job_with(id: &str, kind: JobKind, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        kind,
        status,
        progress: None,
        error_message: None,
    }
}

pub fn draft(id: &str, index: u32, caption: &str) -> Draft {
    Draft {
        id: id.to_string(),
        project_id: "proj_123".to_string(),
        index,
        caption: caption.to_string(),
        image_prompt: format!("prompt for {caption}"),
        status: DraftStatus::Draft,
    }
}

pub fn sticker(id: &str, transparent_url: Option<&str>) -> Sticker {
    Sticker {
        id: id.to_string(),
        project_id: "proj_123".to_string(),
        draft_id: format!("draft_{id}"),
        image_url: format!("https://example.com/{id}.png"),
        transparent_url: transparent_url.map(str::to_string),
        status: StickerStatus::Ready,
    }
}

#[async_trait]
impl StickerGateway for MockGateway {
    async fn create_project(&self, request: &ProjectCreateRequest) -> GatewayResult<Project> {
        self.record("create_project")?;
        let mut created = project("proj_123");
        created.title = request.title.clone();
        created.sticker_count = request.sticker_count;
        Ok(created)
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        self.record("list_projects")?;
        Ok(vec![project("proj_123")])
    }

    async fn get_project(&self, project_id: &str) -> GatewayResult<Project> {
        self.record("get_project")?;
        Ok(project(project_id))
    }

    async fn update_project(
        &self,
        project_id: &str,
        request: &ProjectUpdateRequest,
    ) -> GatewayResult<Project> {
        self.record("update_project")?;
        self.state.lock().last_theme = request.theme.clone();
        let mut updated = project(project_id);
        updated.theme = request.theme.clone();
        Ok(updated)
    }

    async fn update_ai_config(
        &self,
        project_id: &str,
        request: &AiConfigUpdateRequest,
    ) -> GatewayResult<Project> {
        self.record("update_ai_config")?;
        self.state.lock().last_ai_config = Some(request.clone());
        let mut updated = project(project_id);
        updated.ai_provider = Some(request.ai_provider.clone());
        updated.ai_model = Some(request.ai_model.clone());
        Ok(updated)
    }

    async fn update_ai_pipeline(
        &self,
        project_id: &str,
        request: &AiPipelineConfigRequest,
    ) -> GatewayResult<Project> {
        self.record("update_ai_pipeline")?;
        self.state.lock().last_pipeline = Some(request.clone());
        Ok(project(project_id))
    }

    async fn list_providers(&self) -> GatewayResult<Vec<Provider>> {
        self.record("list_providers")?;
        Ok(self.state.lock().providers.clone())
    }

    async fn set_ai_credentials(
        &self,
        _project_id: &str,
        request: &AiCredentialsRequest,
    ) -> GatewayResult<()> {
        self.record("set_ai_credentials")?;
        self.state.lock().last_credentials = Some(request.clone());
        Ok(())
    }

    async fn verify_ai_credentials(&self, _project_id: &str) -> GatewayResult<()> {
        self.record("verify_ai_credentials")
    }

    async fn list_verified_providers(
        &self,
        _project_id: &str,
    ) -> GatewayResult<VerifiedProvidersResponse> {
        self.record("list_verified_providers")?;
        Ok(VerifiedProvidersResponse {
            providers: self.state.lock().verified.clone(),
        })
    }

    async fn create_character(
        &self,
        _project_id: &str,
        request: &CharacterCreateRequest,
    ) -> GatewayResult<Character> {
        self.record("create_character")?;
        Ok(Character {
            id: "char_456".to_string(),
            source_type: request.source_type,
            reference_image_url: match request.source_type {
                CharacterSource::Ai => None,
                _ => request.reference_image_url.clone(),
            },
            status: CharacterStatus::Ready,
        })
    }

    async fn suggest_theme(
        &self,
        _project_id: &str,
        _seed: Option<&str>,
    ) -> GatewayResult<ThemeSuggestResponse> {
        self.record("suggest_theme")?;
        Ok(ThemeSuggestResponse {
            suggestions: self.state.lock().suggestions.clone(),
        })
    }

    async fn generate_drafts(&self, _project_id: &str) -> GatewayResult<Job> {
        self.enqueued("generate_drafts")
    }

    async fn list_drafts(&self, _project_id: &str) -> GatewayResult<Vec<Draft>> {
        self.record("list_drafts")?;
        Ok(self.state.lock().drafts.clone())
    }

    async fn update_draft(
        &self,
        draft_id: &str,
        request: &DraftUpdateRequest,
    ) -> GatewayResult<Draft> {
        self.record("update_draft")?;
        let state = self.state.lock();
        let mut updated = state
            .drafts
            .iter()
            .find(|draft| draft.id == draft_id)
            .cloned()
            .unwrap_or_else(|| draft(draft_id, 0, ""));
        if let Some(caption) = &request.caption {
            updated.caption = caption.clone();
        }
        if let Some(image_prompt) = &request.image_prompt {
            updated.image_prompt = image_prompt.clone();
        }
        if let Some(status) = request.status {
            updated.status = status;
        }
        Ok(updated)
    }

    async fn generate_stickers(&self, _project_id: &str) -> GatewayResult<Job> {
        self.enqueued("generate_stickers")
    }

    async fn list_stickers(&self, _project_id: &str) -> GatewayResult<Vec<Sticker>> {
        self.record("list_stickers")?;
        Ok(self.state.lock().stickers.clone())
    }

    async fn regenerate_sticker(&self, sticker_id: &str) -> GatewayResult<Job> {
        self.state.lock().last_regenerated = Some(sticker_id.to_string());
        self.enqueued("regenerate_sticker")
    }

    async fn remove_background(&self, _project_id: &str) -> GatewayResult<Job> {
        self.enqueued("remove_background")
    }

    async fn export_project(&self, _project_id: &str) -> GatewayResult<ExportResult> {
        self.record("export_project")?;
        self.state.lock().export.clone().ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::NotFound, "export_project", "no export scripted")
        })
    }

    async fn get_job(&self, job_id: &str) -> GatewayResult<Job> {
        self.record("get_job")?;
        let mut state = self.state.lock();
        let script = state.job_scripts.get_mut(job_id).ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::NotFound, "get_job", "no job scripted")
        })?;
        let job = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        job.ok_or_else(|| GatewayError::new(GatewayErrorKind::NotFound, "get_job", "empty script"))
    }
}
