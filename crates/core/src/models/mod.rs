//! 数据模型
//!
//! 与远程 API 交互的 JSON 结构（camelCase）以及会话内的选择状态。

pub mod character;
pub mod draft;
pub mod export;
pub mod job;
pub mod pipeline;
pub mod project;
pub mod provider;
pub mod sticker;

pub use character::{Character, CharacterCreateRequest, CharacterSource, CharacterStatus};
pub use draft::{Draft, DraftStatus, DraftUpdateRequest};
pub use export::ExportResult;
pub use job::{Job, JobKind, JobStatus};
pub use pipeline::{
    AiCredentialsRequest, AiPipelineConfigRequest, Credential, PipelineConfig, Role,
    RoleSelection, RoleSelections,
};
pub use project::{
    AiConfigUpdateRequest, Project, ProjectCreateRequest, ProjectStatus, ProjectUpdateRequest,
    StickerCount, ThemeSuggestResponse,
};
pub use provider::{find_provider, Provider, VerifiedProvidersResponse};
pub use sticker::{Sticker, StickerStatus};
