//! 业务服务模块
//!
//! 向导控制器及其依赖的任务轮询、凭证校验、Provider 同步与重试协调。

pub mod credential_gate;
pub mod job_poller;
pub mod provider_sync;
pub mod retry;
pub mod wizard;

#[cfg(test)]
mod test_support;

pub use credential_gate::{AiSettings, CredentialGate, VerificationResult, VerificationState};
pub use job_poller::{JobPoller, JobProgress, PollOptions, PollOutcome};
pub use retry::{RetryAction, RetryCoordinator};
pub use wizard::{Notice, NoticeLevel, SessionState, WizardController, WizardStep};
