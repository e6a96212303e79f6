//! 后台任务轮询
//!
//! 按固定间隔拉取 `GET /jobs/{id}`，直到任务进入终止状态或次数耗尽。
//! 同一任务同时只允许一个轮询；进度通过 watch channel 实时发布。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use sticker_core::config::PollingConfig;
use sticker_core::errors::JOB_FAILED_FALLBACK;
use sticker_core::models::{Job, JobStatus};
use sticker_core::StudioError;
use sticker_gateway::SharedGateway;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollOptions {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: config.interval(),
            max_attempts: config.max_attempts,
        }
    }
}

/// 轮询结果
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Success(Job),
    /// 任务失败，`message` 为服务端原因或通用提示
    Failed { job: Job, message: String },
    /// 次数耗尽，携带最后一次观察到的非终止状态
    TimedOut(Job),
}

impl PollOutcome {
    pub fn job(&self) -> &Job {
        match self {
            Self::Success(job) | Self::TimedOut(job) => job,
            Self::Failed { job, .. } => job,
        }
    }

    /// 非成功结果转换为对应的 `StudioError`
    pub fn into_result(self) -> Result<Job, StudioError> {
        match self {
            Self::Success(job) => Ok(job),
            Self::Failed { job, message } => Err(StudioError::JobFailed {
                job_id: job.id,
                message,
            }),
            Self::TimedOut(job) => Err(StudioError::JobTimedOut {
                job_id: job.id,
                last_status: job.status,
            }),
        }
    }
}

/// 最近一次拉取到的任务进度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub job_id: String,
    pub status: Option<JobStatus>,
    pub progress: u8,
}

pub struct JobPoller {
    gateway: SharedGateway,
    options: PollOptions,
    in_flight: Arc<Mutex<HashSet<String>>>,
    progress_tx: watch::Sender<JobProgress>,
    /// 每个任务最后一次拉取到的进度
    progress_by_job: Mutex<HashMap<String, JobProgress>>,
}

impl JobPoller {
    pub fn new(gateway: SharedGateway, options: PollOptions) -> Self {
        let (progress_tx, _) = watch::channel(JobProgress::default());
        Self {
            gateway,
            options,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            progress_tx,
            progress_by_job: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> PollOptions {
        self.options
    }

    /// 订阅所有任务共用的进度通道
    ///
    /// 通道只保留最近一次拉取，多个任务同时轮询时会互相覆盖，
    /// 需要按 `job_id` 区分；单个任务的进度用 `progress_of`。
    pub fn subscribe(&self) -> watch::Receiver<JobProgress> {
        self.progress_tx.subscribe()
    }

    pub fn latest_progress(&self) -> JobProgress {
        self.progress_tx.borrow().clone()
    }

    pub fn progress_of(&self, job_id: &str) -> Option<JobProgress> {
        self.progress_by_job.lock().get(job_id).cloned()
    }

    pub fn is_polling(&self, job_id: &str) -> bool {
        self.in_flight.lock().contains(job_id)
    }

    /// 轮询任务直到终止或次数耗尽
    ///
    /// 第一次拉取不等待，两次拉取之间等待 `interval`。拉取本身失败时直接返回该错误。
    pub async fn poll(&self, job_id: &str) -> Result<PollOutcome, StudioError> {
        if !self.in_flight.lock().insert(job_id.to_string()) {
            warn!("[JobPoller] 任务 {} 已在轮询中", job_id);
            return Err(StudioError::PollInFlight(job_id.to_string()));
        }
        let in_flight = self.in_flight.clone();
        let key = job_id.to_string();
        let _release = scopeguard::guard((), move |_| {
            in_flight.lock().remove(&key);
        });

        let max_attempts = self.options.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let job = self.gateway.get_job(job_id).await?;
            self.publish(&job);
            debug!(
                "[JobPoller] {} 第 {}/{} 次: {} {}%",
                job_id,
                attempt,
                max_attempts,
                job.status,
                job.progress_percent()
            );

            match job.status {
                JobStatus::Success => return Ok(PollOutcome::Success(job)),
                JobStatus::Failed => {
                    let message = job.failure_reason().unwrap_or(JOB_FAILED_FALLBACK).to_string();
                    return Ok(PollOutcome::Failed { job, message });
                }
                JobStatus::Queued | JobStatus::Running => {}
            }

            if attempt >= max_attempts {
                warn!(
                    "[JobPoller] {} 轮询 {} 次仍未结束，最后状态 {}",
                    job_id, max_attempts, job.status
                );
                return Ok(PollOutcome::TimedOut(job));
            }
            attempt += 1;
            tokio::time::sleep(self.options.interval).await;
        }
    }

    fn publish(&self, job: &Job) {
        let progress = JobProgress {
            job_id: job.id.clone(),
            status: Some(job.status),
            progress: job.progress_percent(),
        };
        self.progress_by_job
            .lock()
            .insert(job.id.clone(), progress.clone());
        self.progress_tx.send_replace(progress);
    }
}
