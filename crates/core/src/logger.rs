//! 日志管理模块
//!
//! - `init_logging` 安装 tracing-subscriber（EnvFilter + fmt + LogStoreLayer）
//! - `LogStore` 在内存中保留最近的日志，供界面展示
//! - 写入前统一脱敏，API Key 不会出现在日志里
use crate::config::LoggingConfig;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

pub struct LogStore {
    logs: VecDeque<LogEntry>,
    max_logs: usize,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::with_capacity(LoggingConfig::default().max_entries)
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_logs: usize) -> Self {
        Self {
            logs: VecDeque::new(),
            max_logs: max_logs.max(1),
        }
    }

    pub fn add(&mut self, level: &str, message: &str) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level.to_string(),
            message: sanitize_log_message(message),
        };
        self.logs.push_back(entry);
        while self.logs.len() > self.max_logs {
            self.logs.pop_front();
        }
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}

pub type SharedLogStore = Arc<parking_lot::RwLock<LogStore>>;

pub fn create_log_store_from_config(logging: &LoggingConfig) -> SharedLogStore {
    Arc::new(parking_lot::RwLock::new(LogStore::with_capacity(
        logging.max_entries,
    )))
}

/// 把 tracing 事件写入 `LogStore` 的 Layer
pub struct LogStoreLayer {
    store: SharedLogStore,
}

impl LogStoreLayer {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for LogStoreLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let level = event.metadata().level().as_str().to_lowercase();
        self.store.write().add(&level, &visitor.finish());
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        format!("{} {}", self.message, self.fields.join(" "))
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// 安装全局 tracing subscriber
///
/// `RUST_LOG` 优先于配置中的级别。重复调用时保持第一次安装的 subscriber。
pub fn init_logging(logging: &LoggingConfig, store: SharedLogStore) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(LogStoreLayer::new(store))
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber 已存在，跳过初始化");
    }
}

static SANITIZE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"Bearer\s+[A-Za-z0-9._-]+", "Bearer ***"),
        (
            r#"(?i)api[_-]?key["']?\s*[:=]\s*["']?[A-Za-z0-9._-]+"#,
            "api_key: ***",
        ),
        (r"\bsk-[A-Za-z0-9_-]{4,}", "sk-***"),
        (r#"token["']?\s*[:=]\s*["']?[A-Za-z0-9._-]+"#, "token: ***"),
        (
            r#"[Aa]uthorization["']?\s*[:=]\s*["']?[A-Za-z0-9._\s-]+"#,
            "authorization: ***",
        ),
        (
            r#"secret["']?\s*[:=]\s*["']?[A-Za-z0-9._-]+"#,
            "secret: ***",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// 日志脱敏
pub fn sanitize_log_message(message: &str) -> String {
    let mut sanitized = message.to_string();
    for (re, replacement) in SANITIZE_PATTERNS.iter() {
        sanitized = re.replace_all(&sanitized, *replacement).to_string();
    }
    sanitized
}
