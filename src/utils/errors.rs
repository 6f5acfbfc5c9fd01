use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;

pub const DEFAULT_USER_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Database,
    Storage,
    Network,
    Auth,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Database => "database",
            Category::Storage => "storage",
            Category::Network => "network",
            Category::Auth => "auth",
            Category::Unknown => "unknown",
        }
    }

    /// Generic message shown when neither the caller nor the error supplies one.
    pub fn generic_message(&self) -> &'static str {
        match self {
            Category::Database => "We couldn't load or save this data. Please try again.",
            Category::Storage => "The file could not be uploaded or retrieved. Please try again.",
            Category::Network => "Unable to reach the server. Check your connection and try again.",
            Category::Auth => "You don't have permission to perform this action.",
            Category::Unknown => DEFAULT_USER_MESSAGE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every error type that can reach a service boundary.
pub trait Classify: fmt::Display {
    fn category(&self) -> Category;

    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// A message that is safe to show to a dashboard user, if the error has one.
    fn user_message(&self) -> Option<String> {
        None
    }
}

/// Maps backend status codes (`PERMISSION_DENIED`, `permission-denied`,
/// `storage/object-not-found`, ...) onto the taxonomy.
pub fn classify_code(code: &str) -> (Category, Severity) {
    let normalized = code.trim().to_lowercase().replace('_', "-");
    if normalized.starts_with("auth/") {
        return (Category::Auth, Severity::Error);
    }
    if normalized.starts_with("storage/") {
        return (Category::Storage, Severity::Error);
    }
    let normalized = normalized
        .strip_prefix("firestore/")
        .unwrap_or(&normalized)
        .to_string();

    match normalized.as_str() {
        "permission-denied" | "unauthenticated" => (Category::Auth, Severity::Error),
        "unavailable" | "deadline-exceeded" | "network-request-failed" | "cancelled" => {
            (Category::Network, Severity::Error)
        }
        "data-loss" | "internal" => (Category::Database, Severity::Critical),
        "not-found" => (Category::Database, Severity::Warning),
        "already-exists" | "failed-precondition" | "aborted" | "out-of-range"
        | "invalid-argument" | "resource-exhausted" | "unimplemented" => {
            (Category::Database, Severity::Error)
        }
        _ => (Category::Unknown, Severity::Error),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ErrorContext {
    pub component: String,
    pub action: String,
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl ErrorContext {
    pub fn new(component: &str, action: &str) -> Self {
        Self {
            component: component.to_string(),
            action: action.to_string(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandleOptions {
    pub severity: Option<Severity>,
    pub category: Option<Category>,
    pub user_message: Option<String>,
}

impl HandleOptions {
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, thiserror::Error)]
#[error("{message}")]
pub struct HandledError {
    pub message: String,
    pub detail: String,
    pub severity: Severity,
    pub category: Category,
    pub context: ErrorContext,
    pub occurred_at: DateTime<Utc>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|m| !m.trim().is_empty())
}

/// Classifies `err`, logs it with its context and returns the structured
/// result the dashboard renders. The returned message is never empty.
pub fn handle_error<E: Classify + ?Sized>(
    err: &E,
    ctx: &ErrorContext,
    opts: HandleOptions,
) -> HandledError {
    let category = opts.category.unwrap_or_else(|| err.category());
    let severity = opts.severity.unwrap_or_else(|| err.severity());
    let detail = err.to_string();

    let message = non_empty(opts.user_message)
        .or_else(|| non_empty(err.user_message()))
        .unwrap_or_else(|| category.generic_message().to_string());

    let extra = if ctx.extra.is_empty() {
        String::new()
    } else {
        format!(" {}", Value::Object(ctx.extra.clone()))
    };
    match severity {
        Severity::Info => info!(
            "[{}] {}::{}: {}{}",
            category, ctx.component, ctx.action, detail, extra
        ),
        Severity::Warning => warn!(
            "[{}] {}::{}: {}{}",
            category, ctx.component, ctx.action, detail, extra
        ),
        Severity::Error => error!(
            "[{}] {}::{}: {}{}",
            category, ctx.component, ctx.action, detail, extra
        ),
        Severity::Critical => error!(
            "[critical] [{}] {}::{}: {}{}",
            category, ctx.component, ctx.action, detail, extra
        ),
    }

    HandledError {
        message,
        detail,
        severity,
        category,
        context: ctx.clone(),
        occurred_at: Utc::now(),
    }
}

/// Bounded, newest-last buffer of handled errors shared by all services.
#[derive(Clone)]
pub struct ErrorLog {
    entries: Arc<Mutex<VecDeque<HandledError>>>,
    capacity: usize,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn handle<E: Classify + ?Sized>(
        &self,
        err: &E,
        ctx: &ErrorContext,
        opts: HandleOptions,
    ) -> HandledError {
        let handled = handle_error(err, ctx, opts);
        self.record(handled.clone());
        handled
    }

    pub fn record(&self, handled: HandledError) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(handled);
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<HandledError> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(100)
    }
}
