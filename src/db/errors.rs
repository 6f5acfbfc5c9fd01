use crate::utils::errors::{classify_code, Category, Classify, Severity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Document already exists: {0}")]
    AlreadyExists(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend error {code}: {message}")]
    Backend { code: String, message: String },
    #[error("Malformed document: {0}")]
    Decode(String),
}

impl StoreError {
    /// Builds an error from a backend status string such as `NOT_FOUND`.
    pub fn from_status(code: &str, message: String) -> Self {
        match code {
            "NOT_FOUND" => StoreError::NotFound(message),
            "ALREADY_EXISTS" => StoreError::AlreadyExists(message),
            "PERMISSION_DENIED" => StoreError::PermissionDenied(message),
            "UNAUTHENTICATED" => StoreError::Unauthenticated(message),
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" => StoreError::Unavailable(message),
            other => StoreError::Backend {
                code: other.to_string(),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl Classify for StoreError {
    fn category(&self) -> Category {
        match self {
            StoreError::NotFound(_) | StoreError::AlreadyExists(_) | StoreError::Decode(_) => {
                Category::Database
            }
            StoreError::PermissionDenied(_) | StoreError::Unauthenticated(_) => Category::Auth,
            StoreError::Unavailable(_) => Category::Network,
            StoreError::Backend { code, .. } => classify_code(code).0,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            StoreError::NotFound(_) => Severity::Warning,
            StoreError::Backend { code, .. } => classify_code(code).1,
            _ => Severity::Error,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            StoreError::NotFound(_) => Some("The requested record no longer exists.".to_string()),
            StoreError::AlreadyExists(_) => {
                Some("A record with this id already exists.".to_string())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("Invalid storage configuration: {0}")]
    Config(String),
    #[error("Failed to presign request: {0}")]
    Presign(String),
    #[error("Storage operation failed: {0}")]
    Operation(String),
}

impl Classify for S3Error {
    fn category(&self) -> Category {
        Category::Storage
    }
}
