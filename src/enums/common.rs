use crate::utils::errors::HandledError;
use serde::Serialize;
use utoipa::ToSchema;

/// Envelope every API response uses: `status` is `"ok"` or `"error"`.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<&HandledError> for ApiResponse<T> {
    fn from(err: &HandledError) -> Self {
        Self::error(err.message.clone())
    }
}

#[derive(Serialize, ToSchema)]
pub struct GeneralResponse {
    pub status: String,
    pub error: Option<String>,
}

impl GeneralResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UploadUrl {
    /// Presigned PUT URL; upload the image body directly to it.
    pub upload_url: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthReport {
    pub status: String,
    pub store: String,
    pub simulation_running: bool,
}
