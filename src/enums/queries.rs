use crate::models::data_model::ModelCategory;
use crate::models::user::Role;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct StatusFilter {
    /// Only return restaurants with this status.
    pub status: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct RoleFilter {
    pub role: Option<Role>,
}

#[derive(Deserialize, IntoParams)]
pub struct ModelCategoryFilter {
    pub category: Option<ModelCategory>,
}

#[derive(Deserialize, IntoParams)]
pub struct DocFilter {
    pub category: Option<String>,
    /// Case-insensitive match against title and content.
    pub q: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct LimitParam {
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
pub struct DaysParam {
    pub days: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub verified: bool,
}
