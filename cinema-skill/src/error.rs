use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::ApiResponse;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("No such movie found: {0}")]
    MovieNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl SkillError {
    /// Location or movie could not be resolved. The user can be reprompted.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SkillError::UnknownLocation(_) | SkillError::MovieNotFound(_)
        )
    }
}

impl IntoResponse for SkillError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
