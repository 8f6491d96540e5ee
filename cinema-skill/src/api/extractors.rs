use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::SkillError;

/// JSON body whose decode failures answer with the error envelope instead of axum's plain text.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SkillError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for SkillError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> SkillError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            match extract_missing_field(&message) {
                Some(field) => SkillError::Validation(format!("Missing required field: {field}")),
                None => SkillError::Validation(format!("Invalid webhook payload: {message}")),
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            SkillError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            SkillError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            SkillError::Internal("Failed to read request body".to_string())
        }
        _ => SkillError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
