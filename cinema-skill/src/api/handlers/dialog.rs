use axum::extract::State;
use axum::Json;
use chrono_tz::Tz;

use crate::api::dto::{WebhookRequest, WebhookResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::dialog::DialogRequest;
use crate::error::{Result, SkillError};

/// `POST /dialog`
#[utoipa::path(
    post,
    path = "/dialog",
    tag = "dialog",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Skill reply", body = WebhookResponse),
        (status = 400, description = "Malformed payload, empty user id or unknown timezone", body = crate::api::response::ApiError),
    )
)]
pub async fn handle_dialog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<WebhookRequest>,
) -> Result<Json<WebhookResponse>> {
    let request = dialog_request(&payload)?;
    let reply = state.dialog.process(&request).await;
    Ok(Json(WebhookResponse::from_reply(payload.session, reply)))
}

fn dialog_request(payload: &WebhookRequest) -> Result<DialogRequest> {
    if payload.session.user_id.is_empty() {
        return Err(SkillError::Validation("session.user_id is empty".to_string()));
    }

    Ok(DialogRequest {
        user_id: payload.session.user_id.clone(),
        command: payload.request.command.clone(),
        timezone: parse_timezone(&payload.meta.timezone)?,
    })
}

/// Empty means UTC, anything else must be a known IANA zone.
fn parse_timezone(name: &str) -> Result<Tz> {
    if name.is_empty() {
        return Ok(Tz::UTC);
    }
    name.parse::<Tz>()
        .map_err(|_| SkillError::Validation(format!("Unknown timezone: {name}")))
}
