use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cinema Skill API",
        version = "1.0.0",
        description = "Voice-assistant skill that finds the nearest movie showtimes around the user's home address.",
    ),
    paths(handlers::dialog::handle_dialog, handlers::health::health_check),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        dto::WebhookRequest,
        dto::RequestMeta,
        dto::UtteranceRequest,
        dto::Markup,
        dto::Session,
        dto::WebhookResponse,
        dto::ReplyBody,
        dto::Button,
        handlers::health::HealthData,
        handlers::health::StorageStatus,
    )),
    tags(
        (name = "dialog", description = "Voice-assistant webhook"),
        (name = "health", description = "Health check"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
