//! Voice-platform webhook wire format.
//!
//! Every request field defaults when absent; the handler decides which ones
//! are actually required.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dialog::DialogReply;

/// Protocol version echoed in every response.
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct WebhookRequest {
    pub meta: RequestMeta,
    pub request: UtteranceRequest,
    pub session: Session,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RequestMeta {
    pub locale: String,
    /// IANA zone of the user's device, e.g. `Europe/Moscow`. Empty means UTC.
    pub timezone: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UtteranceRequest {
    #[serde(rename = "type")]
    pub kind: String,
    /// Normalized utterance; this is what the dialog matches against.
    pub command: String,
    pub original_utterance: String,
    pub markup: Markup,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Markup {
    pub dangerous_context: bool,
}

/// Session block, echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Session {
    pub new: bool,
    pub session_id: String,
    pub message_id: i64,
    pub skill_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookResponse {
    pub version: String,
    pub session: Session,
    pub response: ReplyBody,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReplyBody {
    pub text: String,
    pub tts: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    pub end_session: bool,
}

/// Quick reply. `hide` removes it once the user answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Button {
    pub title: String,
    pub hide: bool,
}

impl WebhookResponse {
    pub fn from_reply(session: Session, reply: DialogReply) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            session,
            response: ReplyBody {
                text: reply.text,
                tts: reply.tts,
                buttons: reply
                    .buttons
                    .into_iter()
                    .map(|title| Button { title, hide: true })
                    .collect(),
                end_session: reply.end_session,
            },
        }
    }
}
