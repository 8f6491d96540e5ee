mod answers;
mod ranker;
mod service;
mod templates;

pub use answers::{AnswerBank, AnswerTag};
pub use ranker::{format_summary, select_nearest, SUMMARY_LIMIT, TRUNCATION_DISCLAIMER};
pub use service::{
    Clock, DialogReply, DialogRequest, DialogService, SystemClock, CHANGE_ADDRESS_COMMAND,
    GET_ADDRESS_COMMAND,
};
pub use templates::{IntentTemplate, DEFAULT_PATTERNS, MOVIE_CAPTURE};
