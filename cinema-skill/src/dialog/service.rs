use std::sync::Arc;

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, warn};

use crate::config::DialogConfig;
use crate::db::LocationStore;
use crate::error::SkillError;
use crate::geocoding::LocationResolver;
use crate::models::{DialogStage, LocationState};
use crate::showtimes::ShowtimeProvider;

use super::answers::{AnswerBank, AnswerTag};
use super::ranker::{format_summary, select_nearest};
use super::templates::IntentTemplate;

pub const GET_ADDRESS_COMMAND: &str = "Мой адрес";
pub const CHANGE_ADDRESS_COMMAND: &str = "Изменить адрес";

/// Source of the current instant. Showtimes later than this are not reported.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One incoming utterance.
#[derive(Debug, Clone)]
pub struct DialogRequest {
    pub user_id: String,
    pub command: String,
    pub timezone: Tz,
}

/// What the skill says back. `text` and `tts` carry the same phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogReply {
    pub text: String,
    pub tts: String,
    pub buttons: Vec<String>,
    pub end_session: bool,
}

impl DialogReply {
    pub fn say(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tts: text.clone(),
            text,
            buttons: Vec::new(),
            end_session: false,
        }
    }

    /// Reply offering the address commands as quick replies.
    pub fn with_buttons(text: impl Into<String>) -> Self {
        Self {
            buttons: vec![
                GET_ADDRESS_COMMAND.to_string(),
                CHANGE_ADDRESS_COMMAND.to_string(),
            ],
            ..Self::say(text)
        }
    }

    pub fn terminal(text: impl Into<String>) -> Self {
        Self {
            end_session: true,
            ..Self::say(text)
        }
    }
}

/// Per-turn dialog logic: location collection first, then showtime search.
pub struct DialogService {
    store: Arc<dyn LocationStore>,
    resolver: Arc<dyn LocationResolver>,
    showtimes: Arc<dyn ShowtimeProvider>,
    template: IntentTemplate,
    answers: AnswerBank,
    clock: Arc<dyn Clock>,
}

impl DialogService {
    pub fn new(
        store: Arc<dyn LocationStore>,
        resolver: Arc<dyn LocationResolver>,
        showtimes: Arc<dyn ShowtimeProvider>,
        config: &DialogConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            showtimes,
            template: IntentTemplate::default(),
            answers: AnswerBank::new(config.answer_seed),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn answers(&self) -> &AnswerBank {
        &self.answers
    }

    /// Handles one turn. Always produces a reply; failures become canned answers.
    pub async fn process(&self, request: &DialogRequest) -> DialogReply {
        let state = match self.store.get(&request.user_id).await {
            Ok(state) => state,
            Err(e) => {
                error!(user_id = %request.user_id, error = %e, "Failed to load location state");
                return self.system_error();
            }
        };

        let stage = state.stage();
        debug!(user_id = %request.user_id, stage = %stage, "Processing dialog turn");

        match stage {
            DialogStage::New => self.ask_location(request, state).await,
            DialogStage::AwaitingLocation => self.collect_location(request).await,
            DialogStage::Ready => self.serve_ready(request, state).await,
        }
    }

    async fn ask_location(&self, request: &DialogRequest, mut state: LocationState) -> DialogReply {
        state.await_location();
        if let Err(e) = self.store.save(&request.user_id, &state).await {
            error!(user_id = %request.user_id, error = %e, "Failed to save location state");
            return self.system_error();
        }

        debug!(user_id = %request.user_id, branch = "ask_location");
        DialogReply::say(self.answers.pick(AnswerTag::AskLocation))
    }

    async fn collect_location(&self, request: &DialogRequest) -> DialogReply {
        let location = match self.resolver.resolve(&request.command).await {
            Ok(location) => location,
            Err(e) if e.is_not_found() => {
                debug!(user_id = %request.user_id, branch = "unknown_location", "{}", e);
                return DialogReply::say(self.answers.pick(AnswerTag::UnknownLocation));
            }
            Err(e) => {
                warn!(user_id = %request.user_id, error = %e, "Location lookup failed");
                return self.system_error();
            }
        };

        let state = LocationState::resolved(location);
        if let Err(e) = self.store.save(&request.user_id, &state).await {
            error!(user_id = %request.user_id, error = %e, "Failed to save location state");
            return self.system_error();
        }

        debug!(
            user_id = %request.user_id,
            branch = "location_confirmed",
            city = %state.city,
            subway = %state.subway
        );
        DialogReply::say(self.answers.pick(AnswerTag::LocationConfirmed))
    }

    async fn serve_ready(&self, request: &DialogRequest, mut state: LocationState) -> DialogReply {
        if request.command == GET_ADDRESS_COMMAND {
            debug!(user_id = %request.user_id, branch = "get_address");
            return DialogReply::with_buttons(state.describe());
        }

        if request.command == CHANGE_ADDRESS_COMMAND {
            state.await_location();
            if let Err(e) = self.store.save(&request.user_id, &state).await {
                error!(user_id = %request.user_id, error = %e, "Failed to save location state");
                return self.system_error();
            }
            debug!(user_id = %request.user_id, branch = "change_address");
            return DialogReply::with_buttons(self.answers.pick(AnswerTag::ChangeAddress));
        }

        let phrase = request.command.to_lowercase();
        let Some(movie) = self.template.extract_movie(&phrase) else {
            debug!(user_id = %request.user_id, branch = "no_intent", phrase = %phrase);
            return DialogReply::with_buttons(self.answers.pick(AnswerTag::UnknownMovie));
        };

        self.search_showtimes(request, &state, &movie).await
    }

    async fn search_showtimes(
        &self,
        request: &DialogRequest,
        state: &LocationState,
        movie: &str,
    ) -> DialogReply {
        let now = self.clock.now().with_timezone(&request.timezone);
        let result = match self
            .showtimes
            .search(
                movie,
                &state.city,
                &state.subway,
                request.timezone,
                now.date_naive(),
            )
            .await
        {
            Ok(result) => result,
            Err(SkillError::MovieNotFound(title)) => {
                debug!(user_id = %request.user_id, branch = "movie_not_found", movie = %title);
                return DialogReply::terminal(self.answers.pick(AnswerTag::SystemError));
            }
            Err(e) => {
                warn!(
                    user_id = %request.user_id,
                    provider = self.showtimes.name(),
                    movie = %movie,
                    error = %e,
                    "Showtime search failed"
                );
                return DialogReply::with_buttons(self.answers.pick(AnswerTag::UnknownMovie));
            }
        };

        if result.total_showtimes() == 0 {
            debug!(user_id = %request.user_id, branch = "no_showtimes", movie = %movie);
            return DialogReply::with_buttons(self.answers.pick(AnswerTag::NoShowtimes));
        }

        let reference = now.with_timezone(&now.offset().fix());
        let ranked = select_nearest(&result, reference);
        if ranked.is_empty() {
            debug!(user_id = %request.user_id, branch = "no_showtimes", movie = %movie);
            return DialogReply::with_buttons(self.answers.pick(AnswerTag::NoShowtimes));
        }

        debug!(
            user_id = %request.user_id,
            branch = "showtimes",
            movie = %movie,
            cinemas = ranked.len()
        );
        DialogReply::with_buttons(format_summary(&ranked))
    }

    fn system_error(&self) -> DialogReply {
        DialogReply::say(self.answers.pick(AnswerTag::SystemError))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_constructors() {
        let plain = DialogReply::say("Привет");
        assert_eq!(plain.text, plain.tts);
        assert!(plain.buttons.is_empty());
        assert!(!plain.end_session);

        let with_buttons = DialogReply::with_buttons("Привет");
        assert_eq!(with_buttons.buttons, vec!["Мой адрес", "Изменить адрес"]);
        assert!(!with_buttons.end_session);

        let terminal = DialogReply::terminal("Пока");
        assert!(terminal.buttons.is_empty());
        assert!(terminal.end_session);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
