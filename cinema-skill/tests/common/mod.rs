#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use cinema_skill::config::DialogConfig;
use cinema_skill::db::{InMemoryLocationStore, LocationStore};
use cinema_skill::dialog::{Clock, DialogService};
use cinema_skill::error::{Result, SkillError};
use cinema_skill::geocoding::LocationResolver;
use cinema_skill::models::{Cinema, LocationState, ResolvedLocation, SearchResult, Showtime};
use cinema_skill::showtimes::ShowtimeProvider;

pub const USER: &str = "user-1";
pub const MOSCOW: Tz = Tz::Europe__Moscow;

static INIT: Once = Once::new();

/// Routes `tracing` output through the test harness; `RUST_LOG` picks the level.
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Moscow wall-clock time on 2024-03-08.
pub fn moscow(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 8, hour, minute, 0)
        .unwrap()
}

pub fn cinema(name: &str, times: &[(u32, u32)]) -> Cinema {
    Cinema {
        name: name.to_string(),
        address: String::new(),
        subway: String::new(),
        showtimes: times
            .iter()
            .map(|(hour, minute)| Showtime::at(moscow(*hour, *minute)))
            .collect(),
    }
}

pub fn search_result(cinemas: Vec<Cinema>) -> SearchResult {
    SearchResult {
        movie_title: "Аватар".to_string(),
        cinemas,
    }
}

pub fn ready_state(city: &str, subway: &str) -> LocationState {
    LocationState::resolved(ResolvedLocation {
        city: city.to_string(),
        subway: subway.to_string(),
    })
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(time: DateTime<FixedOffset>) -> Arc<Self> {
        Arc::new(Self(time.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Resolves only the phrases it was taught; `failing` simulates a broken geocoder.
#[derive(Default)]
pub struct StubResolver {
    known: HashMap<String, ResolvedLocation>,
    failing: bool,
    pub calls: Mutex<Vec<String>>,
}

impl StubResolver {
    pub fn knows(mut self, phrase: &str, city: &str, subway: &str) -> Self {
        self.known.insert(
            phrase.to_string(),
            ResolvedLocation {
                city: city.to_string(),
                subway: subway.to_string(),
            },
        );
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl LocationResolver for StubResolver {
    async fn resolve(&self, phrase: &str) -> Result<ResolvedLocation> {
        self.calls.lock().unwrap().push(phrase.to_string());
        if self.failing {
            return Err(SkillError::Parse("geocoder returned garbage".to_string()));
        }
        self.known
            .get(phrase)
            .cloned()
            .ok_or_else(|| SkillError::UnknownLocation(phrase.to_string()))
    }
}

pub enum ProviderOutcome {
    Found(SearchResult),
    MovieNotFound,
    Broken,
}

/// Arguments of one `ShowtimeProvider::search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub movie: String,
    pub city: String,
    pub subway: String,
    pub timezone: Tz,
    pub today: NaiveDate,
}

pub struct StubProvider {
    outcome: ProviderOutcome,
    pub calls: Mutex<Vec<ProviderCall>>,
}

impl StubProvider {
    pub fn new(outcome: ProviderOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn found(cinemas: Vec<Cinema>) -> Self {
        Self::new(ProviderOutcome::Found(search_result(cinemas)))
    }
}

#[async_trait]
impl ShowtimeProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(
        &self,
        movie: &str,
        city: &str,
        subway: &str,
        timezone: Tz,
        today: NaiveDate,
    ) -> Result<SearchResult> {
        self.calls.lock().unwrap().push(ProviderCall {
            movie: movie.to_string(),
            city: city.to_string(),
            subway: subway.to_string(),
            timezone,
            today,
        });
        match &self.outcome {
            ProviderOutcome::Found(result) => Ok(result.clone()),
            ProviderOutcome::MovieNotFound => Err(SkillError::MovieNotFound(movie.to_string())),
            ProviderOutcome::Broken => Err(SkillError::Parse("layout changed".to_string())),
        }
    }
}

/// Reads succeed from an inner map; writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: InMemoryLocationStore,
}

impl ReadOnlyStore {
    pub async fn with_state(user_id: &str, state: &LocationState) -> Self {
        let store = Self::default();
        store.inner.save(user_id, state).await.unwrap();
        store
    }
}

#[async_trait]
impl LocationStore for ReadOnlyStore {
    async fn get(&self, user_id: &str) -> Result<LocationState> {
        self.inner.get(user_id).await
    }

    async fn save(&self, _user_id: &str, _state: &LocationState) -> Result<()> {
        Err(SkillError::Storage("read-only replica".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Every operation fails.
pub struct BrokenStore;

#[async_trait]
impl LocationStore for BrokenStore {
    async fn get(&self, _user_id: &str) -> Result<LocationState> {
        Err(SkillError::Storage("connection refused".to_string()))
    }

    async fn save(&self, _user_id: &str, _state: &LocationState) -> Result<()> {
        Err(SkillError::Storage("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Err(SkillError::Storage("connection refused".to_string()))
    }
}

/// Dialog service with seeded phrasing and the clock fixed at `now`.
pub fn dialog_service(
    store: Arc<dyn LocationStore>,
    resolver: Arc<dyn LocationResolver>,
    provider: Arc<dyn ShowtimeProvider>,
    now: DateTime<FixedOffset>,
) -> DialogService {
    init_test_logger();
    DialogService::new(
        store,
        resolver,
        provider,
        &DialogConfig {
            answer_seed: Some(7),
        },
    )
    .with_clock(FixedClock::at(now))
}
