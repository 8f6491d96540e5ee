use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use reqwest::Client;

use crate::config::{parse_showtime_provider, ShowtimeConfig};
use crate::error::{Result, SkillError};
use crate::models::SearchResult;

use super::kinopoisk::KinopoiskProvider;
use super::rambler::RamblerProvider;

/// Source of cinema listings for a movie.
///
/// `subway` narrows the listing to cinemas near that station; an empty string
/// means the whole city. Listings carry bare `HH:MM` times, which come back
/// anchored to `today` in `timezone`.
/// A movie the source does not know is reported as
/// [`SkillError::MovieNotFound`].
#[async_trait]
pub trait ShowtimeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        movie: &str,
        city: &str,
        subway: &str,
        timezone: Tz,
        today: NaiveDate,
    ) -> Result<SearchResult>;
}

pub fn build_provider(config: &ShowtimeConfig) -> Result<Arc<dyn ShowtimeProvider>> {
    match parse_showtime_provider(&config.provider) {
        "kinopoisk" => Ok(Arc::new(KinopoiskProvider::new(config)?)),
        _ => Ok(Arc::new(RamblerProvider::new(config)?)),
    }
}

pub(crate) fn http_client(config: &ShowtimeConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("cinema-skill/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SkillError::Internal(format!("Failed to create HTTP client: {e}")))
}

/// Listings only carry `HH:MM`; pin it to `date` in the user's timezone.
pub(crate) fn anchor_clock_time(
    raw: &str,
    timezone: Tz,
    date: NaiveDate,
) -> Option<DateTime<FixedOffset>> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()?;
    let local = timezone
        .from_local_datetime(&date.and_time(time))
        .earliest()?;
    Some(local.with_timezone(&local.offset().fix()))
}
