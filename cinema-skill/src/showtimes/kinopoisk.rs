use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::config::ShowtimeConfig;
use crate::error::{Result, SkillError};
use crate::models::{Cinema, SearchResult, Showtime};

use super::html::{first_text, non_empty, selector, text_of};
use super::provider::{anchor_clock_time, http_client, ShowtimeProvider};

const PAGE_CHARSET: &str = "windows-1251";
const SCHEDULE_LINK_TEXT: &str = "сеансы";

/// Top search hit that still has a schedule page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MovieHit {
    pub name: String,
    pub schedule_link: String,
}

/// Listings scraped from KinoPoisk search and schedule pages.
pub struct KinopoiskProvider {
    client: Client,
    base_url: Url,
}

impl KinopoiskProvider {
    pub fn new(config: &ShowtimeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: Url::parse(&config.kinopoisk_base_url)?,
        })
    }

    async fn fetch(&self, url: Url) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text_with_charset(PAGE_CHARSET)
            .await?)
    }
}

#[async_trait]
impl ShowtimeProvider for KinopoiskProvider {
    fn name(&self) -> &'static str {
        "kinopoisk"
    }

    async fn search(
        &self,
        movie: &str,
        city: &str,
        subway: &str,
        timezone: Tz,
        today: NaiveDate,
    ) -> Result<SearchResult> {
        tracing::debug!(movie, city, subway, "Searching kinopoisk listings");

        let mut search_url = self.base_url.join("index.php")?;
        search_url.query_pairs_mut().append_pair("kp_query", movie);
        let search_page = self.fetch(search_url).await?;
        let hit = parse_search_page(&search_page, movie, today.year())?;

        let mut schedule_url = self.base_url.join(&hit.schedule_link)?;
        schedule_url
            .query_pairs_mut()
            .clear()
            .append_pair("search", subway);
        let schedule_page = self.fetch(schedule_url).await?;
        let cinemas = parse_schedule_page(&schedule_page, timezone, today)?;

        Ok(SearchResult {
            movie_title: hit.name,
            cinemas,
        })
    }
}

/// A release more than a year old cannot be in cinemas any more.
fn is_outdated(year: &str, current_year: i32) -> bool {
    year.trim()
        .parse::<i32>()
        .map(|year| year < current_year - 1)
        .unwrap_or(false)
}

pub(crate) fn parse_search_page(html: &str, movie: &str, current_year: i32) -> Result<MovieHit> {
    let document = Html::parse_document(html);

    let results_selector = selector("div.search_results")?;
    let top_selector = selector("div.element.most_wanted")?;
    let name_selector = selector("div.info p.name a")?;
    let year_selector = selector("div.info p.name span.year")?;
    let link_selector = selector("div.right ul.links li a")?;

    let results = document
        .select(&results_selector)
        .next()
        .ok_or_else(|| SkillError::Parse("failed to find a search results block".to_string()))?;

    let top = results
        .select(&top_selector)
        .next()
        .ok_or_else(|| SkillError::MovieNotFound(movie.to_string()))?;

    let name = first_text(top, &name_selector).unwrap_or_else(|| movie.to_string());
    let year = first_text(top, &year_selector).unwrap_or_default();
    if is_outdated(&year, current_year) {
        return Err(SkillError::MovieNotFound(format!(
            "{name} ({year}) is no longer shown in cinemas"
        )));
    }

    let schedule_link = top
        .select(&link_selector)
        .find(|link| text_of(*link) == SCHEDULE_LINK_TEXT)
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| {
            SkillError::Parse(format!("failed to find a schedule link for movie: {name}"))
        })?;

    Ok(MovieHit {
        name,
        schedule_link,
    })
}

pub(crate) fn parse_schedule_page(html: &str, timezone: Tz, date: NaiveDate) -> Result<Vec<Cinema>> {
    let document = Html::parse_document(html);

    let seances_selector = selector("div.film-seances-page__seances")?;
    let item_selector = selector("div.schedule-item")?;
    let left_selector = selector("div.schedule-item__left")?;
    let right_selector = selector("div.schedule-item__right")?;
    let name_selector = selector("a.schedule-cinema__name")?;
    let address_selector = selector("div.schedule-cinema__address")?;
    let metro_selector = selector("div.schedule-cinema__metro")?;
    let row_selector = selector("div.schedule-item__formats-row")?;
    let format_selector = selector("span.schedule-item__formats-format")?;
    let session_selector = selector("span.schedule-item__session-button-wrapper")?;
    let time_selector =
        selector("span.schedule-item__session-button.schedule-item__session-button_active")?;
    let price_selector = selector("span.schedule-item__price")?;

    let seances = document
        .select(&seances_selector)
        .next()
        .ok_or_else(|| SkillError::Parse("failed to find a schedule block".to_string()))?;

    let mut cinemas = Vec::new();
    for item in seances.select(&item_selector) {
        let Some(info) = item.select(&left_selector).next() else {
            continue;
        };
        let Some(schedule) = item.select(&right_selector).next() else {
            continue;
        };

        let mut showtimes = Vec::new();
        for row in schedule.select(&row_selector) {
            let format = non_empty(first_text(row, &format_selector));

            for session in row.select(&session_selector) {
                let Some(start_time) = first_text(session, &time_selector)
                    .and_then(|raw| anchor_clock_time(&raw, timezone, date))
                else {
                    continue;
                };
                showtimes.push(Showtime {
                    start_time,
                    price: non_empty(first_text(session, &price_selector)),
                    format: format.clone(),
                });
            }
        }

        cinemas.push(Cinema {
            name: first_text(info, &name_selector).unwrap_or_default(),
            address: first_text(info, &address_selector).unwrap_or_default(),
            subway: first_text(info, &metro_selector).unwrap_or_default(),
            showtimes,
        });
    }

    Ok(cinemas)
}
