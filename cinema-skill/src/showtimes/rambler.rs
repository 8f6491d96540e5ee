use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use url::Url;

use crate::config::ShowtimeConfig;
use crate::error::{Result, SkillError};
use crate::models::{Cinema, SearchResult, Showtime};

use super::html::{first_text, selector, text_of};
use super::provider::{anchor_clock_time, http_client, ShowtimeProvider};

#[derive(Debug, Default, Deserialize)]
struct RamblerSearch {
    #[serde(rename = "Items", alias = "items", default)]
    items: Vec<RamblerSearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct RamblerSearchItem {
    #[serde(rename = "Link", alias = "link", default)]
    link: String,
    #[serde(rename = "Name", alias = "name", default)]
    name: String,
}

/// Listings from the Rambler ticket office: a JSON search endpoint, then an
/// HTML schedule page for the top hit.
pub struct RamblerProvider {
    client: Client,
    base_url: Url,
}

impl RamblerProvider {
    pub fn new(config: &ShowtimeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: Url::parse(&config.rambler_base_url)?,
        })
    }

    async fn find_movie(&self, movie: &str) -> Result<RamblerSearchItem> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut().append_pair("search_str", movie);

        let found: RamblerSearch = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        found
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SkillError::MovieNotFound(movie.to_string()))
    }
}

#[async_trait]
impl ShowtimeProvider for RamblerProvider {
    fn name(&self) -> &'static str {
        "rambler"
    }

    async fn search(
        &self,
        movie: &str,
        city: &str,
        subway: &str,
        timezone: Tz,
        today: NaiveDate,
    ) -> Result<SearchResult> {
        tracing::debug!(movie, city, subway, "Searching rambler listings");
        let hit = self.find_movie(movie).await?;

        let page_url = self.base_url.join(&hit.link)?;
        let html = self
            .client
            .get(page_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let cinemas = parse_schedule(&html, subway, timezone, today)?;

        Ok(SearchResult {
            movie_title: hit.name,
            cinemas,
        })
    }
}

/// Cinemas on a schedule page. With a non-empty `region`, only cinemas whose
/// subway line mentions it (case-insensitively) are kept.
pub(crate) fn parse_schedule(
    html: &str,
    region: &str,
    timezone: Tz,
    date: NaiveDate,
) -> Result<Vec<Cinema>> {
    let document = Html::parse_document(html);

    let item_selector = selector("div.rasp_item_in")?;
    let name_selector = selector("div.rasp_name div.rasp_title span.s-name")?;
    let place_selector = selector("div.rasp_name div.rasp_place.s-place")?;
    let address_selector = selector("span")?;
    let metro_selector = selector("div.rasp_place_metro")?;
    let list_selector = selector("div.rasp_list")?;
    let time_selector = selector("li.btn_rasp")?;

    let region = region.trim().to_lowercase();
    let mut cinemas = Vec::new();

    for item in document.select(&item_selector) {
        let place = item.select(&place_selector).next();
        let subway = place
            .and_then(|p| first_text(p, &metro_selector))
            .unwrap_or_default();

        if !region.is_empty() && !subway.to_lowercase().contains(&region) {
            continue;
        }

        let Some(schedule) = item.select(&list_selector).next() else {
            continue;
        };

        let showtimes = schedule
            .select(&time_selector)
            .filter_map(|slot| anchor_clock_time(&text_of(slot), timezone, date))
            .map(Showtime::at)
            .collect();

        cinemas.push(Cinema {
            name: first_text(item, &name_selector).unwrap_or_default(),
            address: place
                .and_then(|p| first_text(p, &address_selector))
                .unwrap_or_default(),
            subway,
            showtimes,
        });
    }

    Ok(cinemas)
}
