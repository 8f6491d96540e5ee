use chrono::{DateTime, FixedOffset};

use crate::models::{Cinema, SearchResult, Showtime};

/// Cinemas named in a spoken summary.
pub const SUMMARY_LIMIT: usize = 3;

/// Times named per cinema.
const TIMES_PER_CINEMA: usize = 2;

pub const TRUNCATION_DISCLAIMER: &str =
    "Я нашла больше трёх кинотеатров и выбрала три с ближайшими сеансами. ";

/// Cinemas ordered by their earliest remaining showtime.
///
/// Only showtimes that start at or before `reference` are kept. Cinemas left
/// without showtimes are dropped. The result is not truncated.
pub fn select_nearest(result: &SearchResult, reference: DateTime<FixedOffset>) -> Vec<Cinema> {
    let mut ranked: Vec<Cinema> = result
        .cinemas
        .iter()
        .filter_map(|cinema| {
            let mut showtimes: Vec<Showtime> = cinema
                .showtimes
                .iter()
                .filter(|showtime| showtime.start_time <= reference)
                .cloned()
                .collect();
            if showtimes.is_empty() {
                return None;
            }
            showtimes.sort_by_key(|showtime| showtime.start_time);

            Some(Cinema {
                name: cinema.name.clone(),
                address: cinema.address.clone(),
                subway: cinema.subway.clone(),
                showtimes,
            })
        })
        .collect();

    ranked.sort_by_key(|cinema| cinema.earliest().map(|s| s.start_time));
    ranked
}

/// Spoken summary of the first [`SUMMARY_LIMIT`] ranked cinemas.
///
/// Expects the output of [`select_nearest`]. A cinema passed in without
/// showtimes still takes one of the slots but contributes no clause.
pub fn format_summary(ranked: &[Cinema]) -> String {
    let mut summary = String::new();
    if ranked.len() > SUMMARY_LIMIT {
        summary.push_str(TRUNCATION_DISCLAIMER);
    }

    for (position, cinema) in ranked.iter().take(SUMMARY_LIMIT).enumerate() {
        let times: Vec<String> = cinema
            .showtimes
            .iter()
            .take(TIMES_PER_CINEMA)
            .map(Showtime::clock_time)
            .collect();

        let clause = match (position, times.as_slice()) {
            (_, []) => continue,
            (0, [only]) => format!("В {} фильм начинается в {}. ", cinema.name, only),
            (0, [first, second, ..]) => format!(
                "В {} сеансы начинаются в {} и в {}. ",
                cinema.name, first, second
            ),
            (_, [only]) => format!("В {} в {}. ", cinema.name, only),
            (_, [first, second, ..]) => {
                format!("В {} в {} и в {}. ", cinema.name, first, second)
            }
        };
        summary.push_str(&clause);
    }

    summary
}
