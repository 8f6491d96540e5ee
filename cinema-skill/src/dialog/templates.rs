use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;

/// Capture group holding the movie title.
pub const MOVIE_CAPTURE: &str = "movie";

/// Movie-search phrasings, most specific first. The last entry takes the whole
/// phrase as the title, so any non-empty phrase yields a `movie` capture.
/// Reordering changes which title is extracted from ambiguous phrases; rerun
/// the phrase table in the tests below after any edit.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r".*(?:сеансы|расписание|время|когда идет|когда идут|когда будет|когда показывают).*(?:фильма|фильм|кино|кинофильма|кинофильм) (?P<movie>.*)",
    r".*(?:сеансы|расписание|время|когда идет|когда идут|когда будет|когда показывают|хочу|хотелось).*(?:фильма|фильм|кино|кинофильма|кинофильм)(?: на | для | у | +)(?P<movie>.*)",
    r".*(?:сеансы|расписание|время|когда идет|когда идут|когда будет|когда показывают)(?: на | для | у | +)(?P<movie>.*)",
    r".*(?:когда|в какое|когда будет|во сколько|время|время начала) .* (?:фильма|фильм|кино|кинофильма|кинофильм) (?P<movie>.*)",
    r".*(?:когда|в какое|когда будет|во сколько|во сколько будет|когда идет|время начала|давай|хочу) .* (?:на|в) (?P<movie>.*)",
    r".*(?:фильма|фильм|кино|кинофильма|кинофильм) (?P<movie>.*)",
    r".*(?:хочу посмотреть|глянуть|хочу|хотелось) .* (?:фильма|фильм|кино|кинофильма|кинофильм) (?P<movie>.*)",
    r".*(?:хочу посмотреть|глянуть|хочу|хотелось)(?: на | для | у | +)(?P<movie>.*)",
    r".*(?:хочу посмотреть|глянуть) (?P<movie>.*)",
    r".*(?:когда|когда будет|в какое|во сколько|во сколько|когда идет|когда идут) (?P<movie>.*)",
    r".*(?:сеансы|расписание|время|когда идет|когда идут|когда будет|когда показывают) (?P<movie>.*)",
    r"(?:на|в|хочу|давай) (?P<movie>.*)",
    r"(?P<movie>.*)",
];

/// Ordered intent patterns. The first pattern that matches decides the result.
///
/// Matching is case-sensitive; callers lower-case phrases first.
#[derive(Debug, Clone)]
pub struct IntentTemplate {
    patterns: Vec<Regex>,
}

impl IntentTemplate {
    pub fn new<'a, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let patterns = patterns
            .into_iter()
            .map(Regex::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Named captures of the first matching pattern, trimmed.
    /// `None` only when no pattern matches at all.
    pub fn matches(&self, phrase: &str) -> Option<HashMap<String, String>> {
        self.patterns.iter().find_map(|pattern| {
            let captures = pattern.captures(phrase)?;
            let extracted = pattern
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|m| (name.to_string(), m.as_str().trim().to_string()))
                })
                .collect();
            Some(extracted)
        })
    }

    /// Movie title named in `phrase`, if any pattern captured a non-empty one.
    pub fn extract_movie(&self, phrase: &str) -> Option<String> {
        self.matches(phrase)?
            .remove(MOVIE_CAPTURE)
            .filter(|movie| !movie.is_empty())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for IntentTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS.iter().copied()).expect("built-in intent patterns compile")
    }
}
