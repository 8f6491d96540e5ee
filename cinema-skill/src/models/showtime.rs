use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    pub start_time: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Showtime {
    pub fn at(start_time: DateTime<FixedOffset>) -> Self {
        Self {
            start_time,
            price: None,
            format: None,
        }
    }

    /// `HH:MM` in the showtime's own offset.
    pub fn clock_time(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    pub name: String,
    pub address: String,
    pub subway: String,
    pub showtimes: Vec<Showtime>,
}

impl Cinema {
    pub fn earliest(&self) -> Option<&Showtime> {
        self.showtimes.iter().min_by_key(|s| s.start_time)
    }
}

/// Cinemas showing a movie, as returned by a showtime provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub movie_title: String,
    pub cinemas: Vec<Cinema>,
}

impl SearchResult {
    pub fn total_showtimes(&self) -> usize {
        self.cinemas.iter().map(|c| c.showtimes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn moscow(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 8, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_clock_time_uses_local_offset() {
        assert_eq!(Showtime::at(moscow(9, 5)).clock_time(), "09:05");
    }

    #[test]
    fn test_earliest_and_totals() {
        let cinema = Cinema {
            name: "Октябрь".to_string(),
            address: "Новый Арбат, 24".to_string(),
            subway: "Арбатская".to_string(),
            showtimes: vec![Showtime::at(moscow(21, 0)), Showtime::at(moscow(12, 30))],
        };
        assert_eq!(cinema.earliest().unwrap().clock_time(), "12:30");

        let result = SearchResult {
            movie_title: "Аватар".to_string(),
            cinemas: vec![cinema.clone(), Cinema { showtimes: vec![], ..cinema }],
        };
        assert_eq!(result.total_showtimes(), 2);
    }
}
