use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub geocoder: GeocoderConfig,
    pub showtimes: ShowtimeConfig,
    pub dialog: DialogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl DatabaseConfig {
    /// Local database file, with the SQLite pragmas the service runs with by default.
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

/// Geocoding service used to turn a spoken address into a city and subway station
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://geocode-maps.yandex.ru/1.x/".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Cinema listing source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShowtimeConfig {
    /// `rambler` or `kinopoisk`
    pub provider: String,
    pub rambler_base_url: String,
    pub kinopoisk_base_url: String,
    pub timeout_secs: u64,
}

impl Default for ShowtimeConfig {
    fn default() -> Self {
        Self {
            provider: "rambler".to_string(),
            rambler_base_url: "https://kassa.rambler.ru".to_string(),
            kinopoisk_base_url: "https://www.kinopoisk.ru".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogConfig {
    /// Seed for answer phrasing. Unset means a fresh entropy seed per process.
    pub answer_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SKILL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SKILL_PORT", 8080),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "file:cinema_skill.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            geocoder: GeocoderConfig {
                base_url: env::var("GEOCODER_BASE_URL")
                    .unwrap_or_else(|_| GeocoderConfig::default().base_url),
                api_key: env::var("GEOCODER_API_KEY").ok(),
                timeout_secs: parse_env_or("GEOCODER_TIMEOUT", 10),
            },
            showtimes: ShowtimeConfig {
                provider: env::var("SHOWTIME_PROVIDER").unwrap_or_else(|_| "rambler".to_string()),
                rambler_base_url: env::var("RAMBLER_BASE_URL")
                    .unwrap_or_else(|_| ShowtimeConfig::default().rambler_base_url),
                kinopoisk_base_url: env::var("KINOPOISK_BASE_URL")
                    .unwrap_or_else(|_| ShowtimeConfig::default().kinopoisk_base_url),
                timeout_secs: parse_env_or("SHOWTIME_TIMEOUT", 15),
            },
            dialog: DialogConfig {
                answer_seed: parse_env_opt("ANSWER_SEED"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known cinema listing sources
pub const KNOWN_SHOWTIME_PROVIDERS: &[&str] = &["rambler", "kinopoisk"];

/// Normalize a configured provider name, falling back to `rambler` for unknown values.
pub fn parse_showtime_provider(name: &str) -> &'static str {
    let lower = name.trim().to_lowercase();
    KNOWN_SHOWTIME_PROVIDERS
        .iter()
        .copied()
        .find(|known| *known == lower)
        .unwrap_or_else(|| {
            tracing::warn!("Unknown showtime provider '{}', using rambler", name);
            "rambler"
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_server_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("SKILL_HOST");
        std::env::remove_var("SKILL_PORT");

        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("SKILL_PORT", "not-a-port");

        let config = Config::default();
        assert_eq!(config.server.port, 8080);

        std::env::remove_var("SKILL_PORT");
    }

    #[test]
    fn test_showtime_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("SHOWTIME_PROVIDER", "kinopoisk");
        std::env::set_var("SHOWTIME_TIMEOUT", "3");

        let config = Config::default();
        assert_eq!(config.showtimes.provider, "kinopoisk");
        assert_eq!(config.showtimes.timeout_secs, 3);
        assert_eq!(config.showtimes.rambler_base_url, "https://kassa.rambler.ru");

        std::env::remove_var("SHOWTIME_PROVIDER");
        std::env::remove_var("SHOWTIME_TIMEOUT");
    }

    #[test]
    fn test_answer_seed_is_optional() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("ANSWER_SEED");
        assert!(Config::default().dialog.answer_seed.is_none());

        std::env::set_var("ANSWER_SEED", "42");
        assert_eq!(Config::default().dialog.answer_seed, Some(42));

        std::env::set_var("ANSWER_SEED", "forty-two");
        assert!(Config::default().dialog.answer_seed.is_none());

        std::env::remove_var("ANSWER_SEED");
    }

    #[test]
    fn test_parse_showtime_provider() {
        assert_eq!(parse_showtime_provider("rambler"), "rambler");
        assert_eq!(parse_showtime_provider(" Kinopoisk "), "kinopoisk");
        assert_eq!(parse_showtime_provider("imdb"), "rambler");
    }

    #[test]
    fn test_parse_env_or_valid_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("__TEST_PARSE_PORT", "9090");
        let result: u16 = parse_env_or("__TEST_PARSE_PORT", 8080);
        assert_eq!(result, 9090);
        std::env::remove_var("__TEST_PARSE_PORT");
    }
}
