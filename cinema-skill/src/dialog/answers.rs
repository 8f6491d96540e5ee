use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerTag {
    AskLocation,
    UnknownLocation,
    LocationConfirmed,
    UnknownMovie,
    NoShowtimes,
    ChangeAddress,
    SystemError,
}

impl AnswerTag {
    pub const ALL: [AnswerTag; 7] = [
        AnswerTag::AskLocation,
        AnswerTag::UnknownLocation,
        AnswerTag::LocationConfirmed,
        AnswerTag::UnknownMovie,
        AnswerTag::NoShowtimes,
        AnswerTag::ChangeAddress,
        AnswerTag::SystemError,
    ];
}

impl std::fmt::Display for AnswerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AskLocation => write!(f, "ASK_LOCATION"),
            Self::UnknownLocation => write!(f, "UNKNOWN_LOCATION"),
            Self::LocationConfirmed => write!(f, "LOCATION_CONFIRMED"),
            Self::UnknownMovie => write!(f, "UNKNOWN_MOVIE"),
            Self::NoShowtimes => write!(f, "NO_SHOWTIMES"),
            Self::ChangeAddress => write!(f, "CHANGE_ADDRESS"),
            Self::SystemError => write!(f, "SYSTEM_ERROR"),
        }
    }
}

fn default_answers() -> HashMap<AnswerTag, Vec<String>> {
    let table: [(AnswerTag, &[&str]); 7] = [
        (
            AnswerTag::AskLocation,
            &["Привет! А в каком городе и на какой станции метро, если оно есть, вы живете?"],
        ),
        (
            AnswerTag::UnknownLocation,
            &[
                "Что-то я не знаю такого адреса. А повторите пожалуйста в таком виде: \"Москва, метро Октябрьская\" или просто скажите название города, если метро нет, например \"Абакан\"",
                "Этот адрес мне неизвестен, повторите ещё",
                "Такого адреса я не знаю, повторите в виде \"Москва, метро Дмитровская\" или скажите просто название города, если у вас нет метро",
                "Не могу найти такой адрес, попробуйте ещё",
            ],
        ),
        (
            AnswerTag::LocationConfirmed,
            &[
                "Отлично! На какой фильм вы хотите найти ближайшие сеансы?",
                "Запомнила! Какой фильм вы хотите посмотреть?",
                "Хорошо, адрес сохранён. На какой фильм ищем сеансы?",
            ],
        ),
        (
            AnswerTag::UnknownMovie,
            &[
                "Я вас почему то не понимаю, попробуйте еще. Например: \"Когда идут Звездные Войны\"",
                "Я не поняла на какой фильм вы хотите, попробуйте еще",
                "Не могу найти такой фильм, скажите название ещё раз",
            ],
        ),
        (
            AnswerTag::NoShowtimes,
            &[
                "К сожалению, ближайших сеансов рядом с вами нет",
                "Рядом с вами этот фильм сейчас не показывают",
            ],
        ),
        (
            AnswerTag::ChangeAddress,
            &[
                "Хорошо, назовите новый адрес: город и станцию метро, если оно есть",
                "Давайте поменяем адрес. В каком городе и у какого метро вы теперь живёте?",
            ],
        ),
        (
            AnswerTag::SystemError,
            &[
                "Что-то пошло не так, попробуйте позже",
                "Кажется, у меня что-то сломалось. Попробуйте ещё раз чуть позже",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(tag, variants)| (tag, variants.iter().map(|v| v.to_string()).collect()))
        .collect()
}

/// Canned replies per tag; one variant is picked at random for each reply.
pub struct AnswerBank {
    answers: HashMap<AnswerTag, Vec<String>>,
    rng: Mutex<StdRng>,
}

impl AnswerBank {
    /// Built-in phrasings. A `seed` makes the sequence of picks reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            answers: default_answers(),
            rng: Mutex::new(rng_from(seed)),
        }
    }

    pub fn variants(&self, tag: AnswerTag) -> &[String] {
        self.answers.get(&tag).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pick(&self, tag: AnswerTag) -> String {
        let variants = self.variants(tag);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        variants.choose(&mut *rng).cloned().unwrap_or_default()
    }
}

impl Default for AnswerBank {
    fn default() -> Self {
        Self::new(None)
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
