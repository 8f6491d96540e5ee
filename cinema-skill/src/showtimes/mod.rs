mod html;
mod kinopoisk;
mod provider;
mod rambler;

pub use kinopoisk::KinopoiskProvider;
pub use provider::{build_provider, ShowtimeProvider};
pub use rambler::RamblerProvider;
