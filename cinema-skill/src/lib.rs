pub mod api;
pub mod config;
pub mod db;
pub mod dialog;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod showtimes;
