pub(crate) mod dialog;
pub(crate) mod health;

pub use dialog::handle_dialog;
pub use health::health_check;
