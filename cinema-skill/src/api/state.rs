use std::sync::Arc;

use crate::config::Config;
use crate::db::LocationStore;
use crate::dialog::DialogService;
use crate::geocoding::LocationResolver;
use crate::showtimes::ShowtimeProvider;

#[derive(Clone)]
pub struct AppState {
    /// Per-user location state, shared with the dialog service.
    pub store: Arc<dyn LocationStore>,
    pub dialog: Arc<DialogService>,
    /// Name of the configured listing source, reported by the health check.
    pub showtime_provider: &'static str,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn LocationStore>,
        resolver: Arc<dyn LocationResolver>,
        showtimes: Arc<dyn ShowtimeProvider>,
    ) -> Self {
        let dialog = DialogService::new(
            store.clone(),
            resolver,
            showtimes.clone(),
            &config.dialog,
        );
        Self::with_dialog(store, dialog, showtimes.name())
    }

    /// State around an already composed dialog service, e.g. one with a fixed clock.
    pub fn with_dialog(
        store: Arc<dyn LocationStore>,
        dialog: DialogService,
        showtime_provider: &'static str,
    ) -> Self {
        Self {
            store,
            dialog: Arc::new(dialog),
            showtime_provider,
        }
    }
}
