use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::models::{ActivitiesCalendar, JournalEntries, Users};
use crate::database::Store;
use crate::services::{QuoteError, QuoteService};

/// Shared per-process handles cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub quotes: QuoteService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Result<Self, QuoteError> {
        let quotes = QuoteService::new(&config.quotes)?;
        Ok(Self {
            store,
            config: Arc::new(config),
            quotes,
        })
    }

    pub fn users(&self) -> Users {
        Users::new(self.store.clone())
    }

    pub fn activities(&self) -> ActivitiesCalendar {
        ActivitiesCalendar::new(self.store.clone())
    }

    pub fn journal(&self) -> JournalEntries {
        JournalEntries::new(self.store.clone())
    }
}
