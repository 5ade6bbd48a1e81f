//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    repository::{ItemStore, SortSpec},
    service::ItemService,
};

/// Application state shared across handlers
///
/// Cloned into every request; the store clients are reference counted.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    items: ItemService<ItemStore>,
    default_sort: Arc<SortSpec>,
}

impl AppState {
    /// Create the state, resolving listing defaults from the configuration
    pub fn new(config: Config, store: ItemStore) -> Result<Self> {
        let default_sort = config.paging.default_sort_spec()?;
        Ok(Self {
            config: Arc::new(config),
            items: ItemService::new(store),
            default_sort: Arc::new(default_sort),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Item operations
    pub fn items(&self) -> &ItemService<ItemStore> {
        &self.items
    }

    /// Sort applied when a request carries none
    pub fn default_sort(&self) -> &SortSpec {
        &self.default_sort
    }

    /// Page size applied when a request carries none
    pub fn default_page_size(&self) -> i64 {
        self.config.paging.default_page_size
    }
}
