//! # item-service
//!
//! HTTP service for a single `Item` resource stored in a document database.
//!
//! Listings are sorted by a `sort` query parameter and can be paginated by two
//! interchangeable strategies that must return identical pages:
//!
//! - **projected** (`GET /items/paging`): the store applies offset and limit and
//!   returns only the fields of the list view
//! - **skip-take** (`GET /items/skip`): the store returns the full sorted
//!   collection and the page is cut in process
//!
//! Writes require a bearer JWT whose `sub` claim is recorded as creator or
//! updater. Concurrent writes to the same item are detected with an optimistic
//! version counter.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use item_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = ItemStore::from_config(&config.storage).await?;
//!     let auth = JwtAuth::new(&config.jwt)?;
//!     let state = AppState::new(config.clone(), store)?;
//!
//!     Server::new(config).serve(routes::router(state, auth)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod paging;
pub mod repository;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;

#[cfg(feature = "surrealdb")]
pub mod surrealdb_backend;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PagingConfig, StorageBackend, StorageConfig};
    pub use crate::error::{Error, Result};
    pub use crate::ids::ItemId;
    pub use crate::middleware::{Claims, JwtAuth, PublicRoutes};
    pub use crate::models::{Item, ItemListView, ItemRequest, ItemSummary, ItemView, ItemsView};
    pub use crate::observability::init_tracing;
    pub use crate::paging::{ItemPage, PagingStrategy, ProjectedPaging, SkipTakePaging};
    pub use crate::repository::{
        InMemoryItemRepository, ItemRepository, ItemStore, PageRequest, Pagination,
        RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult,
        SortDirection, SortField, SortOrder, SortSpec,
    };
    pub use crate::routes;
    pub use crate::server::Server;
    pub use crate::service::ItemService;
    pub use crate::state::AppState;

    #[cfg(feature = "surrealdb")]
    pub use crate::repository::SurrealItemRepository;

    #[cfg(feature = "openapi")]
    pub use crate::openapi::ApiDoc;
}
