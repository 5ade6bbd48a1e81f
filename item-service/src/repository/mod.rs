//! Item persistence
//!
//! This module provides the [`ItemRepository`] contract and the stores behind it,
//! together with the sort and paging types every store understands.
//!
//! # Features
//!
//! - **Sorting**: [`SortSpec`] parsed from `sort` query tokens, with a stable
//!   tie-breaker on the public identifier
//! - **Paging**: [`PageRequest`] validates page/size and yields [`Pagination`] bounds
//! - **Optimistic concurrency**: `save` rejects stale versions with
//!   [`RepositoryErrorKind::VersionConflict`]
//! - **Stores**: [`InMemoryItemRepository`] and, with the `surrealdb` feature,
//!   `SurrealItemRepository`; [`ItemStore`] selects one at runtime
//!
//! # Example
//!
//! ```rust,ignore
//! use item_service::repository::{InMemoryItemRepository, ItemRepository, SortSpec};
//!
//! let repository = InMemoryItemRepository::new();
//! let sort = SortSpec::parse(&["name", "desc"])?;
//! let items = repository.find_all(&sort).await?;
//! ```

mod error;
mod memory;
mod pagination;
mod sort;
mod store;
#[cfg(feature = "surrealdb")]
mod surreal;
mod traits;

// Re-export all public types
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryItemRepository;
pub use pagination::{PageError, PageRequest, Pagination};
pub use sort::{SortDirection, SortError, SortField, SortOrder, SortSpec};
pub use store::ItemStore;
#[cfg(feature = "surrealdb")]
pub use surreal::SurrealItemRepository;
pub use traits::{ItemRepository, RepositoryResult};
