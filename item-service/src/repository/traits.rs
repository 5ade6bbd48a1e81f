//! Item store contract
//!
//! Async methods use RPITIT (`impl Future` in trait position), so
//! implementations can be written with plain `async fn`.
//!
//! ```rust,ignore
//! impl ItemRepository for MyStore {
//!     async fn find_by_item_id(&self, item_id: &str) -> RepositoryResult<Option<Item>> {
//!         // ...
//!     }
//!     // ...
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::Pagination;
use super::sort::SortSpec;
use crate::models::{Item, ItemSummary};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence for items
///
/// Every sorted read orders by the given [`SortSpec`] followed by the public
/// identifier, so all implementations return the same sequence for the same
/// data.
pub trait ItemRepository: Send + Sync {
    /// Find an item by its public identifier
    fn find_by_item_id(
        &self,
        item_id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Item>>> + Send;

    /// The whole collection, sorted
    fn find_all(&self, sort: &SortSpec)
        -> impl Future<Output = RepositoryResult<Vec<Item>>> + Send;

    /// One sorted page, carrying only the list-view fields
    ///
    /// Offset and limit are applied by the store.
    fn find_projected(
        &self,
        sort: &SortSpec,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<ItemSummary>>> + Send;

    /// Insert or update an item
    ///
    /// An item without storage id is inserted with version 0. Otherwise the
    /// stored version must equal `item.version`; the saved copy carries
    /// version + 1. Write-once fields are kept from the stored document.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` when the stored version differs
    /// - `NotFound` when the storage id is unknown
    /// - `AlreadyExists` when inserting a public identifier that is taken
    fn save(&self, item: Item) -> impl Future<Output = RepositoryResult<Item>> + Send;

    /// Delete by public identifier; deleting an unknown identifier succeeds
    fn delete_by_item_id(&self, item_id: &str)
        -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Number of items in the collection
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;
}
