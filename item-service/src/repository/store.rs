//! Runtime selection of the item store

use super::memory::InMemoryItemRepository;
use super::pagination::Pagination;
use super::sort::SortSpec;
#[cfg(feature = "surrealdb")]
use super::surreal::SurrealItemRepository;
use super::traits::{ItemRepository, RepositoryResult};
use crate::config::{config_error, StorageBackend, StorageConfig};
use crate::error::Result;
use crate::models::{Item, ItemSummary};

/// The configured item store
///
/// [`ItemRepository`] is not object safe, so the backends are dispatched
/// through this enum.
#[derive(Clone)]
pub enum ItemStore {
    /// Process-local store
    Memory(InMemoryItemRepository),
    /// SurrealDB store
    #[cfg(feature = "surrealdb")]
    Surreal(SurrealItemRepository),
}

impl ItemStore {
    /// Open the store selected by `config`
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory item store");
                Ok(Self::Memory(InMemoryItemRepository::new()))
            }
            #[cfg(feature = "surrealdb")]
            StorageBackend::Surrealdb => {
                let surreal = config.surrealdb.as_ref().ok_or_else(|| {
                    config_error(
                        "storage.backend is 'surrealdb' but no [storage.surrealdb] section is configured",
                    )
                })?;
                Ok(Self::Surreal(SurrealItemRepository::connect(surreal).await?))
            }
            #[cfg(not(feature = "surrealdb"))]
            StorageBackend::Surrealdb => Err(config_error(
                "storage.backend is 'surrealdb' but the `surrealdb` feature is disabled",
            )),
        }
    }

    /// Short backend name for logs and readiness output
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "surrealdb")]
            Self::Surreal(_) => "surrealdb",
        }
    }
}

impl From<InMemoryItemRepository> for ItemStore {
    fn from(repository: InMemoryItemRepository) -> Self {
        Self::Memory(repository)
    }
}

macro_rules! dispatch {
    ($self:ident, $repository:ident => $call:expr) => {
        match $self {
            ItemStore::Memory($repository) => $call,
            #[cfg(feature = "surrealdb")]
            ItemStore::Surreal($repository) => $call,
        }
    };
}

impl ItemRepository for ItemStore {
    async fn find_by_item_id(&self, item_id: &str) -> RepositoryResult<Option<Item>> {
        dispatch!(self, repository => repository.find_by_item_id(item_id).await)
    }

    async fn find_all(&self, sort: &SortSpec) -> RepositoryResult<Vec<Item>> {
        dispatch!(self, repository => repository.find_all(sort).await)
    }

    async fn find_projected(
        &self,
        sort: &SortSpec,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<ItemSummary>> {
        dispatch!(self, repository => repository.find_projected(sort, pagination).await)
    }

    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        dispatch!(self, repository => repository.save(item).await)
    }

    async fn delete_by_item_id(&self, item_id: &str) -> RepositoryResult<()> {
        dispatch!(self, repository => repository.delete_by_item_id(item_id).await)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        dispatch!(self, repository => repository.count().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let store = ItemStore::from_config(&StorageConfig::default()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[cfg(feature = "surrealdb")]
    #[tokio::test]
    async fn test_surrealdb_backend_from_config() {
        let config = StorageConfig {
            backend: StorageBackend::Surrealdb,
            surrealdb: Some(crate::config::SurrealDbConfig {
                url: "mem://".to_string(),
                namespace: "test".to_string(),
                database: "store".to_string(),
                username: None,
                password: None,
                max_retries: 0,
                retry_delay_secs: 1,
            }),
        };
        let store = ItemStore::from_config(&config).await.unwrap();
        assert_eq!(store.backend_name(), "surrealdb");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_surrealdb_backend_without_section_fails() {
        let config = StorageConfig {
            backend: StorageBackend::Surrealdb,
            surrealdb: None,
        };
        assert!(matches!(
            ItemStore::from_config(&config).await,
            Err(Error::Config(_))
        ));
    }
}
