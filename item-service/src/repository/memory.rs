//! In-memory item repository
//!
//! Backs tests and local runs without a database. Locks are held only for the
//! duration of a single map operation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::sort::SortSpec;
use super::traits::{ItemRepository, RepositoryResult};
use crate::models::{Item, ItemSummary};

const ENTITY: &str = "Item";

#[derive(Debug, Default)]
struct Documents {
    /// storage id -> item
    by_storage_id: HashMap<String, Item>,
    /// public id -> storage id
    by_item_id: HashMap<String, String>,
}

impl Documents {
    fn sorted(&self, sort: &SortSpec) -> Vec<Item> {
        let mut items: Vec<Item> = self.by_storage_id.values().cloned().collect();
        items.sort_by(|a, b| sort.compare(a, b));
        items
    }
}

/// Item repository holding documents in a shared map
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemRepository {
    documents: Arc<RwLock<Documents>>,
}

impl InMemoryItemRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemRepository for InMemoryItemRepository {
    async fn find_by_item_id(&self, item_id: &str) -> RepositoryResult<Option<Item>> {
        let documents = self.documents.read().await;
        Ok(documents
            .by_item_id
            .get(item_id)
            .and_then(|storage_id| documents.by_storage_id.get(storage_id))
            .cloned())
    }

    async fn find_all(&self, sort: &SortSpec) -> RepositoryResult<Vec<Item>> {
        Ok(self.documents.read().await.sorted(sort))
    }

    async fn find_projected(
        &self,
        sort: &SortSpec,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<ItemSummary>> {
        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        Ok(self
            .documents
            .read()
            .await
            .sorted(sort)
            .iter()
            .skip(offset)
            .take(limit)
            .map(ItemSummary::from)
            .collect())
    }

    async fn save(&self, mut item: Item) -> RepositoryResult<Item> {
        item.truncate_timestamps();
        let mut documents = self.documents.write().await;

        let Some(storage_id) = item.storage_id.clone() else {
            if documents.by_item_id.contains_key(item.item_id.as_str()) {
                return Err(RepositoryError::already_exists(ENTITY, item.item_id.as_str()));
            }

            let storage_id = Uuid::new_v4().simple().to_string();
            item.storage_id = Some(storage_id.clone());
            item.version = 0;
            documents
                .by_item_id
                .insert(item.item_id.as_str().to_string(), storage_id.clone());
            documents.by_storage_id.insert(storage_id, item.clone());
            tracing::debug!(item_id = %item.item_id, "Inserted item");
            return Ok(item);
        };

        let stored = documents.by_storage_id.get_mut(&storage_id).ok_or_else(|| {
            RepositoryError::not_found(ENTITY, item.item_id.as_str())
                .with_operation(RepositoryOperation::Save)
        })?;

        if stored.version != item.version {
            return Err(RepositoryError::version_conflict(
                ENTITY,
                stored.item_id.as_str(),
                item.version,
            ));
        }

        item.item_id = stored.item_id.clone();
        item.create_time = stored.create_time;
        item.created_by = stored.created_by.clone();
        item.version = stored.version + 1;
        *stored = item.clone();

        tracing::debug!(item_id = %item.item_id, version = item.version, "Updated item");
        Ok(item)
    }

    async fn delete_by_item_id(&self, item_id: &str) -> RepositoryResult<()> {
        let mut documents = self.documents.write().await;
        if let Some(storage_id) = documents.by_item_id.remove(item_id) {
            documents.by_storage_id.remove(&storage_id);
            tracing::debug!(item_id, "Deleted item");
        }
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let len = self.documents.read().await.by_storage_id.len();
        Ok(len as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryErrorKind;
    use crate::repository::sort::{SortDirection, SortField};
    use chrono::Utc;

    fn by_name(direction: SortDirection) -> SortSpec {
        SortSpec::by(SortField::Name, direction)
    }

    async fn seeded(names: &[&str]) -> InMemoryItemRepository {
        let repository = InMemoryItemRepository::new();
        for name in names {
            repository
                .save(Item::new(*name, "description", "alice", Utc::now()))
                .await
                .unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn test_insert_assigns_storage_id_and_version_zero() {
        let repository = InMemoryItemRepository::new();
        let saved = repository
            .save(Item::new("Widget", "description", "alice", Utc::now()))
            .await
            .unwrap();

        assert!(saved.storage_id.is_some());
        assert_eq!(saved.version, 0);
        assert_eq!(repository.count().await.unwrap(), 1);

        let found = repository
            .find_by_item_id(saved.item_id.as_str())
            .await
            .unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_update_increments_version() {
        let repository = InMemoryItemRepository::new();
        let mut item = repository
            .save(Item::new("Widget", "description", "alice", Utc::now()))
            .await
            .unwrap();

        item.name = "Gadget".to_string();
        let updated = repository.save(item).await.unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(updated.name, "Gadget");

        let stored = repository
            .find_by_item_id(updated.item_id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let repository = InMemoryItemRepository::new();
        let original = repository
            .save(Item::new("Widget", "description", "alice", Utc::now()))
            .await
            .unwrap();

        let mut first = original.clone();
        first.name = "First".to_string();
        repository.save(first).await.unwrap();

        let mut second = original;
        second.name = "Second".to_string();
        let err = repository.save(second).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::VersionConflict);

        let stored = repository.find_all(&by_name(SortDirection::Ascending)).await.unwrap();
        assert_eq!(stored[0].name, "First");
    }

    #[tokio::test]
    async fn test_write_once_fields_are_kept() {
        let repository = InMemoryItemRepository::new();
        let saved = repository
            .save(Item::new("Widget", "description", "alice", Utc::now()))
            .await
            .unwrap();

        let mut tampered = saved.clone();
        tampered.created_by = "mallory".to_string();
        tampered.create_time = Utc::now() + chrono::Duration::days(1);
        let updated = repository.save(tampered).await.unwrap();

        assert_eq!(updated.created_by, "alice");
        assert_eq!(updated.create_time, saved.create_time);
    }

    #[tokio::test]
    async fn test_unknown_storage_id_is_not_found() {
        let repository = InMemoryItemRepository::new();
        let mut item = Item::new("Widget", "description", "alice", Utc::now());
        item.storage_id = Some("missing".to_string());

        let err = repository.save(item).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::Save);
    }

    #[tokio::test]
    async fn test_duplicate_public_id_rejected() {
        let repository = InMemoryItemRepository::new();
        let item = Item::new("Widget", "description", "alice", Utc::now());
        repository.save(item.clone()).await.unwrap();

        let err = repository.save(item).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_find_all_sorted() {
        let repository = seeded(&["bravo", "alpha", "charlie"]).await;

        let names = |items: Vec<Item>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

        let asc = repository.find_all(&by_name(SortDirection::Ascending)).await.unwrap();
        assert_eq!(names(asc), vec!["alpha", "bravo", "charlie"]);

        let desc = repository.find_all(&by_name(SortDirection::Descending)).await.unwrap();
        assert_eq!(names(desc), vec!["charlie", "bravo", "alpha"]);
    }

    #[tokio::test]
    async fn test_find_projected_slices() {
        let repository = seeded(&["delta", "alpha", "charlie", "bravo"]).await;
        let sort = by_name(SortDirection::Ascending);

        let page = repository
            .find_projected(&sort, Pagination::new(1, 2))
            .await
            .unwrap();
        let names: Vec<_> = page.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["bravo", "charlie"]);

        let beyond = repository
            .find_projected(&sort, Pagination::new(10, 2))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_item_id() {
        let repository = InMemoryItemRepository::new();
        let saved = repository
            .save(Item::new("Widget", "description", "alice", Utc::now()))
            .await
            .unwrap();

        repository
            .delete_by_item_id(saved.item_id.as_str())
            .await
            .unwrap();
        assert!(repository
            .find_by_item_id(saved.item_id.as_str())
            .await
            .unwrap()
            .is_none());
        assert_eq!(repository.count().await.unwrap(), 0);

        // unknown ids are a no-op
        repository.delete_by_item_id("missing").await.unwrap();
    }
}
