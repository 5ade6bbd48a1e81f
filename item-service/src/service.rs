//! Item operations behind the HTTP handlers
//!
//! [`ItemService`] owns the repository and turns domain results into the
//! response views. It holds no other state, so it is cheap to clone into every
//! request.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{Item, ItemListView, ItemRequest, ItemView, ItemsView};
use crate::paging::{PagingStrategy, ProjectedPaging, SkipTakePaging};
use crate::repository::{ItemRepository, PageRequest, SortSpec};

/// Item use cases over any [`ItemRepository`]
#[derive(Debug, Clone)]
pub struct ItemService<R> {
    repository: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Wrap a repository
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    async fn find(&self, item_id: &str) -> Result<Item> {
        self.repository
            .find_by_item_id(item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Item {} not found", item_id)))
    }

    /// Single item by public identifier
    pub async fn get_item(&self, item_id: &str) -> Result<ItemView> {
        self.find(item_id).await.map(ItemView::from)
    }

    /// Whole collection in list views
    pub async fn list_items(&self, sort: &SortSpec) -> Result<Vec<ItemListView>> {
        let items = self.repository.find_all(sort).await?;
        Ok(items.into_iter().map(ItemListView::from).collect())
    }

    /// One page, offset and limit applied by the store
    pub async fn items_with_paging(&self, request: &PageRequest) -> Result<ItemsView> {
        self.page_with(&ProjectedPaging, request).await
    }

    /// One page, sliced from the full sorted collection
    pub async fn items_with_skip(&self, request: &PageRequest) -> Result<ItemsView> {
        self.page_with(&SkipTakePaging, request).await
    }

    async fn page_with<S: PagingStrategy>(
        &self,
        strategy: &S,
        request: &PageRequest,
    ) -> Result<ItemsView> {
        let page = strategy.fetch_page(&self.repository, request).await?;
        tracing::debug!(
            strategy = strategy.name(),
            page = request.page(),
            size = request.size(),
            amount = page.amount(),
            total = page.total,
            "Fetched item page"
        );
        Ok(ItemsView::from(page))
    }

    /// Create an item owned by `caller`
    pub async fn add_item(&self, request: ItemRequest, caller: &str) -> Result<ItemView> {
        request.validate()?;

        let item = Item::new(request.name, request.description, caller, Utc::now());
        let saved = self.repository.save(item).await?;
        Ok(ItemView::from(saved))
    }

    /// Replace name and description of an existing item
    ///
    /// Fields are only written when they differ from the stored values; the
    /// update time and updater are stamped on every call.
    pub async fn update_item(
        &self,
        item_id: &str,
        request: ItemRequest,
        caller: &str,
    ) -> Result<ItemView> {
        request.validate()?;

        let mut item = self.find(item_id).await?;
        if item.name != request.name {
            item.name = request.name;
        }
        if item.description != request.description {
            item.description = request.description;
        }
        item.touch(caller, Utc::now());

        let saved = self.repository.save(item).await?;
        Ok(ItemView::from(saved))
    }

    /// Remove an item; unknown identifiers are not an error
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        self.repository.delete_by_item_id(item_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::repository::{InMemoryItemRepository, SortDirection, SortField};

    fn service() -> ItemService<InMemoryItemRepository> {
        ItemService::new(InMemoryItemRepository::new())
    }

    fn by_name(direction: SortDirection) -> SortSpec {
        SortSpec::by(SortField::Name, direction)
    }

    #[tokio::test]
    async fn test_add_then_get_round_trip() {
        let service = service();
        let created = service
            .add_item(ItemRequest::new("Widget", "A useful widget"), "alice")
            .await
            .unwrap();

        let fetched = service.get_item(created.id.as_str()).await.unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.description, "A useful widget");
        assert_eq!(fetched.created_by, "alice");
        assert_eq!(fetched.create_time, created.create_time);
        assert!(fetched.update_time.is_none());
        assert!(fetched.updated_by.is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_request() {
        let service = service();
        let err = service
            .add_item(ItemRequest::new("ab", "A useful widget"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert_eq!(service.repository().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_name_only_keeps_creation_fields() {
        let service = service();
        let created = service
            .add_item(ItemRequest::new("Widget", "A useful widget"), "alice")
            .await
            .unwrap();

        let updated = service
            .update_item(created.id.as_str(), ItemRequest::new("Gadget", "A useful widget"), "bob")
            .await
            .unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description, "A useful widget");
        assert_eq!(updated.create_time, created.create_time);
        assert_eq!(updated.created_by, "alice");
        assert_eq!(updated.updated_by.as_deref(), Some("bob"));
        assert!(updated.update_time.is_some());
    }

    #[tokio::test]
    async fn test_update_without_changes_still_stamps_updater() {
        let service = service();
        let created = service
            .add_item(ItemRequest::new("Widget", "A useful widget"), "alice")
            .await
            .unwrap();

        let updated = service
            .update_item(created.id.as_str(), ItemRequest::new("Widget", "A useful widget"), "carol")
            .await
            .unwrap();
        assert_eq!(updated.updated_by.as_deref(), Some("carol"));

        let stored = service
            .repository()
            .find_by_item_id(created.id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_item_is_not_found() {
        let err = service()
            .update_item(
                ItemId::generate().as_str(),
                ItemRequest::new("Widget", "A useful widget"),
                "bob",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let created = service
            .add_item(ItemRequest::new("Widget", "A useful widget"), "alice")
            .await
            .unwrap();

        service.delete_item(created.id.as_str()).await.unwrap();
        let err = service.get_item(created.id.as_str()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // deleting again is still fine
        service.delete_item(created.id.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unassigned_id_is_not_found() {
        let err = service()
            .get_item(ItemId::generate().as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_items_sorted() {
        let service = service();
        for name in ["bravo", "alpha", "charlie"] {
            service
                .add_item(ItemRequest::new(name, "description"), "alice")
                .await
                .unwrap();
        }

        let listed = service
            .list_items(&by_name(SortDirection::Descending))
            .await
            .unwrap();
        let names: Vec<_> = listed.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
    }

    #[tokio::test]
    async fn test_paged_views() {
        let service = service();
        for name in ["bravo", "alpha", "charlie"] {
            service
                .add_item(ItemRequest::new(name, "description"), "alice")
                .await
                .unwrap();
        }

        let request = PageRequest::new(1, 2, by_name(SortDirection::Ascending)).unwrap();
        let paged = service.items_with_paging(&request).await.unwrap();
        let skipped = service.items_with_skip(&request).await.unwrap();

        assert_eq!(paged.amount, 1);
        assert_eq!(paged.total_amount, 3);
        assert_eq!(paged.items[0].name, "charlie");
        assert_eq!(paged, skipped);
    }
}
