//! Paged listings
//!
//! Two interchangeable strategies produce an [`ItemPage`] from a validated
//! [`PageRequest`]:
//!
//! - [`ProjectedPaging`] pushes offset and limit into the store and fetches only
//!   the list-view fields
//! - [`SkipTakePaging`] fetches the whole sorted collection and slices it in
//!   process
//!
//! Both issue an independent count for the total and return the same page for
//! the same data. A page starting at or past the end of the collection is empty,
//! not an error.

use std::future::Future;

use crate::models::ItemSummary;
use crate::repository::{ItemRepository, PageRequest, RepositoryResult};

/// One page of list-view items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPage {
    /// Items on this page, in sort order
    pub items: Vec<ItemSummary>,
    /// Size of the whole collection
    pub total: u64,
}

impl ItemPage {
    /// Number of items actually returned
    pub fn amount(&self) -> usize {
        self.items.len()
    }
}

/// A way of turning a page request into store calls
pub trait PagingStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the requested page together with the collection size
    fn fetch_page<R: ItemRepository>(
        &self,
        repository: &R,
        request: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<ItemPage>> + Send;
}

/// Offset and limit applied by the store, projected fields only
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectedPaging;

impl PagingStrategy for ProjectedPaging {
    fn name(&self) -> &'static str {
        "projected"
    }

    async fn fetch_page<R: ItemRepository>(
        &self,
        repository: &R,
        request: &PageRequest,
    ) -> RepositoryResult<ItemPage> {
        let (items, total) = tokio::try_join!(
            repository.find_projected(request.sort(), request.pagination()),
            repository.count(),
        )?;
        Ok(ItemPage { items, total })
    }
}

/// Whole sorted collection fetched, page sliced in process
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipTakePaging;

impl PagingStrategy for SkipTakePaging {
    fn name(&self) -> &'static str {
        "skip_take"
    }

    async fn fetch_page<R: ItemRepository>(
        &self,
        repository: &R,
        request: &PageRequest,
    ) -> RepositoryResult<ItemPage> {
        let (all, total) = tokio::try_join!(repository.find_all(request.sort()), repository.count())?;

        let bounds = request.pagination();
        let skip = usize::try_from(bounds.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(bounds.limit).unwrap_or(usize::MAX);

        let items = all
            .into_iter()
            .skip(skip)
            .take(take)
            .map(ItemSummary::from)
            .collect();
        Ok(ItemPage { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::repository::{
        InMemoryItemRepository, SortDirection, SortField, SortOrder, SortSpec,
    };
    use chrono::{Duration, TimeZone, Utc};

    async fn seeded(names: &[&str]) -> InMemoryItemRepository {
        let repository = InMemoryItemRepository::new();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for (index, name) in names.iter().enumerate() {
            // a few shared timestamps and names so tie-breaking matters
            let created = base + Duration::minutes((index % 3) as i64);
            repository
                .save(Item::new(*name, "description", "alice", created))
                .await
                .unwrap();
        }
        repository
    }

    fn names(page: &ItemPage) -> Vec<&str> {
        page.items.iter().map(|item| item.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_strategies_are_equivalent() {
        let repository = seeded(&[
            "kilo", "alpha", "echo", "alpha", "delta", "juliet", "bravo", "echo", "golf",
            "charlie", "hotel",
        ])
        .await;

        let specs = [
            SortSpec::by(SortField::Name, SortDirection::Ascending),
            SortSpec::by(SortField::Name, SortDirection::Descending),
            SortSpec::by(SortField::CreateTime, SortDirection::Descending),
            SortSpec::new(vec![
                SortOrder::asc(SortField::CreateTime),
                SortOrder::desc(SortField::Name),
            ])
            .unwrap(),
            SortSpec::by(SortField::UpdateTime, SortDirection::Ascending),
        ];

        for spec in &specs {
            for size in [1, 2, 3, 5, 11, 100] {
                for page in 0..13 {
                    let request = PageRequest::new(page, size, spec.clone()).unwrap();
                    let projected = ProjectedPaging.fetch_page(&repository, &request).await.unwrap();
                    let skip_take = SkipTakePaging.fetch_page(&repository, &request).await.unwrap();
                    assert_eq!(
                        projected, skip_take,
                        "sort {} page {} size {}",
                        spec, page, size
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_three_items_page_size_two() {
        let repository = seeded(&["charlie", "alpha", "bravo"]).await;
        let sort = SortSpec::by(SortField::Name, SortDirection::Ascending);

        let first = PageRequest::new(0, 2, sort.clone()).unwrap();
        let second = PageRequest::new(1, 2, sort).unwrap();

        let page = ProjectedPaging.fetch_page(&repository, &first).await.unwrap();
        assert_eq!(names(&page), vec!["alpha", "bravo"]);
        assert_eq!(page.amount(), 2);
        assert_eq!(page.total, 3);

        let page = ProjectedPaging.fetch_page(&repository, &second).await.unwrap();
        assert_eq!(names(&page), vec!["charlie"]);
        assert_eq!(page.amount(), 1);
        assert_eq!(page.total, 3);

        let page = SkipTakePaging.fetch_page(&repository, &first).await.unwrap();
        assert_eq!(names(&page), vec!["alpha", "bravo"]);
        assert_eq!(page.total, 3);

        let page = SkipTakePaging.fetch_page(&repository, &second).await.unwrap();
        assert_eq!(names(&page), vec!["charlie"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let repository = seeded(&["alpha", "bravo"]).await;
        let sort = SortSpec::by(SortField::Name, SortDirection::Ascending);
        let request = PageRequest::new(1, 2, sort.clone()).unwrap();

        let page = ProjectedPaging.fetch_page(&repository, &request).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);

        let far = PageRequest::new(i64::MAX / 2, 2, sort).unwrap();
        let page = SkipTakePaging.fetch_page(&repository, &far).await.unwrap();
        assert_eq!(page.amount(), 0);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let repository = InMemoryItemRepository::new();
        let request = PageRequest::new(
            0,
            100,
            SortSpec::by(SortField::Name, SortDirection::Descending),
        )
        .unwrap();

        let page = SkipTakePaging.fetch_page(&repository, &request).await.unwrap();
        assert_eq!(page, ItemPage { items: Vec::new(), total: 0 });
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(ProjectedPaging.name(), "projected");
        assert_eq!(SkipTakePaging.name(), "skip_take");
    }
}
