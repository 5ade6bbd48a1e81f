//! HTTP handlers
//!
//! Thin adapters between axum extractors and [`ItemService`](crate::service::ItemService).
//! Authentication happens before any handler runs; handlers that record the
//! caller take [`Claims`](crate::middleware::Claims) as an extractor.

pub(crate) mod items;
mod query;

pub use items::{
    create_item, delete_item, get_item, items_with_paging, items_with_skip, list_items,
    update_item,
};
pub use query::ListParams;
