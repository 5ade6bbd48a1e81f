//! Response views
//!
//! Pure field selections over [`Item`] and [`ItemSummary`]:
//!
//! - [`ItemView`]: a single item, update fields omitted until the first update
//! - [`ItemListView`]: identifier, name and creation time only
//! - [`ItemsView`]: one page of list views with the returned and total counts

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemSummary};
use crate::ids::ItemId;
use crate::paging::ItemPage;

/// Single-item view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            id: item.item_id,
            name: item.name,
            description: item.description,
            create_time: item.create_time,
            created_by: item.created_by,
            update_time: item.update_time,
            updated_by: item.updated_by,
        }
    }
}

impl IntoResponse for ItemView {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// List-item view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ItemListView {
    pub id: ItemId,
    pub name: String,
    pub create_time: DateTime<Utc>,
}

impl From<ItemSummary> for ItemListView {
    fn from(summary: ItemSummary) -> Self {
        Self {
            id: summary.item_id,
            name: summary.name,
            create_time: summary.create_time,
        }
    }
}

impl From<Item> for ItemListView {
    fn from(item: Item) -> Self {
        ItemSummary::from(item).into()
    }
}

/// Paged view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ItemsView {
    pub items: Vec<ItemListView>,
    /// Number of items on this page
    pub amount: usize,
    /// Number of items in the whole collection
    pub total_amount: u64,
}

impl From<ItemPage> for ItemsView {
    fn from(page: ItemPage) -> Self {
        let amount = page.amount();
        Self {
            items: page.items.into_iter().map(ItemListView::from).collect(),
            amount,
            total_amount: page.total,
        }
    }
}

impl IntoResponse for ItemsView {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
