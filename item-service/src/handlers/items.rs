//! Item endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::query::ListParams;
use crate::error::Result;
use crate::middleware::Claims;
use crate::models::{ItemListView, ItemRequest, ItemView, ItemsView};
use crate::state::AppState;

/// `GET /items/{id}`
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Public item identifier")),
    responses(
        (status = 200, description = "The item", body = ItemView),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorResponse),
        (status = 404, description = "No item with this identifier", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = []))
))]
pub async fn get_item(
    State(state): State<AppState>,
    claims: Claims,
    Path(item_id): Path<String>,
) -> Result<ItemView> {
    tracing::info!(item_id = %item_id, caller = %claims.sub, "Fetching item");
    state.items().get_item(&item_id).await
}

/// `GET /items`
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("sort" = Option<Vec<String>>, Query, description = "Sort tokens, e.g. `createTime,desc`; may repeat")
    ),
    responses(
        (status = 200, description = "All items in sort order", body = Vec<ItemListView>),
        (status = 400, description = "Unknown sort field or direction", body = crate::error::ErrorResponse)
    )
))]
pub async fn list_items(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<Json<Vec<ItemListView>>> {
    tracing::info!(sort = %params.sort, "Listing items");
    let items = state.items().list_items(&params.sort).await?;
    Ok(Json(items))
}

/// `GET /items/paging`
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/items/paging",
    tag = "items",
    params(
        ("sort" = Option<Vec<String>>, Query, description = "Sort tokens, e.g. `createTime,desc`; may repeat"),
        ("page" = Option<i64>, Query, description = "Zero-based page index"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page, offset and limit applied by the store", body = ItemsView),
        (status = 400, description = "Invalid sort, page or size", body = crate::error::ErrorResponse)
    )
))]
pub async fn items_with_paging(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<ItemsView> {
    tracing::info!(page = params.page, size = params.size, sort = %params.sort, "Paging items");
    let request = params.page_request()?;
    state.items().items_with_paging(&request).await
}

/// `GET /items/skip`
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/items/skip",
    tag = "items",
    params(
        ("sort" = Option<Vec<String>>, Query, description = "Sort tokens, e.g. `createTime,desc`; may repeat"),
        ("page" = Option<i64>, Query, description = "Zero-based page index"),
        ("size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page, cut from the full sorted collection", body = ItemsView),
        (status = 400, description = "Invalid sort, page or size", body = crate::error::ErrorResponse)
    )
))]
pub async fn items_with_skip(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<ItemsView> {
    tracing::info!(page = params.page, size = params.size, sort = %params.sort, "Paging items by skip");
    let request = params.page_request()?;
    state.items().items_with_skip(&request).await
}

/// `POST /items`
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "The created item", body = ItemView),
        (status = 400, description = "Invalid request body", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = []))
))]
pub async fn create_item(
    State(state): State<AppState>,
    claims: Claims,
    body: std::result::Result<Json<ItemRequest>, JsonRejection>,
) -> Result<(StatusCode, ItemView)> {
    let Json(request) = body?;
    let caller = claims.caller()?;

    let created = state.items().add_item(request, caller).await?;
    tracing::info!(item_id = %created.id, caller, "Created item");
    Ok((StatusCode::CREATED, created))
}

/// `PUT /items/{id}`
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Public item identifier")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "The updated item", body = ItemView),
        (status = 400, description = "Invalid request body", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorResponse),
        (status = 404, description = "No item with this identifier", body = crate::error::ErrorResponse),
        (status = 409, description = "Item was modified concurrently", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = []))
))]
pub async fn update_item(
    State(state): State<AppState>,
    claims: Claims,
    Path(item_id): Path<String>,
    body: std::result::Result<Json<ItemRequest>, JsonRejection>,
) -> Result<ItemView> {
    let Json(request) = body?;
    let caller = claims.caller()?;

    let updated = state.items().update_item(&item_id, request, caller).await?;
    tracing::info!(item_id = %item_id, caller, "Updated item");
    Ok(updated)
}

/// `DELETE /items/{id}`
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Public item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorResponse),
        (status = 404, description = "No item with this identifier", body = crate::error::ErrorResponse)
    ),
    security(("bearerAuth" = []))
))]
pub async fn delete_item(
    State(state): State<AppState>,
    claims: Claims,
    Path(item_id): Path<String>,
) -> Result<StatusCode> {
    state.items().delete_item(&item_id).await?;
    tracing::info!(item_id = %item_id, caller = %claims.sub, "Deleted item");
    Ok(StatusCode::NO_CONTENT)
}
