//! Router assembly
//!
//! | Method | Path              | Auth   |
//! |--------|-------------------|--------|
//! | GET    | `/items`          | public |
//! | GET    | `/items/paging`   | public |
//! | GET    | `/items/skip`     | public |
//! | GET    | `/items/{id}`     | bearer |
//! | POST   | `/items`          | bearer |
//! | PUT    | `/items/{id}`     | bearer |
//! | DELETE | `/items/{id}`     | bearer |
//! | GET    | `/health`         | public |
//! | GET    | `/ready`          | public |
//! | GET    | `/v3/api-docs`    | public |
//! | GET    | `/swagger-ui/**`  | public |
//!
//! The last two exist only with the `openapi` feature. Which routes are
//! public is decided by `jwt.public_routes`; the table shows
//! the defaults.

use axum::{middleware, routing::get, Router};

use crate::{handlers, health, middleware::JwtAuth, state::AppState};

/// Build the application router
///
/// The authentication layer wraps every matched route; unmatched paths fall
/// through to axum's 404 without touching it.
pub fn router(state: AppState, auth: JwtAuth) -> Router {
    let routes = Router::new()
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route("/items/paging", get(handlers::items_with_paging))
        .route("/items/skip", get(handlers::items_with_skip))
        .route(
            "/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness));

    #[cfg(feature = "openapi")]
    let routes = routes.merge(crate::openapi::router());

    routes
        .route_layer(middleware::from_fn_with_state(auth, JwtAuth::middleware))
        .with_state(state)
}
