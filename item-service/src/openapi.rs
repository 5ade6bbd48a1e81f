//! OpenAPI document and Swagger UI
//!
//! Enabled with the `openapi` feature. The JSON document is served at
//! [`API_DOCS_PATH`] and the UI under [`SWAGGER_UI_PATH`]; both are in the
//! default public routes. Operations that need a token reference the
//! [`BEARER_AUTH`] security scheme.

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::handlers::items;
use crate::ids::ItemId;
use crate::models::{ItemListView, ItemRequest, ItemView, ItemsView};
use crate::state::AppState;

/// Path of the generated OpenAPI JSON
pub const API_DOCS_PATH: &str = "/v3/api-docs";

/// Mount point of the Swagger UI
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Name of the bearer security scheme
pub const BEARER_AUTH: &str = "bearerAuth";

/// Item service API description
#[derive(OpenApi)]
#[openapi(
    info(
        title = "item-service",
        description = "Items with sortable listings and two interchangeable pagination strategies"
    ),
    paths(
        items::list_items,
        items::items_with_paging,
        items::items_with_skip,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
    ),
    components(schemas(ItemId, ItemView, ItemListView, ItemsView, ItemRequest, ErrorResponse)),
    modifiers(&BearerAuthScheme),
    tags((name = "items", description = "Item management"))
)]
pub struct ApiDoc;

struct BearerAuthScheme;

impl Modify for BearerAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme(BEARER_AUTH, bearer_auth());
    }
}

/// HTTP bearer scheme carrying a JWT
pub fn bearer_auth() -> SecurityScheme {
    SecurityScheme::Http(
        HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .build(),
    )
}

/// Routes serving the document and the UI
pub fn router() -> Router<AppState> {
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(API_DOCS_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn document() -> Value {
        serde_json::to_value(ApiDoc::openapi()).unwrap()
    }

    #[test]
    fn test_document_lists_item_routes() {
        let doc = document();
        let paths = doc["paths"].as_object().unwrap();

        for path in ["/items", "/items/paging", "/items/skip", "/items/{id}"] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["paths"]["/items"]["post"].is_object());
        assert!(doc["paths"]["/items/{id}"]["put"].is_object());
        assert!(doc["paths"]["/items/{id}"]["delete"].is_object());
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = document();
        let scheme = &doc["components"]["securitySchemes"][BEARER_AUTH];

        assert_eq!(scheme["type"], "http");
        assert_eq!(scheme["scheme"], "bearer");
        assert_eq!(scheme["bearerFormat"], "JWT");
    }

    #[test]
    fn test_only_protected_operations_require_bearer() {
        let doc = document();
        let requires_bearer = |path: &str, method: &str| {
            doc["paths"][path][method]["security"]
                .as_array()
                .is_some_and(|reqs| reqs.iter().any(|r| r.get(BEARER_AUTH).is_some()))
        };

        assert!(requires_bearer("/items/{id}", "get"));
        assert!(requires_bearer("/items", "post"));
        assert!(requires_bearer("/items/{id}", "put"));
        assert!(requires_bearer("/items/{id}", "delete"));

        assert!(!requires_bearer("/items", "get"));
        assert!(!requires_bearer("/items/paging", "get"));
        assert!(!requires_bearer("/items/skip", "get"));
    }

    #[test]
    fn test_paged_listings_document_query_parameters() {
        let doc = document();

        for path in ["/items/paging", "/items/skip"] {
            let names: Vec<&str> = doc["paths"][path]["get"]["parameters"]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(|p| p["name"].as_str())
                .collect();
            assert_eq!(names, vec!["sort", "page", "size"], "{}", path);
        }
    }

    #[test]
    fn test_request_schema_carries_length_limits() {
        let doc = document();
        let request = &doc["components"]["schemas"]["ItemRequest"]["properties"];

        assert_eq!(request["name"]["minLength"], 3);
        assert_eq!(request["name"]["maxLength"], 50);
        assert_eq!(request["description"]["maxLength"], 500);
    }
}
