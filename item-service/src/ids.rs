//! Identifiers
//!
//! - [`ItemId`]: the public item identifier, a random UUID assigned at creation
//!   and never reassigned. It is the only key exposed over HTTP.
//! - [`MakeTypedRequestId`]: request ids for tower-http in TypeID form
//!   (`req_<uuidv7>`), time-sortable for log correlation.

use std::fmt;

use http::Request;
use mti::prelude::*;
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Public identifier of an item
///
/// Lookups accept any string: an identifier that was never assigned simply
/// matches nothing, so malformed ids surface as "not found".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh identifier (random UUID, hyphenated lowercase)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Prefix of generated request ids
pub const REQUEST_ID_PREFIX: &str = "req";

/// Generates `req_<uuidv7>` request ids for `SetRequestIdLayer`
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = REQUEST_ID_PREFIX.create_type_id::<V7>();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(RequestId::new(header_value))
    }
}
