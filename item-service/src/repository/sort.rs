//! Sort specification parsing
//!
//! A `sort` query parameter arrives as a flat list of tokens in one of two
//! encodings:
//!
//! - single order split across two tokens: `sort=name&sort=asc`
//!   gives `["name", "asc"]`
//! - one `field,direction` pair per token: `sort=name,asc&sort=createTime,desc`
//!   gives `["name,asc", "createTime,desc"]`
//!
//! The encoding is chosen by the first token: without a comma it must be the
//! two-token form. Directions are `asc` or `desc` in any case.
//!
//! ```rust
//! use item_service::repository::{SortDirection, SortField, SortSpec};
//!
//! let spec = SortSpec::parse(&["name,asc", "createTime,DESC"]).unwrap();
//! assert_eq!(spec.orders()[0].field, SortField::Name);
//! assert_eq!(spec.orders()[1].direction, SortDirection::Descending);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::Item;

/// Error produced while parsing a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// No tokens at all
    #[error("sort specification is empty")]
    Empty,

    /// A lone field token with no direction after it
    #[error("sort field '{0}' has no direction")]
    MissingDirection(String),

    /// A token that fits neither encoding
    #[error("malformed sort token '{0}', expected 'field,direction'")]
    Malformed(String),

    /// Direction other than asc/desc
    #[error("invalid sort direction '{0}', expected 'asc' or 'desc'")]
    InvalidDirection(String),

    /// Field that items cannot be sorted by
    #[error("unknown sort field '{0}'")]
    UnknownField(String),
}

/// Direction of a single sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first; absent values come first
    #[default]
    Ascending,
    /// Largest first; absent values come last
    Descending,
}

impl SortDirection {
    /// Keyword used in SurrealQL `ORDER BY`
    #[must_use]
    pub const fn as_surql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Orient an ascending comparison
    #[must_use]
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(Self::Ascending)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(Self::Descending)
        } else {
            Err(SortError::InvalidDirection(s.to_string()))
        }
    }
}

/// Item field that listings can be sorted by
///
/// Parsed from the API (JSON) names; [`SortField::column`] gives the name
/// used in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Public identifier (`id` or `itemId`)
    ItemId,
    /// `name`
    Name,
    /// `description`
    Description,
    /// `createTime`
    CreateTime,
    /// `createdBy`
    CreatedBy,
    /// `updateTime`
    UpdateTime,
    /// `updatedBy`
    UpdatedBy,
}

impl SortField {
    /// Name of the field in API payloads
    #[must_use]
    pub const fn api_name(&self) -> &'static str {
        match self {
            Self::ItemId => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::CreateTime => "createTime",
            Self::CreatedBy => "createdBy",
            Self::UpdateTime => "updateTime",
            Self::UpdatedBy => "updatedBy",
        }
    }

    /// Name of the field in stored documents
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::ItemId => "item_id",
            Self::Name => "name",
            Self::Description => "description",
            Self::CreateTime => "create_time",
            Self::CreatedBy => "created_by",
            Self::UpdateTime => "update_time",
            Self::UpdatedBy => "updated_by",
        }
    }

    /// Ascending comparison of two items on this field
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            Self::ItemId => a.item_id.cmp(&b.item_id),
            Self::Name => a.name.cmp(&b.name),
            Self::Description => a.description.cmp(&b.description),
            Self::CreateTime => a.create_time.cmp(&b.create_time),
            Self::CreatedBy => a.created_by.cmp(&b.created_by),
            // Option orders None first
            Self::UpdateTime => a.update_time.cmp(&b.update_time),
            Self::UpdatedBy => a.updated_by.cmp(&b.updated_by),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" | "itemId" => Ok(Self::ItemId),
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "createTime" => Ok(Self::CreateTime),
            "createdBy" => Ok(Self::CreatedBy),
            "updateTime" => Ok(Self::UpdateTime),
            "updatedBy" => Ok(Self::UpdatedBy),
            other => Err(SortError::UnknownField(other.to_string())),
        }
    }
}

/// One (field, direction) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Create a sort order
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Ascending order on `field`
    #[must_use]
    pub const fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Descending order on `field`
    #[must_use]
    pub const fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    fn parse_pair(field: &str, direction: &str, token: &str) -> Result<Self, SortError> {
        if field.trim().is_empty() {
            return Err(SortError::Malformed(token.to_string()));
        }
        Ok(Self::new(field.parse()?, direction.parse()?))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

/// Ordered, non-empty list of sort orders; the first one is the primary key
///
/// Items equal on every listed field are ordered by public identifier
/// (ascending), so every store yields the same total order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<SortOrder>);

impl SortSpec {
    /// Build a spec from already-parsed orders
    pub fn new(orders: Vec<SortOrder>) -> Result<Self, SortError> {
        if orders.is_empty() {
            return Err(SortError::Empty);
        }
        Ok(Self(orders))
    }

    /// Spec with a single order
    #[must_use]
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self(vec![SortOrder::new(field, direction)])
    }

    /// Parse raw `sort` tokens in either encoding
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SortError> {
        let first = tokens.first().ok_or(SortError::Empty)?.as_ref();

        if !first.contains(',') {
            return match tokens {
                [field, direction] => {
                    let order = SortOrder::parse_pair(field.as_ref(), direction.as_ref(), first)?;
                    Ok(Self(vec![order]))
                }
                [_] => Err(SortError::MissingDirection(first.to_string())),
                _ => Err(SortError::Malformed(first.to_string())),
            };
        }

        tokens
            .iter()
            .map(|token| {
                let token = token.as_ref();
                let (field, direction) = token
                    .split_once(',')
                    .ok_or_else(|| SortError::Malformed(token.to_string()))?;
                SortOrder::parse_pair(field, direction, token)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// The orders, primary first
    #[must_use]
    pub fn orders(&self) -> &[SortOrder] {
        &self.0
    }

    /// Whether the public identifier already takes part in the ordering
    fn orders_by_item_id(&self) -> bool {
        self.0.iter().any(|order| order.field == SortField::ItemId)
    }

    /// Compare two items, tie-breaking on the public identifier
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        self.0
            .iter()
            .map(|order| order.direction.apply(order.field.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.item_id.cmp(&b.item_id))
    }

    /// SurrealQL `ORDER BY` body, e.g. `name DESC, item_id ASC`
    #[must_use]
    pub fn to_surql(&self) -> String {
        let mut clauses: Vec<String> = self
            .0
            .iter()
            .map(|order| format!("{} {}", order.field.column(), order.direction.as_surql()))
            .collect();
        if !self.orders_by_item_id() {
            clauses.push(format!("{} ASC", SortField::ItemId.column()));
        }
        clauses.join(", ")
    }

    /// Fields this sort orders by, including the identifier tie-breaker
    pub fn fields(&self) -> impl Iterator<Item = SortField> + '_ {
        let tie_breaker = (!self.orders_by_item_id()).then_some(SortField::ItemId);
        self.0.iter().map(|order| order.field).chain(tie_breaker)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let orders: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&orders.join(";"))
    }
}
