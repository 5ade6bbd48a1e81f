use std::ops::RangeInclusive;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ids::ItemId;

/// Allowed length of an item name, in characters
pub const NAME_LENGTH: RangeInclusive<usize> = 3..=50;

/// Allowed length of an item description, in characters
pub const DESCRIPTION_LENGTH: RangeInclusive<usize> = 3..=500;

/// Fractional-second digits kept on item timestamps
///
/// Matches what the document store persists, so a timestamp reads back
/// exactly as it was returned when written.
pub const TIMESTAMP_DIGITS: u16 = 6;

/// `time` cut to [`TIMESTAMP_DIGITS`]
pub fn item_timestamp(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(TIMESTAMP_DIGITS)
}

/// Persisted item
///
/// `item_id`, `create_time` and `created_by` are written once when the item is
/// first saved. `version` is owned by the repository: it starts at 0 and grows
/// by one on every successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Store-assigned identifier, `None` until the first save
    pub storage_id: Option<String>,
    /// Public identifier
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    pub created_by: String,
    /// Set on every mutation after creation
    pub update_time: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    /// Optimistic concurrency counter
    pub version: u64,
}

impl Item {
    /// New, unsaved item created by `created_by` at `now`
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            storage_id: None,
            item_id: ItemId::generate(),
            name: name.into(),
            description: description.into(),
            create_time: item_timestamp(now),
            created_by: created_by.into(),
            update_time: None,
            updated_by: None,
            version: 0,
        }
    }

    /// Record a mutation by `caller` at `now`
    pub fn touch(&mut self, caller: impl Into<String>, now: DateTime<Utc>) {
        self.update_time = Some(item_timestamp(now));
        self.updated_by = Some(caller.into());
    }

    /// Cut both timestamps to [`TIMESTAMP_DIGITS`]; stores apply this on save
    pub fn truncate_timestamps(&mut self) {
        self.create_time = item_timestamp(self.create_time);
        self.update_time = self.update_time.map(item_timestamp);
    }

    /// Whether the item has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.storage_id.is_some()
    }
}

/// Projection of an item holding only the fields of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub name: String,
    pub create_time: DateTime<Utc>,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            create_time: item.create_time,
        }
    }
}

impl From<Item> for ItemSummary {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.item_id,
            name: item.name,
            create_time: item.create_time,
        }
    }
}

/// Request body of `POST /items` and `PUT /items/{id}`
///
/// Missing fields deserialize as empty strings so they are reported by
/// [`ItemRequest::validate`] like blank ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ItemRequest {
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(min_length = 3, max_length = 50))]
    pub name: String,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(min_length = 3, max_length = 500))]
    pub description: String,
}

impl ItemRequest {
    /// Create a request
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Check that name and description are present and within their length limits
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        check_text("name", &self.name, &NAME_LENGTH, &mut problems);
        check_text(
            "description",
            &self.description,
            &DESCRIPTION_LENGTH,
            &mut problems,
        );

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationError(problems.join("; ")))
        }
    }
}

fn check_text(
    field: &str,
    value: &str,
    length: &RangeInclusive<usize>,
    problems: &mut Vec<String>,
) {
    if value.trim().is_empty() {
        problems.push(format!("{} must not be blank", field));
        return;
    }

    let chars = value.chars().count();
    if !length.contains(&chars) {
        problems.push(format!(
            "{} must be between {} and {} characters (got {})",
            field,
            length.start(),
            length.end(),
            chars
        ));
    }
}
