//! Domain models and response views
pub mod item;
pub mod views;

pub use item::{
    item_timestamp, Item, ItemRequest, ItemSummary, DESCRIPTION_LENGTH, NAME_LENGTH,
    TIMESTAMP_DIGITS,
};
pub use views::{ItemListView, ItemView, ItemsView};
