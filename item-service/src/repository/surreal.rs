//! SurrealDB item repository
//!
//! Items live in the `item` table. The record key is the storage id; the public
//! identifier is a separate `item_id` field guarded by a unique index.
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that ordering on them is chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::sort::{SortField, SortSpec};
use super::traits::{ItemRepository, RepositoryResult};
use crate::config::SurrealDbConfig;
use crate::models::{Item, ItemSummary};
use crate::surrealdb_backend::{self, SurrealClient};

const ENTITY: &str = "Item";
const TABLE: &str = "item";

const SCHEMA: &str =
    "DEFINE INDEX IF NOT EXISTS item_id_unique ON TABLE item COLUMNS item_id UNIQUE;";

const FIELDS: &str = "record::id(id) AS storage_id, item_id, name, description, \
     create_time, created_by, update_time, updated_by, version";

/// Stored shape of an item
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(default, skip_serializing)]
    storage_id: Option<String>,
    item_id: String,
    name: String,
    description: String,
    create_time: String,
    created_by: String,
    #[serde(default)]
    update_time: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    version: u64,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    item_id: String,
    name: String,
    create_time: String,
}

#[derive(Debug, Deserialize)]
struct UpdatedDocument {
    version: u64,
    create_time: String,
    created_by: String,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(value: &str, operation: RepositoryOperation) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::serialization_error(
                operation,
                format!("invalid timestamp '{}': {}", value, e),
            )
        })
}

impl ItemDocument {
    fn from_item(item: &Item) -> Self {
        Self {
            storage_id: item.storage_id.clone(),
            item_id: item.item_id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            create_time: format_time(&item.create_time),
            created_by: item.created_by.clone(),
            update_time: item.update_time.as_ref().map(format_time),
            updated_by: item.updated_by.clone(),
            version: item.version,
        }
    }

    fn into_item(self, operation: RepositoryOperation) -> RepositoryResult<Item> {
        Ok(Item {
            create_time: parse_time(&self.create_time, operation)?,
            update_time: self
                .update_time
                .as_deref()
                .map(|time| parse_time(time, operation))
                .transpose()?,
            storage_id: self.storage_id,
            item_id: self.item_id.into(),
            name: self.name,
            description: self.description,
            created_by: self.created_by,
            updated_by: self.updated_by,
            version: self.version,
        })
    }
}

impl SummaryDocument {
    fn into_summary(self) -> RepositoryResult<ItemSummary> {
        Ok(ItemSummary {
            create_time: parse_time(&self.create_time, RepositoryOperation::FindProjected)?,
            item_id: self.item_id.into(),
            name: self.name,
        })
    }
}

/// Item repository backed by SurrealDB
#[derive(Clone)]
pub struct SurrealItemRepository {
    client: SurrealClient,
}

impl SurrealItemRepository {
    /// Wrap an already connected client and make sure the schema exists
    pub async fn new(client: SurrealClient) -> RepositoryResult<Self> {
        let repository = Self { client };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    /// Connect using the configuration, retrying per its settings
    pub async fn connect(config: &SurrealDbConfig) -> RepositoryResult<Self> {
        let client = surrealdb_backend::create_client(config).await?;
        Self::new(client).await
    }

    async fn ensure_schema(&self) -> RepositoryResult<()> {
        self.client
            .query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Connect))?;
        tracing::debug!(table = TABLE, "Item schema ready");
        Ok(())
    }

    async fn insert(&self, mut item: Item) -> RepositoryResult<Item> {
        let storage_id = Uuid::now_v7().simple().to_string();
        item.version = 0;
        let document = ItemDocument::from_item(&item);

        self.client
            .query("CREATE type::thing($table, $storage_id) CONTENT $document RETURN NONE")
            .bind(("table", TABLE))
            .bind(("storage_id", storage_id.clone()))
            .bind(("document", document))
            .await
            .and_then(|response| response.check())
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation(RepositoryOperation::Save)
                    .with_entity(ENTITY, item.item_id.as_str())
            })?;

        item.storage_id = Some(storage_id);
        tracing::debug!(item_id = %item.item_id, "Inserted item");
        Ok(item)
    }

    async fn update(&self, mut item: Item) -> RepositoryResult<Item> {
        let map_err = |e: surrealdb::Error| {
            RepositoryError::from(e)
                .with_operation(RepositoryOperation::Save)
                .with_entity(ENTITY, item.item_id.as_str())
        };

        let mut response = self
            .client
            .query(
                "UPDATE item SET name = $name, description = $description, \
                 update_time = $update_time, updated_by = $updated_by, version = version + 1 \
                 WHERE item_id = $item_id AND version = $version \
                 RETURN version, create_time, created_by",
            )
            .bind(("name", item.name.clone()))
            .bind(("description", item.description.clone()))
            .bind(("update_time", item.update_time.as_ref().map(format_time)))
            .bind(("updated_by", item.updated_by.clone()))
            .bind(("item_id", item.item_id.to_string()))
            .bind(("version", item.version))
            .await
            .map_err(map_err)?;
        let updated: Vec<UpdatedDocument> = response.take(0).map_err(map_err)?;

        let Some(updated) = updated.into_iter().next() else {
            // Nothing matched: either the item is gone or its version moved on
            return match self.find_by_item_id(item.item_id.as_str()).await? {
                Some(_) => Err(RepositoryError::version_conflict(
                    ENTITY,
                    item.item_id.as_str(),
                    item.version,
                )),
                None => Err(RepositoryError::not_found(ENTITY, item.item_id.as_str())
                    .with_operation(RepositoryOperation::Save)),
            };
        };

        item.version = updated.version;
        item.create_time = parse_time(&updated.create_time, RepositoryOperation::Save)?;
        item.created_by = updated.created_by;
        tracing::debug!(item_id = %item.item_id, version = item.version, "Updated item");
        Ok(item)
    }
}

impl ItemRepository for SurrealItemRepository {
    async fn find_by_item_id(&self, item_id: &str) -> RepositoryResult<Option<Item>> {
        let map_err =
            |e: surrealdb::Error| RepositoryError::from(e).with_operation(RepositoryOperation::FindById);

        let mut response = self
            .client
            .query(format!("SELECT {FIELDS} FROM item WHERE item_id = $item_id LIMIT 1"))
            .bind(("item_id", item_id.to_string()))
            .await
            .map_err(map_err)?;
        let documents: Vec<ItemDocument> = response.take(0).map_err(map_err)?;

        documents
            .into_iter()
            .next()
            .map(|document| document.into_item(RepositoryOperation::FindById))
            .transpose()
    }

    async fn find_all(&self, sort: &SortSpec) -> RepositoryResult<Vec<Item>> {
        let map_err =
            |e: surrealdb::Error| RepositoryError::from(e).with_operation(RepositoryOperation::FindAll);

        let mut response = self
            .client
            .query(format!("SELECT {FIELDS} FROM item ORDER BY {}", sort.to_surql()))
            .await
            .map_err(map_err)?;
        let documents: Vec<ItemDocument> = response.take(0).map_err(map_err)?;

        documents
            .into_iter()
            .map(|document| document.into_item(RepositoryOperation::FindAll))
            .collect()
    }

    async fn find_projected(
        &self,
        sort: &SortSpec,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<ItemSummary>> {
        let map_err = |e: surrealdb::Error| {
            RepositoryError::from(e).with_operation(RepositoryOperation::FindProjected)
        };

        // ORDER BY may only name selected fields
        let mut columns = vec![
            SortField::ItemId.column(),
            SortField::Name.column(),
            SortField::CreateTime.column(),
        ];
        for field in sort.fields() {
            if !columns.contains(&field.column()) {
                columns.push(field.column());
            }
        }

        let sql = format!(
            "SELECT {} FROM item ORDER BY {} LIMIT {} START {}",
            columns.join(", "),
            sort.to_surql(),
            pagination.limit,
            pagination.offset
        );
        let mut response = self.client.query(sql).await.map_err(map_err)?;
        let documents: Vec<SummaryDocument> = response.take(0).map_err(map_err)?;

        documents
            .into_iter()
            .map(SummaryDocument::into_summary)
            .collect()
    }

    async fn save(&self, mut item: Item) -> RepositoryResult<Item> {
        item.truncate_timestamps();
        if item.is_persisted() {
            self.update(item).await
        } else {
            self.insert(item).await
        }
    }

    async fn delete_by_item_id(&self, item_id: &str) -> RepositoryResult<()> {
        self.client
            .query("DELETE item WHERE item_id = $item_id RETURN NONE")
            .bind(("item_id", item_id.to_string()))
            .await
            .and_then(|response| response.check())
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation(RepositoryOperation::Delete)
                    .with_entity(ENTITY, item_id)
            })?;
        tracing::debug!(item_id, "Deleted item");
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let map_err =
            |e: surrealdb::Error| RepositoryError::from(e).with_operation(RepositoryOperation::Count);

        let mut response = self
            .client
            .query("SELECT count() AS total FROM item GROUP ALL")
            .await
            .map_err(map_err)?;
        let row: Option<CountRow> = response.take(0).map_err(map_err)?;
        // GROUP ALL over an empty table yields no row
        Ok(row.map_or(0, |row| row.total))
    }
}
