use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::models::ModelError;
use crate::database::query_builder::{column_list, placeholders, sql_for_partial_update, Column};
use crate::database::store::{quote_identifier, Row, SqlResult, SqlValue, Store};

/// Column every owned resource is scoped by
pub const OWNER_COLUMN: &str = "username";

/// Describes one owned resource kind (table, columns, payload types)
/// so that [`Repository`] can implement the CRUD contract once.
pub trait Resource: Send + Sync + 'static {
    const TABLE: &'static str;
    /// Columns returned by create and both fetch operations
    const COLUMNS: &'static [&'static str];
    /// Columns returned by update. May be narrower than `COLUMNS`.
    const UPDATE_COLUMNS: &'static [&'static str];

    type Record: DeserializeOwned + Send;
    type New: Send;
    type Changes: Send;
    type Field: Column + Send;
    type Projection: DeserializeOwned + Send;

    /// Column/value pairs for an insert, owner included.
    /// Absent optional fields are left out so the column default applies.
    fn insert_values(owner: &str, new: Self::New) -> Vec<(&'static str, SqlValue)>;

    /// Only the fields actually supplied, in a stable order
    fn changed_fields(changes: Self::Changes) -> Vec<(Self::Field, SqlValue)>;

    fn not_found(id: i32) -> String;
}

/// CRUD over one resource kind through an injected store handle
pub struct Repository<R: Resource> {
    store: Arc<dyn Store>,
    _phantom: PhantomData<R>,
}

impl<R: Resource> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Insert a record owned by `owner` and return it with its generated id.
    /// Identical records are allowed. An owner with no user row is `NotFound`.
    pub async fn create(&self, owner: &str, new: R::New) -> Result<R::Record, ModelError> {
        let (columns, params): (Vec<&str>, Vec<SqlValue>) =
            R::insert_values(owner, new).into_iter().unzip();

        let statement = SqlResult {
            query: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                quote_identifier(R::TABLE),
                column_list(&columns),
                placeholders(1, params.len()),
                column_list(R::COLUMNS),
            ),
            params,
        };

        let rows = match self.store.execute(&statement).await {
            Ok(rows) => rows,
            Err(e) if e.is_foreign_key_violation() => {
                return Err(ModelError::NotFound(format!("No user: {}", owner)));
            }
            Err(e) => return Err(e.into()),
        };
        let row = rows.into_iter().next().ok_or_else(|| {
            DatabaseError::QueryError(format!("INSERT into {} returned no row", R::TABLE))
        })?;

        tracing::debug!("Created {} row for {}", R::TABLE, owner);
        decode(row)
    }

    /// Every record owned by `owner` in id order; empty when there are none
    pub async fn fetch_all_by_owner(&self, owner: &str) -> Result<Vec<R::Record>, ModelError> {
        let statement = SqlResult {
            query: format!(
                "SELECT {} FROM {} WHERE {} = $1 ORDER BY \"id\"",
                column_list(R::COLUMNS),
                quote_identifier(R::TABLE),
                quote_identifier(OWNER_COLUMN),
            ),
            params: vec![owner.into()],
        };

        self.store
            .execute(&statement)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Ownership is not checked here; ids are unique across owners and
    /// the route compares the record's owner itself.
    pub async fn fetch_by_id(&self, id: i32) -> Result<R::Record, ModelError> {
        let statement = SqlResult {
            query: format!(
                "SELECT {} FROM {} WHERE \"id\" = $1",
                column_list(R::COLUMNS),
                quote_identifier(R::TABLE),
            ),
            params: vec![id.into()],
        };

        match self.store.execute(&statement).await?.into_iter().next() {
            Some(row) => decode(row),
            None => Err(ModelError::NotFound(R::not_found(id))),
        }
    }

    /// Partial update: only supplied fields change. Returns the resource's
    /// update projection.
    pub async fn update(&self, id: i32, changes: R::Changes) -> Result<R::Projection, ModelError> {
        let update = sql_for_partial_update(R::changed_fields(changes))?;
        let id_idx = update.next_param();

        let mut params = update.values;
        params.push(id.into());

        let statement = SqlResult {
            query: format!(
                "UPDATE {} SET {} WHERE \"id\" = ${} RETURNING {}",
                quote_identifier(R::TABLE),
                update.set_cols,
                id_idx,
                column_list(R::UPDATE_COLUMNS),
            ),
            params,
        };

        match self.store.execute(&statement).await?.into_iter().next() {
            Some(row) => decode(row),
            None => Err(ModelError::NotFound(R::not_found(id))),
        }
    }

    pub async fn remove(&self, id: i32) -> Result<(), ModelError> {
        let statement = SqlResult {
            query: format!(
                "DELETE FROM {} WHERE \"id\" = $1 RETURNING \"id\"",
                quote_identifier(R::TABLE),
            ),
            params: vec![id.into()],
        };

        if self.store.execute(&statement).await?.is_empty() {
            return Err(ModelError::NotFound(R::not_found(id)));
        }
        Ok(())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(row: Row) -> Result<T, ModelError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
