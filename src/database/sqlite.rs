use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};

use crate::database::manager::{schema_statements, DatabaseError};
use crate::database::store::{quote_identifier, Row, SqlValue, Store};

const SCHEMA: &str = include_str!("../../schema/sqlite.sql");

/// Private in-memory SQLite database with the application schema applied.
/// Backs `PHARMAMATE_STORE=memory` runs and the test suites.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// The database lives as long as the pool's single connection, so the
    /// pool never lets it go idle or expire.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), DatabaseError> {
        for statement in schema_statements(SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn row_count(&self, table: &str) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        Ok(sqlx::query_scalar(&sql).fetch_one(&self.pool).await?)
    }
}

#[cfg(test)]
impl SqliteStore {
    /// Fresh store with the named users already registered
    pub(crate) async fn with_users(usernames: &[&str]) -> Self {
        let store = Self::in_memory().await.unwrap();
        for username in usernames {
            store
                .query(
                    r#"INSERT INTO "users" ("username", "password", "is_admin") VALUES ($1, $2, $3) RETURNING "username""#,
                    &[(*username).into(), "hash".into(), false.into()],
                )
                .await
                .unwrap();
        }
        store
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DatabaseError> {
        let mut q = sqlx::query(sql);
        for p in params {
            q = bind_param(q, p);
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// SQLite has no DATE/TIME storage class; both are kept as ISO text,
/// which is also how they serialize.
fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    v: &SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match v {
        SqlValue::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.clone()),
        SqlValue::Date(d) => q.bind(d.format("%Y-%m-%d").to_string()),
        SqlValue::Time(t) => q.bind(t.format("%H:%M:%S").to_string()),
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row, DatabaseError> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_string();
            match storage.as_str() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
                "REAL" => Value::from(row.try_get::<f64, _>(idx)?),
                "TEXT" => Value::from(row.try_get::<String, _>(idx)?),
                other => {
                    return Err(DatabaseError::QueryError(format!(
                        "unsupported {} value in column {}",
                        other,
                        column.name()
                    )))
                }
            }
        };

        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}
