use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row as _};

use crate::database::manager::DatabaseError;
use crate::database::store::{Row, SqlValue, Store};

/// Postgres-backed store over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wraps a statement so every row comes back as one JSON object,
    /// whatever the column types are.
    fn wrap(sql: &str) -> String {
        format!("WITH t AS ({}) SELECT row_to_json(t) AS row FROM t", sql)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DatabaseError> {
        let wrapped = Self::wrap(sql);
        let mut q = sqlx::query(&wrapped);
        for p in params {
            q = bind_param(q, p);
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| {
                let value: Value = row.try_get("row")?;
                match value {
                    Value::Object(map) => Ok(map),
                    other => Err(DatabaseError::QueryError(format!(
                        "expected JSON object row, got {}",
                        other
                    ))),
                }
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &SqlValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlValue::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.clone()),
        SqlValue::Date(d) => q.bind(*d),
        SqlValue::Time(t) => q.bind(*t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_statement_in_row_to_json() {
        let sql = PgStore::wrap("DELETE FROM \"journal\" WHERE \"id\" = $1 RETURNING \"id\"");
        assert_eq!(
            sql,
            "WITH t AS (DELETE FROM \"journal\" WHERE \"id\" = $1 RETURNING \"id\") SELECT row_to_json(t) AS row FROM t"
        );
    }
}
