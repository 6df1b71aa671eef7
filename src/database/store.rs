use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::database::manager::DatabaseError;

/// A result row keyed by column name
pub type Row = Map<String, Value>;

/// Typed bind parameter. Keeps dates and times typed so Postgres
/// receives them as DATE/TIME rather than TEXT.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl SqlValue {
    /// JSON rendering matching Postgres `row_to_json` output
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(b) => Value::Bool(*b),
            SqlValue::Int(i) => Value::from(*i),
            SqlValue::Text(s) => Value::String(s.clone()),
            SqlValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            SqlValue::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Parameterized statement ready for a store
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

/// Handle to the relational store, injected into every model
#[async_trait]
pub trait Store: Send + Sync {
    /// Run one parameterized statement and return its rows.
    /// Mutations must use `RETURNING` to produce rows.
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn execute(&self, statement: &SqlResult) -> Result<Vec<Row>, DatabaseError> {
        tracing::debug!("query: {} ({} params)", statement.query, statement.params.len());
        self.query(&statement.query, &statement.params).await
    }
}

/// Boolean column decoder. SQLite hands booleans back as `0`/`1`.
pub fn bool_column<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Bool(bool),
        Int(i64),
    }

    Ok(match Stored::deserialize(deserializer)? {
        Stored::Bool(b) => b,
        Stored::Int(i) => i != 0,
    })
}

/// Double-quote an identifier, escaping embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
