use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StoreKind};
use crate::database::postgres::PgStore;
use crate::database::sqlite::SqliteStore;
use crate::database::store::Store;

/// Errors raised by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Unsupported statement: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// A write referenced an owner that does not exist
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DatabaseError::Sqlx(sqlx::Error::Database(e)) if sqlx::error::DatabaseError::is_foreign_key_violation(e.as_ref()))
    }
}

/// Builds the store handle that gets injected into the models
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match config.store {
            StoreKind::Memory => {
                info!("Using in-memory SQLite store");
                Ok(Arc::new(SqliteStore::in_memory().await?))
            }
            StoreKind::Postgres => Ok(Arc::new(PgStore::new(Self::pg_pool(config).await?))),
        }
    }

    pub async fn pg_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(pool)
    }

    /// Apply `schema/postgres.sql`, one statement at a time. Safe to re-run.
    pub async fn init_schema(config: &DatabaseConfig) -> Result<usize, DatabaseError> {
        if config.store != StoreKind::Postgres {
            return Err(DatabaseError::Unsupported(
                "schema initialisation needs the postgres store".to_string(),
            ));
        }

        let pool = Self::pg_pool(config).await?;
        let statements = schema_statements(SCHEMA);
        for statement in &statements {
            sqlx::query(statement).execute(&pool).await?;
        }

        info!("Applied {} schema statements", statements.len());
        Ok(statements.len())
    }
}

const SCHEMA: &str = include_str!("../../schema/postgres.sql");

pub(crate) fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_needs_no_url() {
        let config = crate::config::AppConfig::test().database;
        let store = DatabaseManager::connect(&config).await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn postgres_store_requires_url() {
        let mut config = crate::config::AppConfig::test().database;
        config.store = StoreKind::Postgres;
        config.url = None;
        let err = DatabaseManager::connect(&config).await.err().unwrap();
        assert!(matches!(err, DatabaseError::ConfigMissing("DATABASE_URL")));
    }

    #[tokio::test]
    async fn schema_init_refuses_memory_store() {
        let config = crate::config::AppConfig::test().database;
        let err = DatabaseManager::init_schema(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Unsupported(_)));
    }

    #[test]
    fn schema_splits_into_create_statements() {
        let statements = schema_statements(SCHEMA);
        assert_eq!(statements.len(), 3);
        assert!(statements.iter().all(|s| s.starts_with("CREATE TABLE IF NOT EXISTS")));
    }

    #[test]
    fn only_sqlx_foreign_key_errors_count_as_violations() {
        assert!(!DatabaseError::QueryError("boom".into()).is_foreign_key_violation());
        assert!(!DatabaseError::Sqlx(sqlx::Error::RowNotFound).is_foreign_key_violation());
    }
}
