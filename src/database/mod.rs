pub mod manager;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgStore;
pub use repository::{Repository, Resource};
pub use sqlite::SqliteStore;
pub use store::{Row, SqlResult, SqlValue, Store};
