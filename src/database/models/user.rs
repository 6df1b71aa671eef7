use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::database::models::ModelError;
use crate::database::repository::decode;
use crate::database::store::{bool_column, SqlResult, Store};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(deserialize_with = "bool_column")]
    pub is_admin: bool,
}

/// User accounts: registration and credential checks
#[derive(Clone)]
pub struct Users {
    store: Arc<dyn Store>,
}

impl Users {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Self-service registration; never grants admin
    pub async fn register(&self, username: &str, password: &str) -> Result<User, ModelError> {
        self.add(username, password, false).await
    }

    /// Create a user with a hashed password. A taken username is a
    /// `BadRequest`; the insert itself decides, so concurrent registrations
    /// of one name cannot both succeed.
    pub async fn add(&self, username: &str, password: &str, is_admin: bool) -> Result<User, ModelError> {
        let hashed = hash_password(password).map_err(|e| ModelError::Credential(e.to_string()))?;
        let statement = SqlResult {
            query: r#"INSERT INTO "users" ("username", "password", "is_admin") VALUES ($1, $2, $3) ON CONFLICT ("username") DO NOTHING RETURNING "username", "password", "is_admin""#.to_string(),
            params: vec![username.into(), hashed.into(), is_admin.into()],
        };

        match self.store.execute(&statement).await?.into_iter().next() {
            Some(row) => {
                tracing::info!("Registered user {}", username);
                decode(row)
            }
            None => Err(ModelError::BadRequest(format!("Duplicate username: {}", username))),
        }
    }

    /// Check credentials; the same message covers unknown user and bad password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ModelError> {
        if let Some(user) = self.find(username).await? {
            let valid = verify_password(password, &user.password)
                .map_err(|e| ModelError::Credential(e.to_string()))?;
            if valid {
                return Ok(user);
            }
        }

        tracing::warn!("Failed login for {}", username);
        Err(ModelError::Unauthorized("Invalid username/password".to_string()))
    }

    pub async fn get(&self, username: &str) -> Result<User, ModelError> {
        self.find(username)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))
    }

    async fn find(&self, username: &str) -> Result<Option<User>, ModelError> {
        let statement = SqlResult {
            query: r#"SELECT "username", "password", "is_admin" FROM "users" WHERE "username" = $1"#.to_string(),
            params: vec![username.into()],
        };

        match self.store.execute(&statement).await?.into_iter().next() {
            Some(row) => Ok(Some(decode(row)?)),
            None => Ok(None),
        }
    }
}
