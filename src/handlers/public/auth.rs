use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::create_token;
use crate::error::ApiError;
use crate::handlers::validation::{json_body, FieldErrors};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .length("username", &self.username, 1, 25)
            .length("password", &self.password, 5, 20);
        errors.into_result("Invalid credentials payload")
    }
}

/// POST /auth/register - create a (non-admin) account and receive a token
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// Output (201): `{ "token": "eyJhbGciOiJIUzI1NiI..." }`
///
/// Duplicate usernames are a 400.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let credentials = json_body(payload)?;
    credentials.validate()?;

    let user = state
        .users()
        .register(&credentials.username, &credentials.password)
        .await?;
    let token = create_token(&user.username, user.is_admin, &state.config.security)?;

    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

/// POST /auth/token - exchange username/password for a token
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// Output: `{ "token": "eyJhbGciOiJIUzI1NiI..." }`
///
/// Bad credentials are a 401 that does not say which half was wrong.
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let credentials = json_body(payload)?;
    credentials.validate()?;

    let user = state
        .users()
        .authenticate(&credentials.username, &credentials.password)
        .await?;
    let token = create_token(&user.username, user.is_admin, &state.config.security)?;

    Ok(Json(json!({ "token": token })))
}
