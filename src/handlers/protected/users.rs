use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /users/:username - `{ user: { username, is_admin } }`
pub async fn show(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;

    let user = state.users().get(&username).await?;
    Ok(Json(json!({ "user": user })))
}
