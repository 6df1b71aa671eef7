use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::models::activity::Activities;
use crate::database::models::{ActivityChanges, NewActivity};
use crate::database::Resource;
use crate::error::ApiError;
use crate::handlers::protected::ensure_owned;
use crate::handlers::validation::{json_body, parse_id, FieldErrors};
use crate::middleware::AuthUser;
use crate::state::AppState;

fn validate_new(new: &NewActivity) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors
        .length("activity_name", &new.activity_name, 1, 100)
        .optional_length("activity_description", new.activity_description.as_deref(), 0, 500)
        .optional_length("repeat_frequency", new.repeat_frequency.as_deref(), 0, 50);
    errors.into_result("Invalid activity")
}

fn validate_changes(changes: &ActivityChanges) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors
        .optional_length("activity_name", changes.activity_name.as_deref(), 1, 100)
        .optional_length("activity_description", changes.activity_description.as_deref(), 0, 500);
    errors.into_result("Invalid activity update")
}

/// GET /users/:username/activities
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;

    let activities = state.activities().fetch_all_by_owner(&username).await?;
    Ok(Json(json!({ "activities": activities })))
}

/// POST /users/:username/activities/add
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<NewActivity>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let new = json_body(payload)?;
    validate_new(&new)?;

    let activity = state.activities().create(&username, new).await?;
    tracing::info!("Activity {} created for {}", activity.id, username);

    Ok((StatusCode::CREATED, Json(json!({ "activities": activity }))))
}

/// GET /users/:username/activities/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;

    let activity = state.activities().fetch_by_id(id).await?;
    ensure_owned(&activity.username, &username, Activities::not_found(id))?;

    Ok(Json(json!({ "activities": activity })))
}

/// PUT /users/:username/activities/:id
///
/// Only `activity_name` and `activity_description` may change. Responds 201
/// with `{ id, activity_name, activity_description }`.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
    payload: Result<Json<ActivityChanges>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;
    let changes = json_body(payload)?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No data"));
    }
    validate_changes(&changes)?;

    let activities = state.activities();
    let existing = activities.fetch_by_id(id).await?;
    ensure_owned(&existing.username, &username, Activities::not_found(id))?;

    let summary = activities.update(id, changes).await?;
    Ok((StatusCode::CREATED, Json(json!({ "activities": summary }))))
}

/// DELETE /users/:username/activities/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;

    let activities = state.activities();
    let existing = activities.fetch_by_id(id).await?;
    ensure_owned(&existing.username, &username, Activities::not_found(id))?;

    activities.remove(id).await?;
    tracing::info!("Activity {} deleted for {}", id, username);

    Ok(Json(json!({ "deleted": id })))
}
