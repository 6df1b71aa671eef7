use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::models::journal::Journal;
use crate::database::models::{JournalChanges, NewJournalEntry};
use crate::database::Resource;
use crate::error::ApiError;
use crate::handlers::protected::ensure_owned;
use crate::handlers::validation::{json_body, parse_id, FieldErrors};
use crate::middleware::AuthUser;
use crate::state::AppState;

fn validate_new(new: &NewJournalEntry) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors
        .length("journal_entry", &new.journal_entry, 1, 5000)
        .optional_length("activity_name", new.activity_name.as_deref(), 0, 100);
    errors.into_result("Invalid journal entry")
}

fn validate_changes(changes: &JournalChanges) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors
        .optional_length("journal_entry", changes.journal_entry.as_deref(), 1, 5000)
        .optional_length("activity_name", changes.activity_name.as_deref(), 0, 100);
    errors.into_result("Invalid journal update")
}

/// GET /users/:username/journal
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;

    let journal = state.journal().fetch_all_by_owner(&username).await?;
    Ok(Json(json!({ "journal": journal })))
}

/// POST /users/:username/journal/add
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<NewJournalEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let new = json_body(payload)?;
    validate_new(&new)?;

    let entry = state.journal().create(&username, new).await?;
    tracing::info!("Journal entry {} created for {}", entry.id, username);

    Ok((StatusCode::CREATED, Json(json!({ "journal": entry }))))
}

/// GET /users/:username/journal/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;

    let entry = state.journal().fetch_by_id(id).await?;
    ensure_owned(&entry.username, &username, Journal::not_found(id))?;

    Ok(Json(json!({ "journal": entry })))
}

/// PUT /users/:username/journal/:id - responds 201 with the whole entry
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
    payload: Result<Json<JournalChanges>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;
    let changes = json_body(payload)?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No data"));
    }
    validate_changes(&changes)?;

    let journal = state.journal();
    let existing = journal.fetch_by_id(id).await?;
    ensure_owned(&existing.username, &username, Journal::not_found(id))?;

    let entry = journal.update(id, changes).await?;
    Ok((StatusCode::CREATED, Json(json!({ "journal": entry }))))
}

/// DELETE /users/:username/journal/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    auth_user.ensure_correct_user_or_admin(&username)?;
    let id = parse_id(&id)?;

    let journal = state.journal();
    let existing = journal.fetch_by_id(id).await?;
    ensure_owned(&existing.username, &username, Journal::not_found(id))?;

    journal.remove(id).await?;
    tracing::info!("Journal entry {} deleted for {}", id, username);

    Ok(Json(json!({ "deleted": "Journal deleted" })))
}
