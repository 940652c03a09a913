//! Watch log CRUD and search endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use watchlog_core::SaveKind;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

fn not_found(id: EntryId) -> ApiError {
    ApiError::NotFound(format!("Log {} not found", id))
}

/// GET /api/logs
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<WatchLogEntry>>> {
    let entries = state.db.list_entries().await?;
    Ok(Json(entries))
}

/// GET /api/search?q=
pub async fn search(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<WatchLogEntry>>> {
    let Query(query) = query?;
    let entries = state.db.search_entries(query.q.trim()).await?;
    Ok(Json(entries))
}

/// GET /api/logs/:id
pub async fn get(
    State(state): State<AppState>,
    id: std::result::Result<Path<EntryId>, PathRejection>,
) -> Result<Json<WatchLogEntry>> {
    let Path(id) = id?;
    let entry = state.db.get_entry(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(entry))
}

/// POST /api/logs
/// Validates and reconciles the draft, then stores it
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(draft) = payload?;
    draft.validate()?;

    let draft = draft.reconciled(SaveKind::Create);
    let id = state
        .db
        .create_entry(&draft)
        .await
        .map_err(ApiError::on_write)?;

    tracing::info!(id, title = %draft.title, status = %draft.effective_status(), "Created log entry");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/logs/:id
/// Full replace; reconciliation sees the status stored before the edit
pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<EntryId>, PathRejection>,
    payload: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = id?;
    let Json(draft) = payload?;
    draft.validate()?;

    let previous = state
        .db
        .get_entry_status(id)
        .await
        .map_err(ApiError::on_write)?
        .ok_or_else(|| not_found(id))?;

    let draft = draft.reconciled(SaveKind::Update { previous });
    let updated = state
        .db
        .update_entry(id, &draft)
        .await
        .map_err(ApiError::on_write)?;

    // Deleted between the status read and the update
    if !updated {
        return Err(not_found(id));
    }

    tracing::info!(id, %previous, status = %draft.effective_status(), "Updated log entry");

    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/logs/:id
pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<EntryId>, PathRejection>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = id?;
    let deleted = state
        .db
        .delete_entry(id)
        .await
        .map_err(ApiError::on_write)?;

    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(id, "Deleted log entry");

    Ok(Json(SuccessResponse::ok()))
}
