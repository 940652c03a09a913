//! Filtered and ordered view of the log

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use watchlog_core::build_view_now;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/view?q=&mode=&range=&year=&type=&rating=&status=
pub async fn view(
    State(state): State<AppState>,
    query: std::result::Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<View>> {
    let Query(query) = query?;
    let view_state = query.to_view_state()?;

    let entries = match query.search_term() {
        Some(term) => state.db.search_entries(term).await?,
        None => state.db.list_entries().await?,
    };

    Ok(Json(build_view_now(&entries, &view_state)))
}
