use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::routes::with_store;
use crate::state::AppState;
use forgeboard_core::aggregate;

/// GET /api/manager/dashboard — every employee with score and latest
/// persona, ordered by score descending.
pub async fn global_dashboard(
    State(app): State<AppState>,
) -> Result<Json<Vec<aggregate::DashboardRow>>, AppError> {
    let rows = with_store(&app, aggregate::global_dashboard).await?;
    Ok(Json(rows))
}

/// GET /api/manager/:id — team rollup for one manager.
pub async fn team_overview(
    State(app): State<AppState>,
    Path(manager_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let team = with_store(&app, move |store| {
        aggregate::team_overview(store, manager_id)
    })
    .await?;
    Ok(Json(serde_json::json!({ "team": team })))
}
