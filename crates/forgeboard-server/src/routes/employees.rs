use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::routes::with_store;
use crate::state::AppState;
use forgeboard_core::aggregate;

/// GET /api/employee/:id — profile, tasks, DORA snapshot, and derived
/// gamification views. 404 on unknown user id.
pub async fn employee_profile(
    State(app): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = with_store(&app, move |store| {
        aggregate::employee_profile(store, user_id)
    })
    .await?;

    Ok(Json(serde_json::json!({
        "profile": {
            "id": profile.user.id,
            "name": profile.user.name,
            "role": profile.user.role,
            "department": profile.user.department,
            "manager_id": profile.user.manager_id,
            "manager_name": profile.manager_name,
        },
        "tasks": profile.tasks,
        "dora": profile.dora,
        "score": profile.score,
        "badges": profile.badges,
        "radar": profile.radar,
    })))
}
