use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::routes::with_store;
use crate::state::AppState;

/// GET /api/users — login/selection list, ordered by name.
pub async fn list_users(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let users = with_store(&app, |store| store.users_by_name()).await?;
    let rows: Vec<_> = users
        .into_iter()
        .map(|u| {
            serde_json::json!({
                "id": u.id,
                "name": u.name,
                "role": u.role,
            })
        })
        .collect();
    Ok(Json(serde_json::Value::Array(rows)))
}
