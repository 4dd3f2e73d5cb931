use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::routes::with_store;
use crate::state::AppState;
use forgeboard_core::task;
use forgeboard_core::types::{Priority, Task, TaskStatus};

#[derive(serde::Deserialize)]
pub struct CreateTaskBody {
    pub user_id: i64,
    pub title: String,
    pub deadline: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[derive(serde::Deserialize)]
pub struct UpdateTaskBody {
    pub status: TaskStatus,
}

/// POST /api/tasks — assign a task; 400 on validation failure.
pub async fn create_task(
    State(app): State<AppState>,
    Json(body): Json<CreateTaskBody>,
) -> Result<Json<Task>, AppError> {
    let created = with_store(&app, move |store| {
        task::create_task(
            store,
            task::NewTask {
                user_id: body.user_id,
                title: body.title,
                deadline: body.deadline,
                priority: body.priority,
            },
        )
    })
    .await?;
    Ok(Json(created))
}

/// PATCH /api/tasks/:task_id — apply a status transition; 404 on unknown
/// task, 409 on anything outside the forward chain.
pub async fn update_task(
    State(app): State<AppState>,
    Path(task_id): Path<i64>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<Task>, AppError> {
    let updated = with_store(&app, move |store| {
        task::set_status(store, task_id, body.status)
    })
    .await?;
    Ok(Json(updated))
}
