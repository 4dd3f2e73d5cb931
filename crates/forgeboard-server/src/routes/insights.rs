use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use forgeboard_core::insight;
use forgeboard_core::ForgeError;

/// POST /api/ai/analyze/:user_id — run the classification pipeline.
///
/// The classifier invocation may block for up to its configured timeout,
/// so the whole pipeline runs on the blocking pool. Classifier failures
/// never surface here: the pipeline persists and returns the fallback pair.
pub async fn analyze_user(
    State(app): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let classifier = app.classifier.clone();

    let insight = tokio::task::spawn_blocking(move || {
        let store = store
            .lock()
            .map_err(|_| ForgeError::Store("store lock poisoned".into()))?;
        insight::analyze_and_persist(&store, classifier.as_ref(), user_id)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "persona": insight.persona,
        "feedback": insight.feedback,
    })))
}
