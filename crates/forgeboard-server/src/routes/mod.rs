pub mod dashboard;
pub mod employees;
pub mod insights;
pub mod tasks;
pub mod users;

use crate::error::AppError;
use crate::state::AppState;
use forgeboard_core::store::Store;
use forgeboard_core::ForgeError;

/// Run store work on the blocking pool with the connection lock held.
pub(crate) async fn with_store<T, F>(app: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> forgeboard_core::Result<T> + Send + 'static,
{
    let store = app.store.clone();
    let out = tokio::task::spawn_blocking(move || {
        let store = store
            .lock()
            .map_err(|_| ForgeError::Store("store lock poisoned".into()))?;
        f(&store)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(out)
}
