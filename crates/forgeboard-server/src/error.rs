use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forgeboard_core::ForgeError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Maps the core taxonomy onto status codes: validation failures are 400,
/// missing entities 404, rejected state-machine transitions 409, and store
/// or I/O failures 500 with a generic body so internal detail never reaches
/// the client.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<ForgeError>() {
            Some(e @ ForgeError::Validation(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            Some(e @ (ForgeError::UserNotFound(_) | ForgeError::TaskNotFound(_))) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            Some(e @ ForgeError::InvalidTransition { .. }) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            Some(ForgeError::Store(_) | ForgeError::Io(_)) | None => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeboard_core::types::TaskStatus;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError(ForgeError::Validation("title must not be empty".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn user_not_found_maps_to_404() {
        let err = AppError(ForgeError::UserNotFound(7).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn task_not_found_maps_to_404() {
        let err = AppError(ForgeError::TaskNotFound(9).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let err = AppError(
            ForgeError::InvalidTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Pending,
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failure_maps_to_500_without_detail() {
        let err = AppError(ForgeError::Store("no such table: users".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unexpected_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("join error"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_is_json() {
        let err = AppError(ForgeError::UserNotFound(1).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
