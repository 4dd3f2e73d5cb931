pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Users
        .route("/api/users", get(routes::users::list_users))
        // Dashboards
        .route(
            "/api/manager/dashboard",
            get(routes::dashboard::global_dashboard),
        )
        .route("/api/manager/{id}", get(routes::dashboard::team_overview))
        .route(
            "/api/employee/{id}",
            get(routes::employees::employee_profile),
        )
        // Tasks
        .route("/api/tasks", post(routes::tasks::create_task))
        .route("/api/tasks/{task_id}", patch(routes::tasks::update_task))
        // Insights
        .route(
            "/api/ai/analyze/{user_id}",
            post(routes::insights::analyze_user),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the API on `0.0.0.0:port`.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("forgeboard API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
