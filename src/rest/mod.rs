// rest/mod.rs — Task REST API server.
//
// Axum HTTP server (default port 3000, local only unless bind_address says
// otherwise). Routes delegate to the task store and return domain results;
// the IntoResponse impl below is the single place errors become HTTP.
//
// Endpoints:
//   GET  /tasks
//   POST /add_task
//   PUT  /edit_task/{id}
//   GET  /search_tasks?taskName=
//   GET  /health

pub mod routes;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::error::TaskError;
use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let assets_dir = ctx.config.assets_dir.clone();

    let router = Router::new()
        .route("/health", get(routes::health::health))
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/add_task", post(routes::tasks::add_task))
        .route("/edit_task/{id}", put(routes::tasks::edit_task))
        .route("/search_tasks", get(routes::tasks::search_tasks))
        .with_state(ctx)
        .layer(CorsLayer::permissive());

    // Serve the built web UI at / when configured and present
    match assets_dir {
        Some(dir) if dir.is_dir() => router.fallback_service(ServeDir::new(dir)),
        Some(dir) => {
            warn!(path = %dir.display(), "assets_dir does not exist, serving API only");
            router
        }
        None => router,
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TaskError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            TaskError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            TaskError::Storage(err) => {
                // Log the cause server-side; the client gets a generic body
                error!(err = ?err, "storage error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
