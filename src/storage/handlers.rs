use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::post,
};
use std::sync::Arc;

use super::memory::WorkerStore;
use super::protocol::{ENDPOINT_MESSAGES, StoreRequest, StoreResponse};

pub async fn handle_messages(
    Extension(store): Extension<Arc<WorkerStore>>,
    Json(requests): Json<Vec<StoreRequest>>,
) -> (StatusCode, Json<StoreResponse>) {
    tracing::debug!(
        "Worker {} received batch of {} requests",
        store.worker_id(),
        requests.len()
    );

    let response = store.handle_batch(requests).await;
    tracing::debug!(
        "Worker {} now holds {} objects",
        store.worker_id(),
        store.len().await
    );
    (StatusCode::OK, Json(response))
}

/// HTTP application served by a worker process.
pub fn worker_app(store: Arc<WorkerStore>) -> Router {
    Router::new()
        .route(ENDPOINT_MESSAGES, post(handle_messages))
        .layer(Extension(store))
}
