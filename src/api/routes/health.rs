//! Health endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::server::AppState;

/// GET /api/health: liveness plus knowledge base and cache counters.
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let assistant = &state.assistant;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": assistant.provider_name(),
        "knowledge_entries": assistant.knowledge().len(),
        "cache": assistant.cache_stats(),
    }))
}
