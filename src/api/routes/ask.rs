//! Question endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::api::server::AppState;
use crate::error::EspGptError;

#[derive(Debug, Deserialize)]
pub struct AskParams {
    q: Option<String>,
}

/// GET /ask?q=<question>: answers in plain text.
///
/// Missing or blank `q` is a 400. Failures come back as `"Error: ..."` text
/// so the chat page can show them inline.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AskParams>,
) -> (StatusCode, String) {
    let Some(question) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing question parameter".to_string(),
        );
    };

    info!(question, "Question received");
    match state.assistant.ask(question).await {
        Ok(answer) => {
            info!(cached = answer.cached, "Answer sent");
            (StatusCode::OK, answer.text)
        }
        Err(e) => (status_for(&e), format!("Error: {e}")),
    }
}

fn status_for(err: &EspGptError) -> StatusCode {
    match err {
        EspGptError::EmptyKnowledgeBase => StatusCode::SERVICE_UNAVAILABLE,
        EspGptError::Remote(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
