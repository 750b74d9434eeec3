//! Axum HTTP server for the chat page and question endpoint.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::assistant::Assistant;
use crate::config::ServerConfig;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one assistant instance built at startup.
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(super::routes::index::get_index))
        .route("/ask", get(super::routes::ask::ask))
        .route("/api/health", get(super::routes::health::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the HTTP server and run until the process is stopped.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::knowledge::KnowledgeMatcher;
    use crate::providers::MockCompletionProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    /// State with a single knowledge entry and the given provider mock.
    pub(crate) fn make_state(mock: MockCompletionProvider) -> AppState {
        let mut knowledge = KnowledgeMatcher::new();
        knowledge
            .add_entry("ESP32 wifi", "ESP32 has WiFi.", 1.0)
            .unwrap();
        AppState::new(Arc::new(Assistant::new(
            knowledge,
            ResponseCache::new(5),
            Arc::new(mock),
            "You are a helpful assistant.",
        )))
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(make_state(MockCompletionProvider::new()));
        let req = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_served_as_html() {
        let app = build_router(make_state(MockCompletionProvider::new()));
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }
}
