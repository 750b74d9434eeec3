//! Chat page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET /: the static chat page. It calls `/ask` and renders the text.
pub async fn get_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
