use axum::response::Html;

/// The demo page. Its script opens an `EventSource` on `/events` and lists
/// every `time` event it receives, newest first.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET the static demo page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
