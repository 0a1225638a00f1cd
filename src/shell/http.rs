use axum::{Router, response::Html, routing::get};
use tower_http::trace::TraceLayer;

use crate::modules::repository_charts::use_cases::render_chart::inbound::http as chart_http;
use crate::shell::state::AppState;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head><title>badge-generator</title></head>
  <body>
    <h1>badge-generator</h1>
    <p>PNG charts of a GitHub user's public repositories.</p>
    <ul>
      <li><code>/github/{username}/top-forks</code></li>
      <li><code>/github/{username}/top-stars</code></li>
      <li><code>/github/{username}/bubble-lang</code></li>
    </ul>
    <p>Query parameters: <code>cmap</code>, <code>top</code>, <code>w</code>, <code>h</code>, <code>font</code>.</p>
    <p><a href="https://github.com/yohanesgultom/badge-generator">Source</a></p>
  </body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/github/{username}/top-forks", get(chart_http::top_forks))
        .route("/github/{username}/top-stars", get(chart_http::top_stars))
        .route("/github/{username}/bubble-lang", get(chart_http::bubble_lang))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
